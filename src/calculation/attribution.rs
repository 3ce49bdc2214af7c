//! Sales attribution.
//!
//! Splits each line item's amount among the casts credited on it.
//!
//! ## Recipient order
//!
//! Every split floors each share and gives the remainder to the last recipient
//! in this fixed order:
//!
//! 1. nominated casts on the item, in nomination order;
//! 2. nominated casts not on the item (only when the nominated share is
//!    spread over every nomination), in nomination order;
//! 3. help casts, in the order they appear on the item.
//!
//! Group splits (`equal`, `ratio`) floor the nominated group's share, so the
//! help group absorbs the remainder.
//!
//! ## Aggregation modes
//!
//! Item-based attribution considers only the casts named on the item.
//! Receipt-based attribution considers every cast named anywhere on the
//! receipt as eligible for each included item.

use tracing::debug;

use crate::config::{
    ChargeRates, DistributionPolicy, HelpDistributionMethod, MultiCastDistribution,
    RoundingTiming, SystemPolicy,
};
use crate::models::{
    AttributionRow, CastSales, ItemAttribution, LineItem, NominationSet, Receipt,
    ReceiptAttribution, SalesAggregationMode,
};

use super::rounding::{add_service_charge, strip_tax};

/// Applies the tax, rounding and service-charge adjustments of a policy.
///
/// Tax is stripped first (when excluded), the result rounded, then the service
/// charge added (when not excluded) and rounded again.
///
/// # Example
///
/// ```
/// use compensation_engine::calculation::{adjust_amount, Rounding};
/// use compensation_engine::config::{ChargeRates, DistributionPolicy};
///
/// let mut policy = DistributionPolicy::default();
/// policy.exclude_tax = true;
/// policy.rounding = Rounding::parse("floor_100");
///
/// let charges = ChargeRates { tax_rate_percent: 10, service_charge_rate_percent: 0 };
/// // 12345 * 100 / 110 = 11222, floored to 11200
/// assert_eq!(adjust_amount(12345, &policy, charges), 11200);
/// ```
pub fn adjust_amount(amount: i64, policy: &DistributionPolicy, charges: ChargeRates) -> i64 {
    let mut adjusted = amount;

    if policy.exclude_tax && charges.tax_rate_percent > 0 {
        adjusted = strip_tax(adjusted, charges.tax_rate_percent);
    }
    adjusted = policy.rounding.apply(adjusted);

    if !policy.exclude_service_charge && charges.service_charge_rate_percent > 0 {
        adjusted = add_service_charge(adjusted, charges.service_charge_rate_percent);
        adjusted = policy.rounding.apply(adjusted);
    }

    adjusted
}

/// Splits an amount evenly over `count` recipients.
///
/// Each share is floored; the last share absorbs the remainder so the shares
/// always sum to `amount`. Zero recipients yield no shares.
///
/// # Example
///
/// ```
/// use compensation_engine::calculation::split_evenly;
///
/// assert_eq!(split_evenly(1000, 3), vec![333, 333, 334]);
/// assert!(split_evenly(1000, 0).is_empty());
/// ```
pub fn split_evenly(amount: i64, count: usize) -> Vec<i64> {
    if count == 0 {
        return Vec::new();
    }

    let divisor = count as i64;
    let share = amount.div_euclid(divisor);
    let mut shares = vec![share; count];
    shares[count - 1] = amount - share * (divisor - 1);
    shares
}

/// The nominated group's percentage of a group split, `None` for per-head splits.
fn nominated_group_percent(policy: &DistributionPolicy) -> Option<i64> {
    match policy.help_distribution_method {
        HelpDistributionMethod::AllToNomination => Some(100),
        HelpDistributionMethod::Equal => Some(50),
        HelpDistributionMethod::Ratio => Some(i64::from(policy.help_ratio_percent.min(100))),
        HelpDistributionMethod::EqualPerPerson => None,
    }
}

/// Splits an item amount between the nominated and help groups.
///
/// Returns `(self_share, help_share)`. A missing group gets nothing and the
/// other group takes the whole amount, except that help never takes what is
/// reserved entirely for nominations.
fn group_shares(amount: i64, self_percent: i64, has_self: bool, has_help: bool) -> (i64, i64) {
    match (has_self, has_help) {
        (false, false) => (0, 0),
        (true, false) => (amount, 0),
        (false, true) if self_percent >= 100 => (0, 0),
        (false, true) => (0, amount),
        (true, true) => {
            let self_share = (amount * self_percent).div_euclid(100);
            (self_share, amount - self_share)
        }
    }
}

/// Allocates an amount to nominated and help recipients per the help method.
fn allocate(
    amount: i64,
    policy: &DistributionPolicy,
    self_count: usize,
    help_count: usize,
) -> (Vec<i64>, Vec<i64>) {
    match nominated_group_percent(policy) {
        None => {
            let mut shares = split_evenly(amount, self_count + help_count);
            let help = shares.split_off(self_count);
            (shares, help)
        }
        Some(self_percent) => {
            let (self_share, help_share) =
                group_shares(amount, self_percent, self_count > 0, help_count > 0);
            (
                split_evenly(self_share, self_count),
                split_evenly(help_share, help_count),
            )
        }
    }
}

/// Partitions eligible names into nominated and help casts.
///
/// Excluded names are dropped and duplicates collapsed. On a free-seating
/// receipt everybody eligible is treated as nominated.
fn partition_casts(eligible: &[String], nominations: &NominationSet) -> (Vec<String>, Vec<String>) {
    let mut names: Vec<&String> = Vec::with_capacity(eligible.len());
    for name in eligible {
        if nominations.is_excluded(name) || names.contains(&name) {
            continue;
        }
        names.push(name);
    }

    if nominations.is_free_seating() {
        return (names.into_iter().cloned().collect(), Vec::new());
    }

    let on_item_self = nominations
        .names()
        .iter()
        .filter(|n| names.contains(n))
        .cloned()
        .collect();
    let on_item_help = names
        .into_iter()
        .filter(|n| !nominations.is_nominated(n))
        .cloned()
        .collect();

    (on_item_self, on_item_help)
}

/// Returns the nominated recipients of an item in remainder order.
fn self_recipients(
    on_item_self: &[String],
    nominations: &NominationSet,
    policy: &DistributionPolicy,
) -> Vec<String> {
    let mut recipients = on_item_self.to_vec();

    if policy.nomination_distribute_all || on_item_self.is_empty() {
        recipients.extend(
            nominations
                .names()
                .iter()
                .filter(|n| !on_item_self.contains(n))
                .cloned(),
        );
    }

    recipients
}

/// Builds the breakdown rows for an item amount.
fn distribute(
    amount: i64,
    self_recipients: &[String],
    help_recipients: &[String],
    policy: &DistributionPolicy,
) -> Vec<AttributionRow> {
    let (self_shares, help_shares) = match policy.multi_cast_distribution {
        MultiCastDistribution::NominationOnly => {
            let self_shares = split_evenly(amount, self_recipients.len());
            // Help shares are only a back base here; they are never sales.
            let help_shares = if policy.give_help_sales && !self_recipients.is_empty() {
                allocate(amount, policy, self_recipients.len(), help_recipients.len()).1
            } else {
                vec![0; help_recipients.len()]
            };
            (self_shares, help_shares)
        }
        MultiCastDistribution::AllEqual => {
            allocate(amount, policy, self_recipients.len(), help_recipients.len())
        }
    };

    let report_help = policy.give_help_sales
        && policy.multi_cast_distribution == MultiCastDistribution::AllEqual;

    let self_rows = self_recipients
        .iter()
        .zip(self_shares)
        .map(|(name, share)| AttributionRow {
            cast_name: name.clone(),
            is_self: true,
            attributed_sales: share,
            calculated_share: share,
        });
    let help_rows = help_recipients
        .iter()
        .zip(help_shares)
        .map(|(name, share)| AttributionRow {
            cast_name: name.clone(),
            is_self: false,
            attributed_sales: if report_help { share } else { 0 },
            calculated_share: share,
        });

    self_rows.chain(help_rows).collect()
}

fn attribute_eligible(
    item: &LineItem,
    eligible: &[String],
    nominations: &NominationSet,
    policy: &DistributionPolicy,
    charges: ChargeRates,
) -> ItemAttribution {
    let base_amount = match policy.rounding_timing {
        RoundingTiming::PerItem => adjust_amount(item.gross_amount(), policy, charges),
        RoundingTiming::PerReceipt => item.gross_amount(),
    };

    let mut attribution = ItemAttribution {
        item_id: item.id.clone(),
        product_name: item.product_name.clone(),
        category: item.category.clone(),
        quantity: item.quantity,
        base_amount,
        included: item.is_included(),
        self_casts_on_item: Vec::new(),
        help_casts_on_item: Vec::new(),
        rows: Vec::new(),
    };

    if !attribution.included {
        debug!(item_id = %item.id, "Item has no cast, not included");
        return attribution;
    }

    let (on_item_self, on_item_help) = partition_casts(eligible, nominations);
    let recipients = self_recipients(&on_item_self, nominations, policy);
    attribution.rows = distribute(base_amount, &recipients, &on_item_help, policy);
    attribution.self_casts_on_item = on_item_self;
    attribution.help_casts_on_item = on_item_help;

    attribution
}

/// Attributes a single line item using the casts named on it.
///
/// # Example
///
/// ```
/// use compensation_engine::calculation::attribute_line_item;
/// use compensation_engine::config::{
///     ChargeRates, DistributionPolicy, HelpDistributionMethod, MultiCastDistribution,
/// };
/// use compensation_engine::models::{LineItem, NominationSet};
///
/// let item = LineItem {
///     id: "item_001".to_string(),
///     product_name: "Set".to_string(),
///     category: None,
///     base_price: 1000,
///     quantity: 1,
///     cast_names: vec!["Aoi".to_string(), "Mio".to_string(), "Rin".to_string()],
/// };
/// let nominations = NominationSet::new(&["Aoi".to_string()], &[]);
///
/// let mut policy = DistributionPolicy::default();
/// policy.multi_cast_distribution = MultiCastDistribution::AllEqual;
/// policy.help_distribution_method = HelpDistributionMethod::EqualPerPerson;
/// policy.give_help_sales = true;
///
/// let result = attribute_line_item(&item, &nominations, &policy, ChargeRates::default());
/// let sales: Vec<i64> = result.rows.iter().map(|r| r.attributed_sales).collect();
/// assert_eq!(sales, vec![333, 333, 334]);
/// ```
pub fn attribute_line_item(
    item: &LineItem,
    nominations: &NominationSet,
    policy: &DistributionPolicy,
    charges: ChargeRates,
) -> ItemAttribution {
    attribute_eligible(item, &item.cast_names, nominations, policy, charges)
}

/// Every cast named on an included item of the receipt, in first-seen order.
fn receipt_participants(receipt: &Receipt) -> Vec<String> {
    let mut participants: Vec<String> = Vec::new();
    for name in receipt.items.iter().flat_map(|item| item.cast_names.iter()) {
        if !participants.contains(name) {
            participants.push(name.clone());
        }
    }
    participants
}

/// Sums each cast's sales over the items, in first-credited order.
fn total_cast_sales(items: &[ItemAttribution]) -> Vec<CastSales> {
    let mut totals: Vec<CastSales> = Vec::new();

    for row in items.iter().flat_map(|item| item.rows.iter()) {
        let index = match totals.iter().position(|t| t.cast_name == row.cast_name) {
            Some(index) => index,
            None => {
                totals.push(CastSales {
                    cast_name: row.cast_name.clone(),
                    self_sales: 0,
                    help_sales: 0,
                });
                totals.len() - 1
            }
        };

        if row.is_self {
            totals[index].self_sales += row.attributed_sales;
        } else {
            totals[index].help_sales += row.attributed_sales;
        }
    }

    totals
}

/// Attributes every item of a receipt in one aggregation mode.
///
/// With per-receipt timing the items carry raw amounts and each cast's self
/// and help totals are adjusted once here.
pub fn attribute_receipt(
    receipt: &Receipt,
    policy: &SystemPolicy,
    mode: SalesAggregationMode,
) -> ReceiptAttribution {
    let nominations = NominationSet::new(&receipt.nominations, &policy.non_help_names);
    let distribution = policy.distribution(mode);
    let participants = match mode {
        SalesAggregationMode::ItemBased => Vec::new(),
        SalesAggregationMode::ReceiptBased => receipt_participants(receipt),
    };

    let items: Vec<ItemAttribution> = receipt
        .items
        .iter()
        .map(|item| {
            let eligible = match mode {
                SalesAggregationMode::ItemBased => &item.cast_names,
                SalesAggregationMode::ReceiptBased => &participants,
            };
            attribute_eligible(item, eligible, &nominations, distribution, policy.charges)
        })
        .collect();

    let mut cast_sales = total_cast_sales(&items);
    if distribution.rounding_timing == RoundingTiming::PerReceipt {
        for sales in &mut cast_sales {
            sales.self_sales = adjust_amount(sales.self_sales, distribution, policy.charges);
            sales.help_sales = adjust_amount(sales.help_sales, distribution, policy.charges);
        }
    }

    debug!(
        receipt_id = %receipt.id,
        mode = mode.as_str(),
        items = items.len(),
        casts = cast_sales.len(),
        "Receipt attributed"
    );

    ReceiptAttribution {
        receipt_id: receipt.id.clone(),
        date: receipt.date,
        mode,
        items,
        cast_sales,
    }
}
