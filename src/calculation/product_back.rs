//! Product back calculation.
//!
//! Applies resolved back rates to a cast's attribution rows. The base of a back
//! is the row's calculated share, or the item's whole base amount for help rows
//! when the compensation type pays help backs on the full amount.

use tracing::debug;

use crate::models::{
    AuditStep, BackType, Cast, CompensationType, HelpBackCalculationMethod, ProductBackLine,
    ProductBackTotals, ReceiptAttribution,
};

use super::back_rate::{BackRateResolver, ResolvedBackRate};
use super::rounding::floor_percentage;

/// Which product backs a compensation type pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductBackOptions {
    /// Pay backs earned as the nominated cast.
    pub include_self: bool,
    /// Pay backs earned as help.
    pub include_help: bool,
    /// Base used for help backs.
    pub help_method: HelpBackCalculationMethod,
}

impl From<&CompensationType> for ProductBackOptions {
    fn from(ty: &CompensationType) -> Self {
        Self {
            include_self: ty.use_product_back,
            include_help: ty.use_help_product_back,
            help_method: ty.help_back_calculation_method,
        }
    }
}

/// The result of a product back calculation, including the audit step.
#[derive(Debug, Clone)]
pub struct ProductBackResult {
    /// The back totals and lines.
    pub totals: ProductBackTotals,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Computes one back amount.
///
/// Fixed backs pay the fixed amount per unit; ratio backs pay
/// `floor(base * ratio / 100)`.
///
/// # Example
///
/// ```
/// use compensation_engine::calculation::{back_amount, ResolvedBackRate};
/// use compensation_engine::models::{BackRateScope, BackType};
/// use rust_decimal::Decimal;
///
/// let rate = ResolvedBackRate {
///     back_type: BackType::Ratio,
///     ratio: Decimal::from(15),
///     fixed_amount: 0,
///     is_sliding: false,
///     scope: BackRateScope::CastDefault,
/// };
/// assert_eq!(back_amount(&rate, 3333, 1), 499);
/// ```
pub fn back_amount(rate: &ResolvedBackRate, base: i64, quantity: i64) -> i64 {
    match rate.back_type {
        BackType::Fixed => rate.fixed_amount * quantity,
        BackType::Ratio => floor_percentage(base, rate.ratio),
    }
}

/// Calculates a cast's product backs over a set of receipt attributions.
///
/// Rows are skipped when the side (self or help) is not paid by the type, when
/// the share is zero and the help base is not the full amount, or when no back
/// rule matches.
///
/// Under per-receipt rounding timing the rows carry raw, tax-inclusive shares,
/// so ratio backs for a type in that mode are paid on the unadjusted amount.
pub fn calculate_product_backs(
    attributions: &[ReceiptAttribution],
    cast: &Cast,
    resolver: &BackRateResolver<'_>,
    options: ProductBackOptions,
    step_number: u32,
) -> ProductBackResult {
    let mut totals = ProductBackTotals::default();
    let mut skipped_rows = 0usize;

    for receipt in attributions {
        for item in receipt.items.iter().filter(|i| i.included) {
            for row in item.rows_for(&cast.name) {
                let paid = if row.is_self {
                    options.include_self
                } else {
                    options.include_help
                };
                if !paid {
                    skipped_rows += 1;
                    continue;
                }

                let full_amount =
                    !row.is_self && options.help_method == HelpBackCalculationMethod::FullAmount;
                if row.calculated_share == 0 && !full_amount {
                    skipped_rows += 1;
                    continue;
                }

                let Some(rate) = resolver.resolve(
                    &cast.id,
                    item.category.as_deref(),
                    &item.product_name,
                    row.is_self,
                ) else {
                    skipped_rows += 1;
                    continue;
                };

                let base = if full_amount {
                    item.base_amount
                } else {
                    row.calculated_share
                };
                let amount = back_amount(&rate, base, item.quantity);

                debug!(
                    cast_id = %cast.id,
                    item_id = %item.item_id,
                    is_self = row.is_self,
                    base,
                    amount,
                    "Product back"
                );

                totals.push(ProductBackLine {
                    receipt_id: receipt.receipt_id.clone(),
                    item_id: item.item_id.clone(),
                    product_name: item.product_name.clone(),
                    is_self: row.is_self,
                    base,
                    back_type: rate.back_type,
                    rate: match rate.back_type {
                        BackType::Ratio => Some(rate.ratio),
                        BackType::Fixed => None,
                    },
                    scope: rate.scope,
                    amount,
                });
            }
        }
    }

    let audit_step = AuditStep {
        step_number,
        rule_id: "product_back".to_string(),
        rule_name: "Product Back".to_string(),
        input: serde_json::json!({
            "cast_id": cast.id,
            "receipts": attributions.len(),
            "include_self": options.include_self,
            "include_help": options.include_help,
            "help_method": options.help_method,
        }),
        output: serde_json::json!({
            "self_back": totals.self_back,
            "help_back": totals.help_back,
            "lines": totals.lines.len(),
            "skipped_rows": skipped_rows,
        }),
        reasoning: format!(
            "{} back lines: self {} + help {} ({} rows without a paid back)",
            totals.lines.len(),
            totals.self_back,
            totals.help_back,
            skipped_rows
        ),
    };

    ProductBackResult { totals, audit_step }
}
