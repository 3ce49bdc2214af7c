//! Configuration types for sales attribution.
//!
//! The YAML files deserialize into the all-optional `*File` shapes; the typed
//! [`SystemPolicy`] is built from them once, in [`SystemPolicy::from_file`],
//! which is the only place defaults are applied.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::calculation::Rounding;
use crate::models::SalesAggregationMode;

/// Default consumption tax percentage.
pub const DEFAULT_TAX_RATE_PERCENT: u32 = 10;

/// Default split given to the nominated group by [`HelpDistributionMethod::Ratio`].
pub const DEFAULT_HELP_RATIO_PERCENT: u32 = 50;

/// When tax/service adjustments and rounding are applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingTiming {
    /// Adjust every line item before distribution.
    #[default]
    PerItem,
    /// Distribute raw amounts and adjust each cast's receipt total once.
    PerReceipt,
}

/// Who may receive sales credit on a multi-cast item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MultiCastDistribution {
    /// Nominated and help casts share according to the help method.
    AllEqual,
    /// Only nominated casts are credited; help sales are always zero.
    #[default]
    NominationOnly,
}

/// How an item is split between the nominated group and the help group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HelpDistributionMethod {
    /// Everything to the nominated group.
    #[default]
    AllToNomination,
    /// Half to each group.
    Equal,
    /// The nominated group gets `help_ratio_percent`, help the rest.
    Ratio,
    /// Evenly across every eligible head.
    EqualPerPerson,
}

/// The distribution policy of one aggregation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionPolicy {
    /// Strip the included consumption tax.
    pub exclude_tax: bool,
    /// Leave the service charge out of sales.
    pub exclude_service_charge: bool,
    /// Rounding applied after each adjustment.
    pub rounding: Rounding,
    /// When adjustments are applied.
    pub rounding_timing: RoundingTiming,
    /// Who may receive credit.
    pub multi_cast_distribution: MultiCastDistribution,
    /// How nominated and help groups split.
    pub help_distribution_method: HelpDistributionMethod,
    /// Nominated group's percentage under [`HelpDistributionMethod::Ratio`].
    pub help_ratio_percent: u32,
    /// Report help shares as sales.
    pub give_help_sales: bool,
    /// Spread the nominated share over every nomination, not only those on the item.
    pub nomination_distribute_all: bool,
}

impl Default for DistributionPolicy {
    fn default() -> Self {
        Self::from_file(DistributionPolicyFile::default())
    }
}

impl DistributionPolicy {
    /// Builds a policy from its file shape, applying defaults.
    pub fn from_file(file: DistributionPolicyFile) -> Self {
        let rounding = file
            .rounding
            .as_deref()
            .map(Rounding::parse)
            .unwrap_or(Rounding::NONE);

        let help_ratio_percent = match file.help_ratio_percent {
            Some(ratio) if ratio > 100 => {
                warn!(ratio, "help_ratio_percent above 100, clamping");
                100
            }
            Some(ratio) => ratio,
            None => DEFAULT_HELP_RATIO_PERCENT,
        };

        Self {
            exclude_tax: file.exclude_tax.unwrap_or(false),
            exclude_service_charge: file.exclude_service_charge.unwrap_or(true),
            rounding,
            rounding_timing: file.rounding_timing.unwrap_or_default(),
            multi_cast_distribution: file.multi_cast_distribution.unwrap_or_default(),
            help_distribution_method: file.help_distribution_method.unwrap_or_default(),
            help_ratio_percent,
            give_help_sales: file.give_help_sales.unwrap_or(false),
            nomination_distribute_all: file.nomination_distribute_all.unwrap_or(false),
        }
    }
}

/// Tax and service charge rates of the venue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeRates {
    /// Consumption tax percentage included in prices.
    pub tax_rate_percent: u32,
    /// Service charge percentage added to receipts.
    pub service_charge_rate_percent: u32,
}

/// The venue-wide policy the engine runs under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemPolicy {
    /// Tax and service charge rates.
    pub charges: ChargeRates,
    /// Rounding of receipt totals.
    pub receipt_rounding: Rounding,
    /// Names never classified as self or help (house and free-seating labels).
    pub non_help_names: Vec<String>,
    /// Policy for item-based aggregation.
    pub item_based: DistributionPolicy,
    /// Policy for receipt-based aggregation.
    pub receipt_based: DistributionPolicy,
}

impl Default for SystemPolicy {
    fn default() -> Self {
        Self::from_file(PolicyFile::default())
    }
}

impl SystemPolicy {
    /// Builds the policy from its file shape, applying every default once.
    pub fn from_file(file: PolicyFile) -> Self {
        let receipt_rounding = file
            .receipt_rounding
            .as_deref()
            .map(Rounding::parse)
            .unwrap_or(Rounding::DEFAULT);

        Self {
            charges: ChargeRates {
                tax_rate_percent: file.tax_rate_percent.unwrap_or(DEFAULT_TAX_RATE_PERCENT),
                service_charge_rate_percent: file.service_charge_rate_percent.unwrap_or(0),
            },
            receipt_rounding,
            non_help_names: file.non_help_names.unwrap_or_default(),
            item_based: DistributionPolicy::from_file(file.item_based.unwrap_or_default()),
            receipt_based: DistributionPolicy::from_file(file.receipt_based.unwrap_or_default()),
        }
    }

    /// Returns the distribution policy of an aggregation mode.
    pub fn distribution(&self, mode: SalesAggregationMode) -> &DistributionPolicy {
        match mode {
            SalesAggregationMode::ItemBased => &self.item_based,
            SalesAggregationMode::ReceiptBased => &self.receipt_based,
        }
    }
}

/// Store metadata from `store.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreMetadata {
    /// The store identifier.
    pub store_id: String,
    /// The store's display name.
    pub name: String,
    /// ISO currency code of all minor-unit amounts.
    pub currency: String,
}

/// `policy.yaml` as written by the administrator.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PolicyFile {
    /// Consumption tax percentage.
    pub tax_rate_percent: Option<u32>,
    /// Service charge percentage.
    pub service_charge_rate_percent: Option<u32>,
    /// Receipt total rounding directive.
    pub receipt_rounding: Option<String>,
    /// Names never classified as help.
    pub non_help_names: Option<Vec<String>>,
    /// Item-based distribution policy.
    pub item_based: Option<DistributionPolicyFile>,
    /// Receipt-based distribution policy.
    pub receipt_based: Option<DistributionPolicyFile>,
}

/// One mode's distribution policy as written in `policy.yaml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DistributionPolicyFile {
    /// Strip included tax.
    pub exclude_tax: Option<bool>,
    /// Leave the service charge out.
    pub exclude_service_charge: Option<bool>,
    /// Rounding directive such as `floor_100`.
    pub rounding: Option<String>,
    /// When to adjust.
    pub rounding_timing: Option<RoundingTiming>,
    /// Who may receive credit.
    pub multi_cast_distribution: Option<MultiCastDistribution>,
    /// Group split method.
    pub help_distribution_method: Option<HelpDistributionMethod>,
    /// Nominated group's percentage for the ratio method.
    pub help_ratio_percent: Option<u32>,
    /// Report help shares as sales.
    pub give_help_sales: Option<bool>,
    /// Spread over every nomination.
    pub nomination_distribute_all: Option<bool>,
}
