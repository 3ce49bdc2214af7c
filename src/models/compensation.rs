//! Compensation type models.
//!
//! A compensation type is one complete pay formula. A cast may have several
//! per pay period; the business pays either the highest or a designated one.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The unit of account for "how much did this cast sell".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalesAggregationMode {
    /// Credit follows the casts named on each product line.
    #[default]
    ItemBased,
    /// Credit follows everyone who took part in the receipt.
    ReceiptBased,
}

impl SalesAggregationMode {
    /// Both modes in their fixed evaluation order.
    pub const ALL: [SalesAggregationMode; 2] = [
        SalesAggregationMode::ItemBased,
        SalesAggregationMode::ReceiptBased,
    ];

    /// Returns the snake_case name used in audit output.
    pub fn as_str(&self) -> &'static str {
        match self {
            SalesAggregationMode::ItemBased => "item_based",
            SalesAggregationMode::ReceiptBased => "receipt_based",
        }
    }
}

/// The base used for help product backs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HelpBackCalculationMethod {
    /// The help cast's calculated share of the item.
    #[default]
    SalesBased,
    /// The item's whole base amount, regardless of the share.
    FullAmount,
}

/// How the winning compensation type is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentSelectionMethod {
    /// Pay the evaluation with the highest total.
    #[default]
    Highest,
    /// Pay the designated compensation type.
    Specific,
}

/// One tier of a sliding commission schedule.
///
/// The tier covers `[min, max)`; a `max` of zero means unbounded.
///
/// # Example
///
/// ```
/// use compensation_engine::models::SlidingRateTier;
/// use rust_decimal::Decimal;
///
/// let tier = SlidingRateTier { min: 100000, max: 200000, rate_percent: Decimal::from(45) };
/// assert!(tier.contains(100000));
/// assert!(!tier.contains(200000));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlidingRateTier {
    /// Inclusive lower bound of aggregate sales.
    pub min: i64,
    /// Exclusive upper bound of aggregate sales, 0 for unbounded.
    #[serde(default)]
    pub max: i64,
    /// Commission percentage for this tier.
    pub rate_percent: Decimal,
}

impl SlidingRateTier {
    /// Returns true if the tier has no upper bound.
    pub fn is_unbounded(&self) -> bool {
        self.max == 0
    }

    /// Returns true if the sales figure falls inside this tier.
    pub fn contains(&self, sales: i64) -> bool {
        sales >= self.min && (self.is_unbounded() || sales < self.max)
    }
}

fn default_true() -> bool {
    true
}

/// A single pay formula configured for a cast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompensationType {
    /// Unique identifier of the type.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Disabled types are never evaluated.
    #[serde(default = "default_true")]
    pub is_enabled: bool,
    /// Which sales figure feeds commission and product backs.
    #[serde(default)]
    pub sales_aggregation_mode: SalesAggregationMode,
    /// Hourly pay in minor units; zero or less disables the hourly component.
    #[serde(default)]
    pub hourly_rate: i64,
    /// Fixed pay for the period in minor units.
    #[serde(default)]
    pub fixed_amount: i64,
    /// Flat commission percentage.
    #[serde(default)]
    pub commission_rate_percent: Decimal,
    /// Use `sliding_rates` instead of the flat percentage.
    #[serde(default)]
    pub use_sliding_rate: bool,
    /// Sliding commission schedule.
    #[serde(default)]
    pub sliding_rates: Vec<SlidingRateTier>,
    /// Include self product backs in the total.
    #[serde(default)]
    pub use_product_back: bool,
    /// Include help product backs in the total.
    #[serde(default)]
    pub use_help_product_back: bool,
    /// Base used for help product backs.
    #[serde(default)]
    pub help_back_calculation_method: HelpBackCalculationMethod,
}

/// The compensation configuration of one cast for one pay period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompensationSettings {
    /// The configured types, in declaration order.
    #[serde(default)]
    pub types: Vec<CompensationType>,
    /// How the winning type is chosen.
    #[serde(default)]
    pub payment_selection_method: PaymentSelectionMethod,
    /// The designated type for [`PaymentSelectionMethod::Specific`].
    #[serde(default)]
    pub selected_compensation_type_id: Option<String>,
}

impl CompensationSettings {
    /// Returns the enabled types in declaration order.
    pub fn enabled_types(&self) -> impl Iterator<Item = &CompensationType> {
        self.types.iter().filter(|t| t.is_enabled)
    }
}

/// The evaluated total of one compensation type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputedCompensation {
    /// The evaluated type.
    pub type_id: String,
    /// The type's display name.
    pub type_name: String,
    /// Hourly rate times work hours.
    pub hourly_pay: i64,
    /// Fixed pay.
    pub fixed_pay: i64,
    /// Flat or sliding commission on aggregate sales.
    pub commission_back: i64,
    /// Product backs earned as the nominated cast.
    pub self_product_back: i64,
    /// Product backs earned as help.
    pub help_product_back: i64,
    /// The payable total for this type.
    pub total: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unbounded_tier_contains_large_sales() {
        let tier = SlidingRateTier {
            min: 300000,
            max: 0,
            rate_percent: Decimal::from(55),
        };
        assert!(tier.is_unbounded());
        assert!(tier.contains(300000));
        assert!(tier.contains(9_000_000));
        assert!(!tier.contains(299999));
    }

    #[test]
    fn test_compensation_type_defaults() {
        let json = r#"{"id": "ct_1", "name": "Hourly"}"#;
        let ty: CompensationType = serde_json::from_str(json).unwrap();
        assert!(ty.is_enabled);
        assert_eq!(ty.sales_aggregation_mode, SalesAggregationMode::ItemBased);
        assert_eq!(ty.help_back_calculation_method, HelpBackCalculationMethod::SalesBased);
        assert_eq!(ty.hourly_rate, 0);
        assert!(ty.sliding_rates.is_empty());
    }

    #[test]
    fn test_enabled_types_skips_disabled() {
        let settings: CompensationSettings = serde_json::from_str(
            r#"{
                "types": [
                    {"id": "a", "name": "A"},
                    {"id": "b", "name": "B", "is_enabled": false},
                    {"id": "c", "name": "C"}
                ],
                "payment_selection_method": "specific",
                "selected_compensation_type_id": "c"
            }"#,
        )
        .unwrap();

        let ids: Vec<&str> = settings.enabled_types().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(settings.payment_selection_method, PaymentSelectionMethod::Specific);
    }

    #[test]
    fn test_aggregation_mode_serialization() {
        let json = serde_json::to_string(&SalesAggregationMode::ReceiptBased).unwrap();
        assert_eq!(json, "\"receipt_based\"");
        assert_eq!(SalesAggregationMode::ItemBased.as_str(), "item_based");
    }
}
