//! Back-rate rule models.
//!
//! A back is a commission tied to product sales, configured per cast as a
//! percentage of the attributed amount or as a fixed amount per unit.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How a back amount is derived from a sale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackType {
    /// A percentage of the attributed amount.
    #[default]
    Ratio,
    /// A fixed amount per unit sold.
    Fixed,
}

/// The specificity of a back-rate rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackRateScope {
    /// Matches one product (within its category).
    Product,
    /// Matches every product of one category.
    Category,
    /// Matches anything the cast sells.
    CastDefault,
}

fn default_true() -> bool {
    true
}

/// A back-rate rule for one cast.
///
/// `category = None && product_name = None` is the cast-wide default;
/// `product_name = None` alone is a category default.
///
/// # Example
///
/// ```
/// use compensation_engine::models::{BackRateRule, BackRateScope, BackType};
/// use rust_decimal::Decimal;
///
/// let rule = BackRateRule {
///     cast_id: "cast_001".to_string(),
///     category: Some("Champagne".to_string()),
///     product_name: None,
///     back_type: BackType::Ratio,
///     self_back_ratio: None,
///     help_back_ratio: None,
///     back_ratio: Decimal::from(20),
///     back_fixed_amount: 0,
///     use_sliding_back: false,
///     calculated_sliding_rate: None,
///     is_active: true,
/// };
///
/// assert_eq!(rule.scope(), BackRateScope::Category);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackRateRule {
    /// The cast this rule belongs to.
    pub cast_id: String,
    /// The category the rule applies to.
    #[serde(default)]
    pub category: Option<String>,
    /// The product the rule applies to.
    #[serde(default)]
    pub product_name: Option<String>,
    /// Whether the back is a ratio or a fixed amount.
    #[serde(default)]
    pub back_type: BackType,
    /// Ratio applied when the cast is nominated on the receipt.
    #[serde(default)]
    pub self_back_ratio: Option<Decimal>,
    /// Ratio applied when the cast is helping.
    #[serde(default)]
    pub help_back_ratio: Option<Decimal>,
    /// Fallback ratio when the self/help specific ratio is absent.
    #[serde(default)]
    pub back_ratio: Decimal,
    /// Fixed amount per unit for fixed backs.
    #[serde(default)]
    pub back_fixed_amount: i64,
    /// Whether the ratio comes from a sliding schedule.
    #[serde(default)]
    pub use_sliding_back: bool,
    /// The sliding ratio already resolved from cumulative sales.
    #[serde(default)]
    pub calculated_sliding_rate: Option<Decimal>,
    /// Inactive rules are ignored.
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl BackRateRule {
    /// Returns how specific this rule is.
    pub fn scope(&self) -> BackRateScope {
        match (&self.category, &self.product_name) {
            (_, Some(_)) => BackRateScope::Product,
            (Some(_), None) => BackRateScope::Category,
            (None, None) => BackRateScope::CastDefault,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_rule_deserializes_with_defaults() {
        let json = r#"{"cast_id": "cast_1", "back_ratio": "10"}"#;
        let rule: BackRateRule = serde_json::from_str(json).unwrap();
        assert_eq!(rule.back_type, BackType::Ratio);
        assert_eq!(rule.back_ratio, Decimal::from(10));
        assert!(rule.is_active);
        assert!(!rule.use_sliding_back);
        assert_eq!(rule.scope(), BackRateScope::CastDefault);
    }

    #[test]
    fn test_product_rule_scope() {
        let json = r#"{
            "cast_id": "cast_1",
            "category": "Champagne",
            "product_name": "Cristal",
            "back_type": "fixed",
            "back_fixed_amount": 3000
        }"#;
        let rule: BackRateRule = serde_json::from_str(json).unwrap();
        assert_eq!(rule.scope(), BackRateScope::Product);
        assert_eq!(rule.back_type, BackType::Fixed);
        assert_eq!(rule.back_fixed_amount, 3000);
    }
}
