//! Back-rate resolution.
//!
//! Finds the back rule that applies to a cast selling a product, scanning only
//! the cast's active rules, most specific scope first:
//!
//! 1. exact `(category, product_name)`;
//! 2. `(category, product_name = None)`;
//! 3. `(category = None, product_name = None)`.
//!
//! No match is not an error; the cast simply earns no back on that product.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{BackRateRule, BackRateScope, BackType};

/// The effective back for one sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedBackRate {
    /// Ratio or fixed.
    pub back_type: BackType,
    /// The percentage for ratio backs.
    pub ratio: Decimal,
    /// The amount per unit for fixed backs.
    pub fixed_amount: i64,
    /// True if the ratio came from a precomputed sliding rate.
    pub is_sliding: bool,
    /// The scope of the matched rule.
    pub scope: BackRateScope,
}

/// Resolves back rates from a cast's rule table.
///
/// # Example
///
/// ```
/// use compensation_engine::calculation::BackRateResolver;
/// use compensation_engine::models::{BackRateRule, BackType};
/// use rust_decimal::Decimal;
///
/// let rules = vec![BackRateRule {
///     cast_id: "cast_001".to_string(),
///     category: None,
///     product_name: None,
///     back_type: BackType::Ratio,
///     self_back_ratio: None,
///     help_back_ratio: None,
///     back_ratio: Decimal::from(10),
///     back_fixed_amount: 0,
///     use_sliding_back: false,
///     calculated_sliding_rate: None,
///     is_active: true,
/// }];
///
/// let resolver = BackRateResolver::new(&rules);
/// let rate = resolver.resolve("cast_001", Some("Wine"), "House Red", true).unwrap();
/// assert_eq!(rate.ratio, Decimal::from(10));
/// assert!(resolver.resolve("cast_002", Some("Wine"), "House Red", true).is_none());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BackRateResolver<'a> {
    rules: &'a [BackRateRule],
}

impl<'a> BackRateResolver<'a> {
    /// Creates a resolver over a rule table.
    pub fn new(rules: &'a [BackRateRule]) -> Self {
        Self { rules }
    }

    fn active_rules<'b>(&'b self, cast_id: &'b str) -> impl Iterator<Item = &'a BackRateRule> + 'b {
        let rules: &'a [BackRateRule] = self.rules;
        rules
            .iter()
            .filter(move |rule| rule.is_active && rule.cast_id == cast_id)
    }

    /// Returns the rule that applies, by scope precedence.
    pub fn find_rule(
        &self,
        cast_id: &str,
        category: Option<&str>,
        product_name: &str,
    ) -> Option<&'a BackRateRule> {
        let exact = self.active_rules(cast_id).find(|rule| {
            rule.product_name.as_deref() == Some(product_name)
                && rule.category.as_deref() == category
        });
        if exact.is_some() {
            return exact;
        }

        if let Some(category) = category {
            let category_wide = self.active_rules(cast_id).find(|rule| {
                rule.product_name.is_none() && rule.category.as_deref() == Some(category)
            });
            if category_wide.is_some() {
                return category_wide;
            }
        }

        self.active_rules(cast_id)
            .find(|rule| rule.product_name.is_none() && rule.category.is_none())
    }

    /// Resolves the effective back for a cast selling a product as self or help.
    pub fn resolve(
        &self,
        cast_id: &str,
        category: Option<&str>,
        product_name: &str,
        is_self: bool,
    ) -> Option<ResolvedBackRate> {
        let Some(rule) = self.find_rule(cast_id, category, product_name) else {
            debug!(cast_id, product_name, "No back rule matched");
            return None;
        };

        Some(effective_rate(rule, is_self))
    }
}

/// Derives the effective back of a matched rule.
///
/// A sliding rule with a precomputed rate always yields a ratio back at that
/// rate; the rate is not recomputed here.
fn effective_rate(rule: &BackRateRule, is_self: bool) -> ResolvedBackRate {
    if rule.use_sliding_back {
        if let Some(rate) = rule.calculated_sliding_rate {
            return ResolvedBackRate {
                back_type: BackType::Ratio,
                ratio: rate,
                fixed_amount: 0,
                is_sliding: true,
                scope: rule.scope(),
            };
        }
    }

    let specific = if is_self {
        rule.self_back_ratio
    } else {
        rule.help_back_ratio
    };

    ResolvedBackRate {
        back_type: rule.back_type,
        ratio: specific.unwrap_or(rule.back_ratio),
        fixed_amount: rule.back_fixed_amount,
        is_sliding: false,
        scope: rule.scope(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn rule(cast_id: &str, category: Option<&str>, product: Option<&str>, ratio: &str) -> BackRateRule {
        BackRateRule {
            cast_id: cast_id.to_string(),
            category: category.map(str::to_string),
            product_name: product.map(str::to_string),
            back_type: BackType::Ratio,
            self_back_ratio: None,
            help_back_ratio: None,
            back_ratio: dec(ratio),
            back_fixed_amount: 0,
            use_sliding_back: false,
            calculated_sliding_rate: None,
            is_active: true,
        }
    }

    #[test]
    fn test_category_rule_beats_cast_default() {
        let rules = vec![
            rule("c1", Some("Champagne"), None, "20"),
            rule("c1", None, None, "10"),
        ];
        let resolver = BackRateResolver::new(&rules);

        let champagne = resolver.resolve("c1", Some("Champagne"), "Cristal", true).unwrap();
        assert_eq!(champagne.ratio, dec("20"));
        assert_eq!(champagne.scope, BackRateScope::Category);

        let wine = resolver.resolve("c1", Some("Wine"), "House Red", true).unwrap();
        assert_eq!(wine.ratio, dec("10"));
        assert_eq!(wine.scope, BackRateScope::CastDefault);
    }

    #[test]
    fn test_product_rule_beats_category_rule() {
        let rules = vec![
            rule("c1", None, None, "10"),
            rule("c1", Some("Champagne"), None, "20"),
            rule("c1", Some("Champagne"), Some("Cristal"), "30"),
        ];
        let resolver = BackRateResolver::new(&rules);

        let rate = resolver.resolve("c1", Some("Champagne"), "Cristal", true).unwrap();
        assert_eq!(rate.ratio, dec("30"));
        assert_eq!(rate.scope, BackRateScope::Product);

        let other = resolver.resolve("c1", Some("Champagne"), "Moet", true).unwrap();
        assert_eq!(other.ratio, dec("20"));
    }

    #[test]
    fn test_product_rule_requires_matching_category() {
        let rules = vec![
            rule("c1", Some("Champagne"), Some("Cristal"), "30"),
            rule("c1", None, None, "10"),
        ];
        let resolver = BackRateResolver::new(&rules);

        let rate = resolver.resolve("c1", Some("Wine"), "Cristal", true).unwrap();
        assert_eq!(rate.ratio, dec("10"));
    }

    #[test]
    fn test_uncategorized_item_skips_category_rules() {
        let rules = vec![
            rule("c1", Some("Champagne"), None, "20"),
            rule("c1", None, None, "10"),
        ];
        let resolver = BackRateResolver::new(&rules);

        let rate = resolver.resolve("c1", None, "Set", true).unwrap();
        assert_eq!(rate.ratio, dec("10"));
    }

    #[test]
    fn test_inactive_and_foreign_rules_are_ignored() {
        let mut inactive = rule("c1", Some("Champagne"), None, "20");
        inactive.is_active = false;
        let rules = vec![inactive, rule("c2", None, None, "15")];
        let resolver = BackRateResolver::new(&rules);

        assert!(resolver.resolve("c1", Some("Champagne"), "Cristal", true).is_none());
    }

    #[test]
    fn test_self_and_help_ratios_fall_back_to_back_ratio() {
        let mut specific = rule("c1", None, None, "10");
        specific.self_back_ratio = Some(dec("12"));
        let rules = vec![specific];
        let resolver = BackRateResolver::new(&rules);

        assert_eq!(resolver.resolve("c1", None, "Set", true).unwrap().ratio, dec("12"));
        assert_eq!(resolver.resolve("c1", None, "Set", false).unwrap().ratio, dec("10"));
    }

    #[test]
    fn test_help_ratio_used_for_help_rows() {
        let mut specific = rule("c1", None, None, "10");
        specific.help_back_ratio = Some(dec("5"));
        let rules = vec![specific];
        let resolver = BackRateResolver::new(&rules);

        assert_eq!(resolver.resolve("c1", None, "Set", false).unwrap().ratio, dec("5"));
    }

    #[test]
    fn test_sliding_rate_forces_ratio() {
        let mut sliding = rule("c1", None, None, "10");
        sliding.back_type = BackType::Fixed;
        sliding.back_fixed_amount = 500;
        sliding.use_sliding_back = true;
        sliding.calculated_sliding_rate = Some(dec("17.5"));
        let rules = vec![sliding];
        let resolver = BackRateResolver::new(&rules);

        let rate = resolver.resolve("c1", None, "Set", false).unwrap();
        assert_eq!(rate.back_type, BackType::Ratio);
        assert_eq!(rate.ratio, dec("17.5"));
        assert!(rate.is_sliding);
    }

    #[test]
    fn test_sliding_without_precomputed_rate_uses_plain_ratio() {
        let mut sliding = rule("c1", None, None, "10");
        sliding.use_sliding_back = true;
        let rules = vec![sliding];
        let resolver = BackRateResolver::new(&rules);

        let rate = resolver.resolve("c1", None, "Set", true).unwrap();
        assert_eq!(rate.ratio, dec("10"));
        assert!(!rate.is_sliding);
    }

    #[test]
    fn test_fixed_rule_keeps_fixed_amount() {
        let mut fixed = rule("c1", Some("Champagne"), Some("Cristal"), "0");
        fixed.back_type = BackType::Fixed;
        fixed.back_fixed_amount = 3000;
        let rules = vec![fixed];
        let resolver = BackRateResolver::new(&rules);

        let rate = resolver.resolve("c1", Some("Champagne"), "Cristal", true).unwrap();
        assert_eq!(rate.back_type, BackType::Fixed);
        assert_eq!(rate.fixed_amount, 3000);
    }
}
