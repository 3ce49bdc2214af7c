//! Commission calculation.
//!
//! A compensation type pays commission on the cast's aggregate sales, either at
//! a flat percentage or at the percentage of the sliding tier the sales fall in.
//!
//! ## Sliding tiers
//!
//! Tiers are scanned in ascending `min` order and the first tier covering the
//! sales (`min <= sales < max`, or `max == 0` for unbounded) applies. Sales in
//! a gap between tiers earn no commission.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{CompensationType, SlidingRateTier};

use super::rounding::floor_percentage;

/// The commission on one sales figure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionResult {
    /// The aggregate sales the commission was computed on.
    pub sales: i64,
    /// The applied percentage.
    pub rate_percent: Decimal,
    /// `floor(sales * rate_percent / 100)`.
    pub amount: i64,
    /// The sliding tier that applied, if the type uses sliding rates.
    pub tier: Option<SlidingRateTier>,
    /// True if the type uses sliding rates and no tier covered the sales.
    pub tier_missing: bool,
}

/// Finds the sliding tier covering a sales figure.
///
/// # Example
///
/// ```
/// use compensation_engine::calculation::find_sliding_tier;
/// use compensation_engine::models::SlidingRateTier;
/// use rust_decimal::Decimal;
///
/// let tiers = vec![
///     SlidingRateTier { min: 100000, max: 0, rate_percent: Decimal::from(45) },
///     SlidingRateTier { min: 0, max: 100000, rate_percent: Decimal::from(40) },
/// ];
///
/// assert_eq!(find_sliding_tier(&tiers, 99999).unwrap().rate_percent, Decimal::from(40));
/// assert_eq!(find_sliding_tier(&tiers, 100000).unwrap().rate_percent, Decimal::from(45));
/// ```
pub fn find_sliding_tier(tiers: &[SlidingRateTier], sales: i64) -> Option<&SlidingRateTier> {
    let mut ordered: Vec<&SlidingRateTier> = tiers.iter().collect();
    ordered.sort_by_key(|tier| tier.min);
    ordered.into_iter().find(|tier| tier.contains(sales))
}

/// Calculates the commission a compensation type pays on aggregate sales.
pub fn calculate_commission(sales: i64, ty: &CompensationType) -> CommissionResult {
    if !ty.use_sliding_rate {
        return CommissionResult {
            sales,
            rate_percent: ty.commission_rate_percent,
            amount: floor_percentage(sales, ty.commission_rate_percent),
            tier: None,
            tier_missing: false,
        };
    }

    match find_sliding_tier(&ty.sliding_rates, sales) {
        Some(tier) => CommissionResult {
            sales,
            rate_percent: tier.rate_percent,
            amount: floor_percentage(sales, tier.rate_percent),
            tier: Some(tier.clone()),
            tier_missing: false,
        },
        None => {
            debug!(type_id = %ty.id, sales, "No sliding tier covers sales");
            CommissionResult {
                sales,
                rate_percent: Decimal::ZERO,
                amount: 0,
                tier: None,
                tier_missing: true,
            }
        }
    }
}
