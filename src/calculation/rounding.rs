//! Rounding policy and integer money helpers.
//!
//! Rounding directives look like `floor_100`, `ceil_10` or `round_1000`, plus
//! the literals `round` (to the unit) and `none`. All arithmetic is on integer
//! minor units; nothing here touches floating point.

use std::fmt;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// The directive used when a configured directive cannot be parsed.
pub const DEFAULT_ROUNDING_DIRECTIVE: &str = "floor_100";

/// The rounding operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// Round down to the position.
    Floor,
    /// Round up to the position.
    Ceil,
    /// Round half up to the position.
    Round,
    /// Leave the amount unchanged.
    None,
}

/// A parsed rounding directive: round to a multiple of `position` using `mode`.
///
/// # Example
///
/// ```
/// use compensation_engine::calculation::{Rounding, RoundingMode};
///
/// let rounding = Rounding::parse("floor_100");
/// assert_eq!(rounding.mode, RoundingMode::Floor);
/// assert_eq!(rounding.apply(12345), 12300);
///
/// // Unparseable input falls back to floor_100.
/// assert_eq!(Rounding::parse("banana"), Rounding::DEFAULT);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rounding {
    /// The unit to round to; zero or less leaves amounts unchanged.
    pub position: i64,
    /// The rounding operation.
    pub mode: RoundingMode,
}

impl Rounding {
    /// `floor_100`, the documented fallback.
    pub const DEFAULT: Rounding = Rounding {
        position: 100,
        mode: RoundingMode::Floor,
    };

    /// The identity rounding.
    pub const NONE: Rounding = Rounding {
        position: 0,
        mode: RoundingMode::None,
    };

    /// Creates a rounding from its parts.
    pub fn new(position: i64, mode: RoundingMode) -> Self {
        Self { position, mode }
    }

    /// Parses a directive, falling back to [`Rounding::DEFAULT`] on malformed input.
    pub fn parse(directive: &str) -> Self {
        Self::try_parse(directive).unwrap_or_else(|| {
            warn!(
                directive = directive,
                fallback = DEFAULT_ROUNDING_DIRECTIVE,
                "Unparseable rounding directive"
            );
            Self::DEFAULT
        })
    }

    /// Parses a directive, returning `None` if it is malformed.
    ///
    /// A negative position counts as malformed.
    pub fn try_parse(directive: &str) -> Option<Self> {
        let directive = directive.trim().to_ascii_lowercase();

        match directive.as_str() {
            "none" => return Some(Self::NONE),
            "round" => return Some(Self::new(1, RoundingMode::Round)),
            _ => {}
        }

        let (mode, position) = directive.split_once('_')?;
        let mode = match mode {
            "floor" => RoundingMode::Floor,
            "ceil" => RoundingMode::Ceil,
            "round" => RoundingMode::Round,
            "none" => RoundingMode::None,
            _ => return None,
        };
        let position: i64 = position.parse().ok()?;
        if position < 0 {
            return None;
        }

        Some(Self::new(position, mode))
    }

    /// Applies the rounding to an amount.
    pub fn apply(&self, amount: i64) -> i64 {
        apply_rounding(amount, self.position, self.mode)
    }
}

impl Default for Rounding {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Rounding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mode {
            RoundingMode::None => write!(f, "none"),
            RoundingMode::Floor => write!(f, "floor_{}", self.position),
            RoundingMode::Ceil => write!(f, "ceil_{}", self.position),
            RoundingMode::Round => write!(f, "round_{}", self.position),
        }
    }
}

/// Rounds an amount to a multiple of `position`.
///
/// `mode = None` or `position <= 0` is the identity.
pub fn apply_rounding(amount: i64, position: i64, mode: RoundingMode) -> i64 {
    if position <= 0 {
        return amount;
    }

    match mode {
        RoundingMode::None => amount,
        RoundingMode::Floor => amount.div_euclid(position) * position,
        RoundingMode::Ceil => {
            let quotient = amount.div_euclid(position);
            if amount.rem_euclid(position) == 0 {
                quotient * position
            } else {
                (quotient + 1) * position
            }
        }
        RoundingMode::Round => (amount + position / 2).div_euclid(position) * position,
    }
}

/// Returns `floor(amount * percent / 100)`.
pub fn floor_percentage(amount: i64, percent: Decimal) -> i64 {
    let value = (Decimal::from(amount) * percent / Decimal::ONE_HUNDRED).floor();
    // Receipt amounts are bounded by validation, so this only fails for
    // percentages far outside any configured rate.
    debug_assert!(value.to_i64().is_some(), "percentage {} of {} overflows", percent, amount);
    value.to_i64().unwrap_or(0)
}

/// Removes an included tax: `floor(amount * 100 / (100 + tax_percent))`.
pub fn strip_tax(amount: i64, tax_percent: u32) -> i64 {
    (amount * 100).div_euclid(100 + i64::from(tax_percent))
}

/// Adds a service charge: `floor(amount * (100 + percent) / 100)`.
pub fn add_service_charge(amount: i64, service_charge_percent: u32) -> i64 {
    (amount * (100 + i64::from(service_charge_percent))).div_euclid(100)
}
