//! Pay period model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Represents a pay period with its inclusive date range.
///
/// # Example
///
/// ```
/// use compensation_engine::models::PayPeriod;
/// use chrono::NaiveDate;
///
/// let period = PayPeriod {
///     start_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
/// };
///
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap())); // start date
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2026, 3, 31).unwrap())); // end date
/// assert!(!period.contains_date(NaiveDate::from_ymd_opt(2026, 4, 1).unwrap())); // after
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayPeriod {
    /// The start date of the pay period (inclusive).
    pub start_date: NaiveDate,
    /// The end date of the pay period (inclusive).
    pub end_date: NaiveDate,
}

impl PayPeriod {
    /// Checks if a given date falls within this pay period.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Returns true if the start date is after the end date.
    pub fn is_inverted(&self) -> bool {
        self.start_date > self.end_date
    }
}
