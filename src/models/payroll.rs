//! Payroll input model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{BackRateRule, Cast, CompensationSettings, PayPeriod, Receipt};

/// Everything needed to calculate one cast's pay for one period.
///
/// The receipts are the venue's receipts for the period; the engine works out
/// which lines credit the cast. Work hours come from attendance, already
/// net of any penalties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollInput {
    /// The cast being paid.
    pub cast: Cast,
    /// The pay period.
    pub pay_period: PayPeriod,
    /// Hours worked in the period.
    #[serde(default)]
    pub work_hours: Decimal,
    /// Receipts of the period.
    #[serde(default)]
    pub receipts: Vec<Receipt>,
    /// The cast's back-rate rules.
    #[serde(default)]
    pub back_rates: Vec<BackRateRule>,
    /// The cast's compensation configuration.
    #[serde(default)]
    pub compensation: CompensationSettings,
}
