//! Core data models for the Compensation Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod attribution;
mod back_rate;
mod calculation_result;
mod compensation;
mod pay_period;
mod payroll;
mod receipt;

pub use attribution::{AttributionRow, CastSales, ItemAttribution, ReceiptAttribution};
pub use back_rate::{BackRateRule, BackRateScope, BackType};
pub use calculation_result::{
    AuditStep, AuditTrace, AuditWarning, DailySales, PayrollResult, ProductBackLine,
    ProductBackTotals, SalesSummary, TypeProductBacks,
};
pub use compensation::{
    CompensationSettings, CompensationType, ComputedCompensation, HelpBackCalculationMethod,
    PaymentSelectionMethod, SalesAggregationMode, SlidingRateTier,
};
pub use pay_period::PayPeriod;
pub use payroll::PayrollInput;
pub use receipt::{Cast, LineItem, NominationSet, Receipt};
