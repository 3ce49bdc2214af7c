//! Calculation logic for the Compensation Engine.
//!
//! This module contains every step of a cast's pay calculation: rounding,
//! back-rate resolution, sales attribution, product backs, commission,
//! compensation type evaluation and selection, plus receipt totals, input
//! validation and the payroll orchestrator that runs them in order.

mod attribution;
mod back_rate;
mod commission;
mod compensation;
mod payroll;
mod product_back;
mod receipt_total;
mod rounding;
mod selection;
mod validation;

pub use attribution::{adjust_amount, attribute_line_item, attribute_receipt, split_evenly};
pub use back_rate::{BackRateResolver, ResolvedBackRate};
pub use commission::{CommissionResult, calculate_commission, find_sliding_tier};
pub use compensation::{
    CompensationEvaluationResult, SalesByMode, evaluate_compensation, hourly_pay,
};
pub use payroll::{NO_ENABLED_COMPENSATION_TYPE, NO_SLIDING_TIER, calculate_payroll};
pub use product_back::{
    ProductBackOptions, ProductBackResult, back_amount, calculate_product_backs,
};
pub use receipt_total::{ReceiptTotals, calculate_receipt_total};
pub use rounding::{
    DEFAULT_ROUNDING_DIRECTIVE, Rounding, RoundingMode, add_service_charge, apply_rounding,
    floor_percentage, strip_tax,
};
pub use selection::{SELECTED_TYPE_UNAVAILABLE, SelectionResult, select_compensation};
pub use validation::{
    MAX_RECEIPT_AMOUNT, validate_compensation_types, validate_pay_period, validate_payroll_input, validate_receipts,
    validate_work_hours,
};
