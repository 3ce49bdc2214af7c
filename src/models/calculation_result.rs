//! Calculation result models for the Compensation Engine.
//!
//! This module contains the [`PayrollResult`] type and its associated structures
//! that capture all outputs of a cast's pay calculation: sales per aggregation
//! mode and day, product backs, every evaluated compensation type, the selected
//! one, and an audit trace.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{BackRateScope, BackType, ComputedCompensation, PayPeriod, SalesAggregationMode};

/// Self, help and total sales of one cast.
///
/// # Example
///
/// ```
/// use compensation_engine::models::SalesSummary;
///
/// let mut summary = SalesSummary::default();
/// summary.add(12000, 3000);
/// assert_eq!(summary.total_sales, 15000);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesSummary {
    /// Sales credited as the nominated cast.
    pub self_sales: i64,
    /// Sales credited as help.
    pub help_sales: i64,
    /// Self plus help sales.
    pub total_sales: i64,
}

impl SalesSummary {
    /// Adds self and help sales to the summary.
    pub fn add(&mut self, self_sales: i64, help_sales: i64) {
        self.self_sales += self_sales;
        self.help_sales += help_sales;
        self.total_sales = self.self_sales + self.help_sales;
    }
}

/// One day's sales of a cast in one aggregation mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySales {
    /// The business date.
    pub date: NaiveDate,
    /// The aggregation mode.
    pub mode: SalesAggregationMode,
    /// The day's sales.
    pub sales: SalesSummary,
}

/// A single product back earned on one breakdown row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductBackLine {
    /// The receipt of the item.
    pub receipt_id: String,
    /// The line item.
    pub item_id: String,
    /// The product name.
    pub product_name: String,
    /// True if earned as the nominated cast.
    pub is_self: bool,
    /// The amount the rate was applied to.
    pub base: i64,
    /// Ratio or fixed back.
    pub back_type: BackType,
    /// The applied percentage (ratio backs only).
    pub rate: Option<Decimal>,
    /// The rule scope that matched.
    pub scope: BackRateScope,
    /// The back amount.
    pub amount: i64,
}

/// Product back totals for one cast under one compensation type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductBackTotals {
    /// Sum of backs earned as the nominated cast.
    pub self_back: i64,
    /// Sum of backs earned as help.
    pub help_back: i64,
    /// The individual backs.
    pub lines: Vec<ProductBackLine>,
}

impl ProductBackTotals {
    /// Records a back line and updates the matching total.
    pub fn push(&mut self, line: ProductBackLine) {
        if line.is_self {
            self.self_back += line.amount;
        } else {
            self.help_back += line.amount;
        }
        self.lines.push(line);
    }
}

/// Product backs computed for one compensation type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeProductBacks {
    /// The compensation type the backs were computed for.
    pub type_id: String,
    /// The back totals and lines.
    pub backs: ProductBackTotals,
}

/// A single step in the audit trace recording a calculation decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings flag input the engine tolerated but the caller should look at,
/// such as a designated compensation type that is not available.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a calculation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
    /// The total calculation duration in microseconds.
    pub duration_us: u64,
}

/// The complete result of one cast's pay calculation for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollResult {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that performed the calculation.
    pub engine_version: String,
    /// The cast the calculation is for.
    pub cast_id: String,
    /// The pay period for this calculation.
    pub pay_period: PayPeriod,
    /// Period sales under item-based aggregation.
    pub item_based_sales: SalesSummary,
    /// Period sales under receipt-based aggregation.
    pub receipt_based_sales: SalesSummary,
    /// Per-day sales for both modes, ordered by date then mode.
    pub daily_sales: Vec<DailySales>,
    /// Product backs per evaluated compensation type.
    pub product_backs: Vec<TypeProductBacks>,
    /// Every evaluated compensation type, in declaration order.
    pub compensations: Vec<ComputedCompensation>,
    /// The selected compensation, if any type was enabled.
    pub selected: Option<ComputedCompensation>,
    /// The payable amount (zero when nothing was selected).
    pub selected_total: i64,
    /// Complete audit trace of calculation decisions.
    pub audit_trace: AuditTrace,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(is_self: bool, amount: i64) -> ProductBackLine {
        ProductBackLine {
            receipt_id: "r1".to_string(),
            item_id: "i1".to_string(),
            product_name: "Cristal".to_string(),
            is_self,
            base: 10000,
            back_type: BackType::Ratio,
            rate: Some(Decimal::from(10)),
            scope: BackRateScope::Product,
            amount,
        }
    }

    #[test]
    fn test_product_back_totals_split_by_side() {
        let mut totals = ProductBackTotals::default();
        totals.push(line(true, 1000));
        totals.push(line(false, 250));
        totals.push(line(true, 500));

        assert_eq!(totals.self_back, 1500);
        assert_eq!(totals.help_back, 250);
        assert_eq!(totals.lines.len(), 3);
    }

    #[test]
    fn test_sales_summary_accumulates() {
        let mut summary = SalesSummary::default();
        summary.add(1000, 0);
        summary.add(500, 250);
        assert_eq!(summary.self_sales, 1500);
        assert_eq!(summary.help_sales, 250);
        assert_eq!(summary.total_sales, 1750);
    }

    #[test]
    fn test_audit_warning_serialization() {
        let warning = AuditWarning {
            code: "NO_SLIDING_TIER".to_string(),
            message: "no tier".to_string(),
            severity: "medium".to_string(),
        };
        let json = serde_json::to_string(&warning).unwrap();
        assert!(json.contains("\"code\":\"NO_SLIDING_TIER\""));
        assert!(json.contains("\"severity\":\"medium\""));
    }

    #[test]
    fn test_product_back_line_serialization() {
        let json = serde_json::to_string(&line(false, 250)).unwrap();
        assert!(json.contains("\"back_type\":\"ratio\""));
        assert!(json.contains("\"scope\":\"product\""));
        assert!(json.contains("\"rate\":\"10\""));
    }
}
