//! Compensation type evaluation.
//!
//! Evaluates one compensation type against a cast's work hours, aggregate
//! sales and product backs. The total is
//!
//! ```text
//! hourly + fixed + commission
//!     + (use_product_back ? self back : 0)
//!     + (use_help_product_back ? help back : 0)
//! ```

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{
    AuditStep, CompensationType, ComputedCompensation, ProductBackTotals, SalesAggregationMode,
    SalesSummary,
};

use super::commission::{CommissionResult, calculate_commission};

/// A cast's period sales in both aggregation modes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesByMode {
    /// Item-based sales.
    pub item_based: SalesSummary,
    /// Receipt-based sales.
    pub receipt_based: SalesSummary,
}

impl SalesByMode {
    /// Returns the sales of one mode.
    pub fn for_mode(&self, mode: SalesAggregationMode) -> SalesSummary {
        match mode {
            SalesAggregationMode::ItemBased => self.item_based,
            SalesAggregationMode::ReceiptBased => self.receipt_based,
        }
    }
}

/// The result of evaluating one compensation type.
#[derive(Debug, Clone)]
pub struct CompensationEvaluationResult {
    /// The computed compensation.
    pub compensation: ComputedCompensation,
    /// The commission detail, for warnings and audit.
    pub commission: CommissionResult,
    /// The audit step recording this evaluation.
    pub audit_step: AuditStep,
}

/// Returns `floor(hourly_rate * work_hours)`, or zero when the rate is not positive.
///
/// # Example
///
/// ```
/// use compensation_engine::calculation::hourly_pay;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(hourly_pay(2500, Decimal::from_str("6.5").unwrap()), 16250);
/// assert_eq!(hourly_pay(0, Decimal::from(8)), 0);
/// ```
pub fn hourly_pay(hourly_rate: i64, work_hours: Decimal) -> i64 {
    if hourly_rate <= 0 {
        return 0;
    }

    (Decimal::from(hourly_rate) * work_hours)
        .floor()
        .to_i64()
        .unwrap_or(0)
}

/// Evaluates a compensation type.
///
/// # Arguments
///
/// * `ty` - The compensation type
/// * `work_hours` - Hours worked in the period
/// * `sales` - Period sales in both modes; the type's mode is used
/// * `backs` - Product backs computed for this type
/// * `step_number` - The step number for audit trail sequencing
pub fn evaluate_compensation(
    ty: &CompensationType,
    work_hours: Decimal,
    sales: &SalesByMode,
    backs: &ProductBackTotals,
    step_number: u32,
) -> CompensationEvaluationResult {
    let mode_sales = sales.for_mode(ty.sales_aggregation_mode);
    let commission = calculate_commission(mode_sales.total_sales, ty);

    let hourly = hourly_pay(ty.hourly_rate, work_hours);
    let self_product_back = if ty.use_product_back {
        backs.self_back
    } else {
        0
    };
    let help_product_back = if ty.use_help_product_back {
        backs.help_back
    } else {
        0
    };
    let total =
        hourly + ty.fixed_amount + commission.amount + self_product_back + help_product_back;

    debug!(
        type_id = %ty.id,
        hourly,
        commission = commission.amount,
        total,
        "Evaluated compensation type"
    );

    let compensation = ComputedCompensation {
        type_id: ty.id.clone(),
        type_name: ty.name.clone(),
        hourly_pay: hourly,
        fixed_pay: ty.fixed_amount,
        commission_back: commission.amount,
        self_product_back,
        help_product_back,
        total,
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "compensation_type".to_string(),
        rule_name: format!("Compensation Type: {}", ty.name),
        input: serde_json::json!({
            "type_id": ty.id,
            "sales_aggregation_mode": ty.sales_aggregation_mode,
            "aggregate_sales": mode_sales.total_sales,
            "work_hours": work_hours.to_string(),
            "hourly_rate": ty.hourly_rate,
            "use_sliding_rate": ty.use_sliding_rate,
            "commission_rate_percent": commission.rate_percent.to_string(),
        }),
        output: serde_json::json!({
            "hourly_pay": compensation.hourly_pay,
            "fixed_pay": compensation.fixed_pay,
            "commission_back": compensation.commission_back,
            "self_product_back": compensation.self_product_back,
            "help_product_back": compensation.help_product_back,
            "total": compensation.total,
        }),
        reasoning: format!(
            "{} hourly + {} fixed + {} commission ({}% of {}) + {} self back + {} help back = {}",
            compensation.hourly_pay,
            compensation.fixed_pay,
            compensation.commission_back,
            commission.rate_percent.normalize(),
            mode_sales.total_sales,
            compensation.self_product_back,
            compensation.help_product_back,
            compensation.total
        ),
    };

    CompensationEvaluationResult {
        compensation,
        commission,
        audit_step,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HelpBackCalculationMethod, SlidingRateTier};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn base_type() -> CompensationType {
        CompensationType {
            id: "ct_1".to_string(),
            name: "Standard".to_string(),
            is_enabled: true,
            sales_aggregation_mode: SalesAggregationMode::ItemBased,
            hourly_rate: 0,
            fixed_amount: 0,
            commission_rate_percent: Decimal::ZERO,
            use_sliding_rate: false,
            sliding_rates: vec![],
            use_product_back: false,
            use_help_product_back: false,
            help_back_calculation_method: HelpBackCalculationMethod::SalesBased,
        }
    }

    fn sales(item_total: i64, receipt_total: i64) -> SalesByMode {
        let mut by_mode = SalesByMode::default();
        by_mode.item_based.add(item_total, 0);
        by_mode.receipt_based.add(receipt_total, 0);
        by_mode
    }

    fn backs(self_back: i64, help_back: i64) -> ProductBackTotals {
        ProductBackTotals {
            self_back,
            help_back,
            lines: vec![],
        }
    }

    #[test]
    fn test_hourly_only() {
        let mut ty = base_type();
        ty.hourly_rate = 3000;

        let result = evaluate_compensation(&ty, dec("7.5"), &sales(0, 0), &backs(0, 0), 1);
        assert_eq!(result.compensation.hourly_pay, 22500);
        assert_eq!(result.compensation.total, 22500);
    }

    #[test]
    fn test_non_positive_hourly_rate_disables_hourly() {
        let mut ty = base_type();
        ty.hourly_rate = -1;
        ty.fixed_amount = 10000;

        let result = evaluate_compensation(&ty, dec("8"), &sales(0, 0), &backs(0, 0), 1);
        assert_eq!(result.compensation.hourly_pay, 0);
        assert_eq!(result.compensation.total, 10000);
    }

    #[test]
    fn test_commission_uses_type_mode() {
        let mut ty = base_type();
        ty.commission_rate_percent = dec("10");
        ty.sales_aggregation_mode = SalesAggregationMode::ReceiptBased;

        let result =
            evaluate_compensation(&ty, Decimal::ZERO, &sales(100000, 250000), &backs(0, 0), 1);
        assert_eq!(result.compensation.commission_back, 25000);
    }

    #[test]
    fn test_product_back_toggles() {
        let mut ty = base_type();
        ty.use_product_back = true;

        let result = evaluate_compensation(&ty, Decimal::ZERO, &sales(0, 0), &backs(4000, 1500), 1);
        assert_eq!(result.compensation.self_product_back, 4000);
        assert_eq!(result.compensation.help_product_back, 0);
        assert_eq!(result.compensation.total, 4000);

        ty.use_help_product_back = true;
        let result = evaluate_compensation(&ty, Decimal::ZERO, &sales(0, 0), &backs(4000, 1500), 1);
        assert_eq!(result.compensation.total, 5500);
    }

    #[test]
    fn test_full_formula() {
        let mut ty = base_type();
        ty.hourly_rate = 2000;
        ty.fixed_amount = 5000;
        ty.use_sliding_rate = true;
        ty.sliding_rates = vec![
            SlidingRateTier { min: 0, max: 100000, rate_percent: dec("40") },
            SlidingRateTier { min: 100000, max: 0, rate_percent: dec("45") },
        ];
        ty.use_product_back = true;
        ty.use_help_product_back = true;

        let result = evaluate_compensation(&ty, dec("5"), &sales(120000, 0), &backs(3000, 700), 4);
        // 10000 + 5000 + 54000 + 3000 + 700
        assert_eq!(result.compensation.total, 72700);
        assert_eq!(result.audit_step.step_number, 4);
        assert_eq!(result.audit_step.output["total"], 72700);
    }

    #[test]
    fn test_sliding_gap_reported() {
        let mut ty = base_type();
        ty.use_sliding_rate = true;
        ty.sliding_rates = vec![SlidingRateTier { min: 50000, max: 0, rate_percent: dec("40") }];

        let result = evaluate_compensation(&ty, Decimal::ZERO, &sales(10000, 0), &backs(0, 0), 1);
        assert!(result.commission.tier_missing);
        assert_eq!(result.compensation.commission_back, 0);
    }

    #[test]
    fn test_hourly_pay_floors_fractional_hours() {
        assert_eq!(hourly_pay(1999, dec("0.5")), 999);
    }
}
