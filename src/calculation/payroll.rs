//! Payroll orchestration.
//!
//! Runs one cast's pay calculation for one pay period:
//!
//! 1. validate the input;
//! 2. attribute every receipt of the period in both aggregation modes and
//!    total the cast's sales per day and for the period;
//! 3. for each enabled compensation type, compute product backs on the type's
//!    mode and evaluate the type;
//! 4. select the payable evaluation.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

use chrono::{NaiveDate, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::config::SystemPolicy;
use crate::error::EngineResult;
use crate::models::{
    AuditStep, AuditTrace, AuditWarning, Cast, DailySales, PayrollInput, PayrollResult,
    ReceiptAttribution, SalesAggregationMode, SalesSummary, TypeProductBacks,
};

use super::attribution::attribute_receipt;
use super::back_rate::BackRateResolver;
use super::compensation::{SalesByMode, evaluate_compensation};
use super::product_back::{ProductBackOptions, calculate_product_backs};
use super::selection::select_compensation;
use super::validation::validate_payroll_input;

/// Warning code for sales that fall in a gap of a sliding schedule.
pub const NO_SLIDING_TIER: &str = "NO_SLIDING_TIER";

/// Warning code for a cast with no enabled compensation type.
pub const NO_ENABLED_COMPENSATION_TYPE: &str = "NO_ENABLED_COMPENSATION_TYPE";

/// A cast's sales in one mode: the receipts' attributions and the totals.
struct ModeSales {
    attributions: Vec<ReceiptAttribution>,
    period: SalesSummary,
    daily: BTreeMap<NaiveDate, SalesSummary>,
}

fn aggregate_mode(
    input: &PayrollInput,
    policy: &SystemPolicy,
    mode: SalesAggregationMode,
) -> ModeSales {
    let attributions: Vec<ReceiptAttribution> = input
        .receipts
        .iter()
        .filter(|receipt| input.pay_period.contains_date(receipt.date))
        .map(|receipt| attribute_receipt(receipt, policy, mode))
        .collect();

    let mut period = SalesSummary::default();
    let mut daily: BTreeMap<NaiveDate, SalesSummary> = BTreeMap::new();
    for attribution in &attributions {
        if let Some(sales) = attribution.sales_for(&input.cast.name) {
            period.add(sales.self_sales, sales.help_sales);
            daily
                .entry(attribution.date)
                .or_default()
                .add(sales.self_sales, sales.help_sales);
        }
    }

    ModeSales {
        attributions,
        period,
        daily,
    }
}

fn sales_step(
    cast: &Cast,
    mode: SalesAggregationMode,
    sales: &ModeSales,
    step_number: u32,
) -> AuditStep {
    AuditStep {
        step_number,
        rule_id: format!("sales_{}", mode.as_str()),
        rule_name: match mode {
            SalesAggregationMode::ItemBased => "Item-Based Sales".to_string(),
            SalesAggregationMode::ReceiptBased => "Receipt-Based Sales".to_string(),
        },
        input: serde_json::json!({
            "cast_name": cast.name,
            "receipts": sales.attributions.len(),
        }),
        output: serde_json::json!({
            "self_sales": sales.period.self_sales,
            "help_sales": sales.period.help_sales,
            "total_sales": sales.period.total_sales,
            "days": sales.daily.len(),
        }),
        reasoning: format!(
            "{} self + {} help = {} over {} receipts",
            sales.period.self_sales,
            sales.period.help_sales,
            sales.period.total_sales,
            sales.attributions.len()
        ),
    }
}

/// Calculates one cast's pay for one pay period.
///
/// Receipts dated outside the pay period are ignored.
///
/// # Errors
///
/// Returns an error if the pay period is inverted, the work hours are
/// negative, two compensation types share an id, or a line item has a
/// negative price or quantity.
pub fn calculate_payroll(
    input: &PayrollInput,
    policy: &SystemPolicy,
) -> EngineResult<PayrollResult> {
    let start_time = Instant::now();
    validate_payroll_input(input)?;

    let mut steps: Vec<AuditStep> = Vec::new();
    let mut warnings: Vec<AuditWarning> = Vec::new();
    let mut step_number: u32 = 1;

    let item_based = aggregate_mode(input, policy, SalesAggregationMode::ItemBased);
    let receipt_based = aggregate_mode(input, policy, SalesAggregationMode::ReceiptBased);
    for (mode, mode_sales) in [
        (SalesAggregationMode::ItemBased, &item_based),
        (SalesAggregationMode::ReceiptBased, &receipt_based),
    ] {
        steps.push(sales_step(&input.cast, mode, mode_sales, step_number));
        step_number += 1;
    }

    let sales = SalesByMode {
        item_based: item_based.period,
        receipt_based: receipt_based.period,
    };

    let mut daily_sales: Vec<DailySales> = Vec::new();
    let dates: BTreeSet<NaiveDate> = item_based
        .daily
        .keys()
        .chain(receipt_based.daily.keys())
        .copied()
        .collect();
    for date in &dates {
        for (mode, mode_sales) in [
            (SalesAggregationMode::ItemBased, &item_based),
            (SalesAggregationMode::ReceiptBased, &receipt_based),
        ] {
            if let Some(summary) = mode_sales.daily.get(date) {
                daily_sales.push(DailySales {
                    date: *date,
                    mode,
                    sales: *summary,
                });
            }
        }
    }

    let resolver = BackRateResolver::new(&input.back_rates);
    let mut product_backs: Vec<TypeProductBacks> = Vec::new();
    let mut compensations = Vec::new();

    for ty in input.compensation.enabled_types() {
        let attributions = match ty.sales_aggregation_mode {
            SalesAggregationMode::ItemBased => &item_based.attributions,
            SalesAggregationMode::ReceiptBased => &receipt_based.attributions,
        };

        let backs = calculate_product_backs(
            attributions,
            &input.cast,
            &resolver,
            ProductBackOptions::from(ty),
            step_number,
        );
        steps.push(backs.audit_step);
        step_number += 1;

        let evaluation =
            evaluate_compensation(ty, input.work_hours, &sales, &backs.totals, step_number);
        steps.push(evaluation.audit_step);
        step_number += 1;

        if evaluation.commission.tier_missing {
            warnings.push(AuditWarning {
                code: NO_SLIDING_TIER.to_string(),
                message: format!(
                    "Sales of {} fall outside every sliding tier of '{}'; no commission paid",
                    evaluation.commission.sales, ty.id
                ),
                severity: "medium".to_string(),
            });
        }

        product_backs.push(TypeProductBacks {
            type_id: ty.id.clone(),
            backs: backs.totals,
        });
        compensations.push(evaluation.compensation);
    }

    if compensations.is_empty() {
        warnings.push(AuditWarning {
            code: NO_ENABLED_COMPENSATION_TYPE.to_string(),
            message: format!("Cast '{}' has no enabled compensation type", input.cast.id),
            severity: "high".to_string(),
        });
    }

    let selection = select_compensation(
        &compensations,
        input.compensation.payment_selection_method,
        input.compensation.selected_compensation_type_id.as_deref(),
        step_number,
    );
    steps.push(selection.audit_step);
    warnings.extend(selection.warning);

    let selected_total = selection.selected.as_ref().map_or(0, |s| s.total);
    let duration_us = start_time.elapsed().as_micros() as u64;

    debug!(
        cast_id = %input.cast.id,
        types = compensations.len(),
        selected_total,
        duration_us,
        "Payroll calculated"
    );

    Ok(PayrollResult {
        calculation_id: Uuid::new_v4(),
        timestamp: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        cast_id: input.cast.id.clone(),
        pay_period: input.pay_period.clone(),
        item_based_sales: item_based.period,
        receipt_based_sales: receipt_based.period,
        daily_sales,
        product_backs,
        compensations,
        selected: selection.selected,
        selected_total,
        audit_trace: AuditTrace {
            steps,
            warnings,
            duration_us,
        },
    })
}
