//! Compensation selection.
//!
//! Picks the payable evaluation: the highest total (first occurrence wins a
//! tie), or the designated type. A designated type that was not evaluated
//! falls back to the first evaluation and raises a warning.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::{AuditStep, AuditWarning, ComputedCompensation, PaymentSelectionMethod};

/// Warning code for a designated compensation type that was not evaluated.
pub const SELECTED_TYPE_UNAVAILABLE: &str = "SELECTED_TYPE_UNAVAILABLE";

/// The result of compensation selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionResult {
    /// The selected evaluation, or `None` if there were no evaluations.
    pub selected: Option<ComputedCompensation>,
    /// A warning if the designated type was unavailable.
    pub warning: Option<AuditWarning>,
    /// The audit step recording the selection.
    pub audit_step: AuditStep,
}

/// Returns the index of the first evaluation with the highest total.
fn highest_index(evaluations: &[ComputedCompensation]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (index, evaluation) in evaluations.iter().enumerate() {
        match best {
            Some(b) if evaluations[b].total >= evaluation.total => {}
            _ => best = Some(index),
        }
    }
    best
}

/// Selects the payable compensation.
///
/// # Example
///
/// ```
/// use compensation_engine::calculation::select_compensation;
/// use compensation_engine::models::{ComputedCompensation, PaymentSelectionMethod};
///
/// let evaluation = |id: &str, total: i64| ComputedCompensation {
///     type_id: id.to_string(),
///     type_name: id.to_string(),
///     hourly_pay: 0,
///     fixed_pay: total,
///     commission_back: 0,
///     self_product_back: 0,
///     help_product_back: 0,
///     total,
/// };
/// let evaluations = vec![evaluation("a", 50000), evaluation("b", 72000), evaluation("c", 72000)];
///
/// let result = select_compensation(&evaluations, PaymentSelectionMethod::Highest, None, 1);
/// assert_eq!(result.selected.unwrap().type_id, "b");
/// ```
pub fn select_compensation(
    evaluations: &[ComputedCompensation],
    method: PaymentSelectionMethod,
    specific_type_id: Option<&str>,
    step_number: u32,
) -> SelectionResult {
    let mut warning = None;

    let index = match method {
        PaymentSelectionMethod::Highest => highest_index(evaluations),
        PaymentSelectionMethod::Specific => {
            let found = specific_type_id
                .and_then(|id| evaluations.iter().position(|e| e.type_id == id));
            if found.is_none() && !evaluations.is_empty() {
                let requested = specific_type_id.unwrap_or("<none>");
                warn!(
                    requested,
                    fallback = %evaluations[0].type_id,
                    "Designated compensation type unavailable"
                );
                warning = Some(AuditWarning {
                    code: SELECTED_TYPE_UNAVAILABLE.to_string(),
                    message: format!(
                        "Compensation type '{}' is absent or disabled; paying '{}' instead",
                        requested, evaluations[0].type_id
                    ),
                    severity: "high".to_string(),
                });
            }
            found.or(if evaluations.is_empty() { None } else { Some(0) })
        }
    };

    let selected = index.map(|i| evaluations[i].clone());

    let audit_step = AuditStep {
        step_number,
        rule_id: "compensation_selection".to_string(),
        rule_name: "Compensation Selection".to_string(),
        input: serde_json::json!({
            "method": method,
            "specific_type_id": specific_type_id,
            "candidates": evaluations
                .iter()
                .map(|e| serde_json::json!({ "type_id": e.type_id, "total": e.total }))
                .collect::<Vec<_>>(),
        }),
        output: serde_json::json!({
            "selected_type_id": selected.as_ref().map(|s| s.type_id.clone()),
            "selected_total": selected.as_ref().map_or(0, |s| s.total),
        }),
        reasoning: match (&selected, method) {
            (None, _) => "No enabled compensation types; nothing selected".to_string(),
            (Some(s), PaymentSelectionMethod::Highest) => {
                format!("Highest total is '{}' at {}", s.type_id, s.total)
            }
            (Some(s), PaymentSelectionMethod::Specific) if warning.is_some() => {
                format!("Designated type unavailable; fell back to '{}' at {}", s.type_id, s.total)
            }
            (Some(s), PaymentSelectionMethod::Specific) => {
                format!("Designated type '{}' at {}", s.type_id, s.total)
            }
        },
    };

    SelectionResult {
        selected,
        warning,
        audit_step,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluation(id: &str, total: i64) -> ComputedCompensation {
        ComputedCompensation {
            type_id: id.to_string(),
            type_name: id.to_uppercase(),
            hourly_pay: total,
            fixed_pay: 0,
            commission_back: 0,
            self_product_back: 0,
            help_product_back: 0,
            total,
        }
    }

    #[test]
    fn test_highest_tie_picks_first_occurrence() {
        let evaluations = vec![
            evaluation("a", 50000),
            evaluation("b", 72000),
            evaluation("c", 72000),
        ];
        for _ in 0..10 {
            let result =
                select_compensation(&evaluations, PaymentSelectionMethod::Highest, None, 1);
            assert_eq!(result.selected.unwrap().type_id, "b");
            assert!(result.warning.is_none());
        }
    }

    #[test]
    fn test_highest_ignores_specific_id() {
        let evaluations = vec![evaluation("a", 10), evaluation("b", 20)];
        let result =
            select_compensation(&evaluations, PaymentSelectionMethod::Highest, Some("a"), 1);
        assert_eq!(result.selected.unwrap().type_id, "b");
    }

    #[test]
    fn test_specific_picks_designated() {
        let evaluations = vec![evaluation("a", 90000), evaluation("b", 20000)];
        let result =
            select_compensation(&evaluations, PaymentSelectionMethod::Specific, Some("b"), 1);
        assert_eq!(result.selected.unwrap().total, 20000);
        assert!(result.warning.is_none());
    }

    #[test]
    fn test_specific_missing_falls_back_with_warning() {
        let evaluations = vec![evaluation("a", 10000), evaluation("b", 20000)];
        let result =
            select_compensation(&evaluations, PaymentSelectionMethod::Specific, Some("z"), 3);

        assert_eq!(result.selected.unwrap().type_id, "a");
        let warning = result.warning.unwrap();
        assert_eq!(warning.code, SELECTED_TYPE_UNAVAILABLE);
        assert!(warning.message.contains("'z'"));
        assert_eq!(result.audit_step.step_number, 3);
    }

    #[test]
    fn test_specific_without_id_falls_back() {
        let evaluations = vec![evaluation("a", 10000)];
        let result = select_compensation(&evaluations, PaymentSelectionMethod::Specific, None, 1);
        assert_eq!(result.selected.unwrap().type_id, "a");
        assert!(result.warning.is_some());
    }

    #[test]
    fn test_no_evaluations_selects_nothing() {
        for method in [PaymentSelectionMethod::Highest, PaymentSelectionMethod::Specific] {
            let result = select_compensation(&[], method, Some("a"), 1);
            assert!(result.selected.is_none());
            assert!(result.warning.is_none());
            assert_eq!(result.audit_step.output["selected_total"], 0);
        }
    }
}
