//! Input validation.
//!
//! Rejects caller contract violations before any arithmetic runs. Gaps in
//! configuration are not validated here; the calculations resolve them to zero.

use std::collections::HashSet;

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{CompensationType, PayPeriod, PayrollInput, Receipt};

/// Largest amount a single receipt may carry, in minor units.
///
/// Tax stripping and service charges multiply amounts by up to a few hundred,
/// and a pay period sums many receipts; this bound keeps all of it inside `i64`.
pub const MAX_RECEIPT_AMOUNT: i64 = 1_000_000_000_000;

/// Rejects line items with a negative price or quantity, and receipts whose
/// lines add up to more than [`MAX_RECEIPT_AMOUNT`].
pub fn validate_receipts(receipts: &[Receipt]) -> EngineResult<()> {
    for receipt in receipts {
        let mut receipt_total: i64 = 0;
        for item in &receipt.items {
            let invalid = |message: String| EngineError::InvalidLineItem {
                receipt_id: receipt.id.clone(),
                item_id: item.id.clone(),
                message,
            };

            if item.base_price < 0 {
                return Err(invalid(format!("negative price {}", item.base_price)));
            }
            if item.quantity < 0 {
                return Err(invalid(format!("negative quantity {}", item.quantity)));
            }

            receipt_total = item
                .checked_gross_amount()
                .and_then(|amount| receipt_total.checked_add(amount))
                .filter(|total| *total <= MAX_RECEIPT_AMOUNT)
                .ok_or_else(|| {
                    invalid(format!(
                        "amount {} x {} exceeds the receipt limit of {}",
                        item.base_price, item.quantity, MAX_RECEIPT_AMOUNT
                    ))
                })?;
        }
    }
    Ok(())
}

/// Rejects negative work hours.
pub fn validate_work_hours(cast_id: &str, work_hours: Decimal) -> EngineResult<()> {
    if work_hours < Decimal::ZERO {
        return Err(EngineError::InvalidWorkHours {
            cast_id: cast_id.to_string(),
            message: format!("hours cannot be negative, got {}", work_hours),
        });
    }
    Ok(())
}

/// Rejects a pay period that ends before it starts.
pub fn validate_pay_period(period: &PayPeriod) -> EngineResult<()> {
    if period.is_inverted() {
        return Err(EngineError::InvalidPayPeriod {
            start_date: period.start_date,
            end_date: period.end_date,
        });
    }
    Ok(())
}

/// Rejects compensation types sharing an id.
pub fn validate_compensation_types(types: &[CompensationType]) -> EngineResult<()> {
    let mut seen = HashSet::new();
    for ty in types {
        if !seen.insert(ty.id.as_str()) {
            return Err(EngineError::DuplicateCompensationType {
                type_id: ty.id.clone(),
            });
        }
    }
    Ok(())
}

/// Runs every validation on a payroll input.
pub fn validate_payroll_input(input: &PayrollInput) -> EngineResult<()> {
    validate_pay_period(&input.pay_period)?;
    validate_work_hours(&input.cast.id, input.work_hours)?;
    validate_compensation_types(&input.compensation.types)?;
    validate_receipts(&input.receipts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LineItem;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn receipt(price: i64, quantity: i64) -> Receipt {
        Receipt {
            id: "r_001".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            nominations: vec![],
            items: vec![LineItem {
                id: "item_1".to_string(),
                product_name: "Set".to_string(),
                category: None,
                base_price: price,
                quantity,
                cast_names: vec!["Aoi".to_string()],
            }],
        }
    }

    fn comp_type(id: &str) -> CompensationType {
        serde_json::from_value(serde_json::json!({ "id": id, "name": id })).unwrap()
    }

    #[test]
    fn test_negative_price_rejected() {
        match validate_receipts(&[receipt(-500, 1)]) {
            Err(EngineError::InvalidLineItem { item_id, message, .. }) => {
                assert_eq!(item_id, "item_1");
                assert!(message.contains("price"));
            }
            other => panic!("Expected InvalidLineItem, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_quantity_rejected() {
        match validate_receipts(&[receipt(500, -1)]) {
            Err(EngineError::InvalidLineItem { message, .. }) => {
                assert!(message.contains("quantity"));
            }
            other => panic!("Expected InvalidLineItem, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_price_accepted() {
        assert!(validate_receipts(&[receipt(0, 0)]).is_ok());
    }

    #[test]
    fn test_price_above_receipt_limit_rejected() {
        match validate_receipts(&[receipt(100_000_000_000_000_000, 1)]) {
            Err(EngineError::InvalidLineItem { item_id, message, .. }) => {
                assert_eq!(item_id, "item_1");
                assert!(message.contains("exceeds"));
            }
            other => panic!("Expected InvalidLineItem, got {:?}", other),
        }
    }

    #[test]
    fn test_quantity_overflow_rejected() {
        let result = validate_receipts(&[receipt(i64::MAX / 2, 3)]);
        assert!(matches!(result, Err(EngineError::InvalidLineItem { .. })));
    }

    #[test]
    fn test_receipt_limit_applies_to_line_sum() {
        let mut r = receipt(MAX_RECEIPT_AMOUNT, 1);
        assert!(validate_receipts(std::slice::from_ref(&r)).is_ok());

        let mut second = r.items[0].clone();
        second.id = "item_2".to_string();
        second.base_price = 1;
        r.items.push(second);

        match validate_receipts(&[r]) {
            Err(EngineError::InvalidLineItem { item_id, .. }) => assert_eq!(item_id, "item_2"),
            other => panic!("Expected InvalidLineItem, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_hours_rejected() {
        let result = validate_work_hours("cast_1", Decimal::from_str("-0.5").unwrap());
        assert!(matches!(result, Err(EngineError::InvalidWorkHours { .. })));
        assert!(validate_work_hours("cast_1", Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_inverted_period_rejected() {
        let period = PayPeriod {
            start_date: NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
        };
        assert!(matches!(
            validate_pay_period(&period),
            Err(EngineError::InvalidPayPeriod { .. })
        ));
    }

    #[test]
    fn test_duplicate_type_ids_rejected() {
        let types = vec![comp_type("a"), comp_type("b"), comp_type("a")];
        match validate_compensation_types(&types) {
            Err(EngineError::DuplicateCompensationType { type_id }) => assert_eq!(type_id, "a"),
            other => panic!("Expected DuplicateCompensationType, got {:?}", other),
        }
        assert!(validate_compensation_types(&types[..2]).is_ok());
    }
}
