//! Receipt totals.
//!
//! The POS view of a receipt: subtotal of every line, the service charge on
//! top, the total rounded with the venue's receipt rounding, and the tax
//! contained in that total.

use serde::{Deserialize, Serialize};

use crate::config::SystemPolicy;
use crate::models::Receipt;

use super::rounding::strip_tax;

/// The totals of one receipt, in minor currency units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptTotals {
    /// Sum of every line's gross amount.
    pub subtotal: i64,
    /// `floor(subtotal * service_charge_rate / 100)`.
    pub service_charge: i64,
    /// The tax included in `total`.
    pub tax: i64,
    /// Subtotal plus service charge, rounded with the receipt rounding.
    pub total: i64,
}

/// Calculates the totals of a receipt.
///
/// Every line counts, including lines with no cast.
///
/// # Example
///
/// ```
/// use compensation_engine::calculation::calculate_receipt_total;
/// use compensation_engine::config::SystemPolicy;
/// use compensation_engine::models::{LineItem, Receipt};
/// use chrono::NaiveDate;
///
/// let mut policy = SystemPolicy::default();
/// policy.charges.service_charge_rate_percent = 20;
///
/// let receipt = Receipt {
///     id: "r_001".to_string(),
///     date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
///     nominations: vec![],
///     items: vec![LineItem {
///         id: "i_1".to_string(),
///         product_name: "Set".to_string(),
///         category: None,
///         base_price: 10050,
///         quantity: 1,
///         cast_names: vec![],
///     }],
/// };
///
/// let totals = calculate_receipt_total(&receipt, &policy);
/// assert_eq!(totals.service_charge, 2010);
/// assert_eq!(totals.total, 12000);
/// ```
pub fn calculate_receipt_total(receipt: &Receipt, policy: &SystemPolicy) -> ReceiptTotals {
    let subtotal: i64 = receipt.items.iter().map(|item| item.gross_amount()).sum();
    let service_charge = (subtotal * i64::from(policy.charges.service_charge_rate_percent))
        .div_euclid(100);
    let total = policy.receipt_rounding.apply(subtotal + service_charge);
    let tax = total - strip_tax(total, policy.charges.tax_rate_percent);

    ReceiptTotals {
        subtotal,
        service_charge,
        tax,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::Rounding;
    use crate::models::LineItem;
    use chrono::NaiveDate;

    fn receipt(items: &[(i64, i64)]) -> Receipt {
        Receipt {
            id: "r_001".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            nominations: vec![],
            items: items
                .iter()
                .enumerate()
                .map(|(i, (price, qty))| LineItem {
                    id: format!("i_{}", i),
                    product_name: "Set".to_string(),
                    category: None,
                    base_price: *price,
                    quantity: *qty,
                    cast_names: vec![],
                })
                .collect(),
        }
    }

    fn policy(service_charge: u32, rounding: &str) -> SystemPolicy {
        let mut policy = SystemPolicy::default();
        policy.charges.tax_rate_percent = 10;
        policy.charges.service_charge_rate_percent = service_charge;
        policy.receipt_rounding = Rounding::parse(rounding);
        policy
    }

    #[test]
    fn test_subtotal_counts_quantity() {
        let totals = calculate_receipt_total(&receipt(&[(5000, 2), (1000, 1)]), &policy(0, "none"));
        assert_eq!(totals.subtotal, 11000);
        assert_eq!(totals.service_charge, 0);
        assert_eq!(totals.total, 11000);
        assert_eq!(totals.tax, 1000);
    }

    #[test]
    fn test_service_charge_and_rounding() {
        let totals = calculate_receipt_total(&receipt(&[(12345, 1)]), &policy(20, "floor_100"));
        assert_eq!(totals.service_charge, 2469);
        // 14814 floored to 14800; 14800 * 100 / 110 = 13454
        assert_eq!(totals.total, 14800);
        assert_eq!(totals.tax, 1346);
    }

    #[test]
    fn test_empty_receipt_is_zero() {
        assert_eq!(
            calculate_receipt_total(&receipt(&[]), &policy(20, "floor_100")),
            ReceiptTotals::default()
        );
    }
}
