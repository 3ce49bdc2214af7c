//! Receipt, line item and nomination models.
//!
//! Receipts arrive already materialized from the POS. The engine never
//! mutates them; everything it derives lives in the attribution models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

fn default_quantity() -> i64 {
    1
}

/// A single product line on a receipt.
///
/// Prices are integers in the currency's minor unit. An item with no cast
/// names is "not included" and contributes nothing to any cast's sales.
///
/// # Example
///
/// ```
/// use compensation_engine::models::LineItem;
///
/// let item = LineItem {
///     id: "item_001".to_string(),
///     product_name: "Dom Perignon".to_string(),
///     category: Some("Champagne".to_string()),
///     base_price: 30000,
///     quantity: 2,
///     cast_names: vec!["Aoi".to_string()],
/// };
///
/// assert_eq!(item.gross_amount(), 60000);
/// assert!(item.is_included());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Unique identifier for the line item.
    pub id: String,
    /// The product name as rung up on the POS.
    pub product_name: String,
    /// The product category, if the product has one.
    #[serde(default)]
    pub category: Option<String>,
    /// Unit price in minor currency units.
    pub base_price: i64,
    /// Number of units sold on this line.
    #[serde(default = "default_quantity")]
    pub quantity: i64,
    /// The casts credited on this line, in POS order.
    #[serde(default)]
    pub cast_names: Vec<String>,
}

impl LineItem {
    /// Returns the line amount before any tax or rounding adjustment.
    ///
    /// Saturates on overflow; validation rejects such lines before any
    /// calculation runs.
    pub fn gross_amount(&self) -> i64 {
        self.base_price.saturating_mul(self.quantity)
    }

    /// Returns the line amount, or `None` if it does not fit in `i64`.
    pub fn checked_gross_amount(&self) -> Option<i64> {
        self.base_price.checked_mul(self.quantity)
    }

    /// Returns true if the item takes part in sales attribution.
    pub fn is_included(&self) -> bool {
        !self.cast_names.is_empty()
    }
}

/// A receipt (one table's bill) with its nominations and line items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Unique identifier for the receipt.
    pub id: String,
    /// The business date the receipt belongs to.
    pub date: NaiveDate,
    /// The casts nominated by the customer, in declaration order.
    #[serde(default)]
    pub nominations: Vec<String>,
    /// The line items rung up on this receipt.
    pub items: Vec<LineItem>,
}

/// A cast (staff member) whose pay is being calculated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cast {
    /// The cast's identifier, used to look up back-rate rules.
    pub id: String,
    /// The cast's display name, as it appears on line items.
    pub name: String,
}

/// The nominated ("self") casts of a receipt after exclusions.
///
/// Names in the non-help list (house or free-seating labels) are removed from
/// the nominations and are never classified as help either. An empty set after
/// exclusion marks a free-seating receipt.
///
/// # Example
///
/// ```
/// use compensation_engine::models::NominationSet;
///
/// let set = NominationSet::new(
///     &["Aoi".to_string(), "Free".to_string(), "Aoi".to_string()],
///     &["Free".to_string()],
/// );
///
/// assert_eq!(set.names(), &["Aoi".to_string()]);
/// assert!(set.is_nominated("Aoi"));
/// assert!(set.is_excluded("Free"));
/// assert!(!set.is_free_seating());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NominationSet {
    nominated: Vec<String>,
    non_help: Vec<String>,
}

impl NominationSet {
    /// Builds a nomination set, dropping duplicates and excluded names while
    /// preserving declaration order.
    pub fn new(nominations: &[String], non_help: &[String]) -> Self {
        let mut nominated: Vec<String> = Vec::with_capacity(nominations.len());
        for name in nominations {
            if non_help.contains(name) || nominated.contains(name) {
                continue;
            }
            nominated.push(name.clone());
        }

        Self {
            nominated,
            non_help: non_help.to_vec(),
        }
    }

    /// Returns the nominated names in declaration order.
    pub fn names(&self) -> &[String] {
        &self.nominated
    }

    /// Returns true if the name is one of the receipt's nominations.
    pub fn is_nominated(&self, name: &str) -> bool {
        self.nominated.iter().any(|n| n == name)
    }

    /// Returns true if the name must never be credited as self or help.
    pub fn is_excluded(&self, name: &str) -> bool {
        self.non_help.iter().any(|n| n == name)
    }

    /// Returns true if no nomination survives exclusion.
    pub fn is_free_seating(&self) -> bool {
        self.nominated.is_empty()
    }
}
