//! Sales attribution result models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::SalesAggregationMode;

/// One cast's share of one line item.
///
/// `calculated_share` is the share before the help-sales gate; it is the base
/// for product backs. `attributed_sales` is what is reported as sales.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributionRow {
    /// The credited cast.
    pub cast_name: String,
    /// True if the cast is credited as the nominated cast.
    pub is_self: bool,
    /// Sales reported for the cast.
    pub attributed_sales: i64,
    /// The share computed before the help-sales gate.
    pub calculated_share: i64,
}

/// The attribution of one line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAttribution {
    /// The attributed line item.
    pub item_id: String,
    /// The product name, kept for back-rate lookup.
    pub product_name: String,
    /// The product category, kept for back-rate lookup.
    pub category: Option<String>,
    /// Units sold on the line.
    pub quantity: i64,
    /// The amount that was distributed.
    pub base_amount: i64,
    /// False if the item carries no cast and is excluded from sales.
    pub included: bool,
    /// Nominated casts physically on the item (all casts when free seating).
    pub self_casts_on_item: Vec<String>,
    /// Non-nominated casts on the item.
    pub help_casts_on_item: Vec<String>,
    /// The breakdown in distribution order.
    pub rows: Vec<AttributionRow>,
}

impl ItemAttribution {
    /// Returns the sum of reported sales across the breakdown.
    pub fn total_attributed(&self) -> i64 {
        self.rows.iter().map(|r| r.attributed_sales).sum()
    }

    /// Returns the rows crediting the given cast.
    pub fn rows_for<'a>(&'a self, cast_name: &'a str) -> impl Iterator<Item = &'a AttributionRow> {
        self.rows.iter().filter(move |r| r.cast_name == cast_name)
    }
}

/// One cast's sales on one receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastSales {
    /// The cast.
    pub cast_name: String,
    /// Sales credited as the nominated cast.
    pub self_sales: i64,
    /// Sales credited as help.
    pub help_sales: i64,
}

impl CastSales {
    /// Returns self plus help sales.
    pub fn total(&self) -> i64 {
        self.self_sales + self.help_sales
    }
}

/// The attribution of a whole receipt in one aggregation mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptAttribution {
    /// The attributed receipt.
    pub receipt_id: String,
    /// The receipt's business date.
    pub date: NaiveDate,
    /// The aggregation mode used.
    pub mode: SalesAggregationMode,
    /// Per-item breakdowns in receipt order.
    pub items: Vec<ItemAttribution>,
    /// Per-cast totals in first-credited order, after any receipt-level adjustment.
    pub cast_sales: Vec<CastSales>,
}

impl ReceiptAttribution {
    /// Returns the totals for one cast, if the cast was credited.
    pub fn sales_for(&self, cast_name: &str) -> Option<&CastSales> {
        self.cast_sales.iter().find(|s| s.cast_name == cast_name)
    }
}
