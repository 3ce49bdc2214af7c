//! Request types for the Compensation Engine API.
//!
//! This module defines the JSON request structures for the `/attribute`,
//! `/calculate` and `/batch` endpoints.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{
    BackRateRule, Cast, CompensationSettings, PayPeriod, PayrollInput, Receipt,
    SalesAggregationMode,
};

/// Request body for the `/attribute` endpoint.
///
/// Attributes a single receipt. Without a mode, both modes are returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeRequest {
    /// The receipt to attribute.
    pub receipt: Receipt,
    /// Restrict the attribution to one aggregation mode.
    #[serde(default)]
    pub mode: Option<SalesAggregationMode>,
}

/// Request body for the `/calculate` endpoint.
///
/// Contains everything needed to calculate one cast's pay for a pay period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationRequest {
    /// The cast being paid.
    pub cast: Cast,
    /// The pay period for the calculation.
    pub pay_period: PayPeriodRequest,
    /// Hours worked in the period.
    #[serde(default)]
    pub work_hours: Decimal,
    /// The venue's receipts for the period.
    #[serde(default)]
    pub receipts: Vec<Receipt>,
    /// The cast's back-rate rules.
    #[serde(default)]
    pub back_rates: Vec<BackRateRule>,
    /// The cast's compensation types and selection method.
    #[serde(default)]
    pub compensation: CompensationSettings,
}

/// Pay period information in a calculation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayPeriodRequest {
    /// The start date of the pay period (inclusive).
    pub start_date: NaiveDate,
    /// The end date of the pay period (inclusive).
    pub end_date: NaiveDate,
}

/// Request body for the `/batch` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRequest {
    /// One calculation per cast.
    pub casts: Vec<CalculationRequest>,
}

impl From<PayPeriodRequest> for PayPeriod {
    fn from(req: PayPeriodRequest) -> Self {
        PayPeriod {
            start_date: req.start_date,
            end_date: req.end_date,
        }
    }
}

impl From<CalculationRequest> for PayrollInput {
    fn from(req: CalculationRequest) -> Self {
        PayrollInput {
            cast: req.cast,
            pay_period: req.pay_period.into(),
            work_hours: req.work_hours,
            receipts: req.receipts,
            back_rates: req.back_rates,
            compensation: req.compensation,
        }
    }
}
