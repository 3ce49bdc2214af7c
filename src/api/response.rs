//! Response types for the Compensation Engine API.
//!
//! This module defines the success and error response structures and error
//! handling for the HTTP API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::calculation::ReceiptTotals;
use crate::error::EngineError;
use crate::models::{PayrollResult, ReceiptAttribution};

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        match error {
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => {
                ApiErrorResponse {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    error: ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
                }
            }
            EngineError::InvalidLineItem { .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "INVALID_LINE_ITEM",
                    message,
                    "Line items must have a non-negative price and quantity",
                ),
            },
            EngineError::InvalidWorkHours { .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "INVALID_WORK_HOURS",
                    message,
                    "Work hours must not be negative",
                ),
            },
            EngineError::InvalidPayPeriod { .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "INVALID_PAY_PERIOD",
                    message,
                    "The pay period start date must not be after its end date",
                ),
            },
            EngineError::DuplicateCompensationType { .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "DUPLICATE_COMPENSATION_TYPE",
                    message,
                    "Compensation type ids must be unique per cast",
                ),
            },
            EngineError::CalculationError { message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("CALCULATION_ERROR", "Calculation failed", message),
            },
        }
    }
}

/// Response body for the `/attribute` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeResponse {
    /// The attributed receipt.
    pub receipt_id: String,
    /// The receipt's POS totals.
    pub totals: ReceiptTotals,
    /// One attribution per requested mode.
    pub attributions: Vec<ReceiptAttribution>,
}

/// One cast's entry in a `/batch` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchEntry {
    /// The cast the entry belongs to.
    pub cast_id: String,
    /// The payroll result, when the calculation succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<PayrollResult>,
    /// The error, when the calculation failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

/// Response body for the `/batch` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResponse {
    /// Entries in request order.
    pub results: Vec<BatchEntry>,
    /// Number of casts whose calculation succeeded.
    pub succeeded: usize,
    /// Number of casts whose calculation failed.
    pub failed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details"));
    }

    #[test]
    fn test_api_error_with_details_serialization() {
        let error = ApiError::with_details("TEST_ERROR", "Test message", "Some details");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"details\":\"Some details\""));
    }

    #[test]
    fn test_invalid_line_item_maps_to_bad_request() {
        let api_error: ApiErrorResponse = EngineError::InvalidLineItem {
            receipt_id: "r_001".to_string(),
            item_id: "i_001".to_string(),
            message: "negative price -1".to_string(),
        }
        .into();
        assert_eq!(api_error.status, StatusCode::BAD_REQUEST);
        assert_eq!(api_error.error.code, "INVALID_LINE_ITEM");
        assert!(api_error.error.message.contains("i_001"));
    }

    #[test]
    fn test_pay_period_and_duplicate_codes() {
        let api_error: ApiErrorResponse = EngineError::InvalidPayPeriod {
            start_date: NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
        }
        .into();
        assert_eq!(api_error.error.code, "INVALID_PAY_PERIOD");

        let api_error: ApiErrorResponse = EngineError::DuplicateCompensationType {
            type_id: "ct_1".to_string(),
        }
        .into();
        assert_eq!(api_error.status, StatusCode::BAD_REQUEST);
        assert_eq!(api_error.error.code, "DUPLICATE_COMPENSATION_TYPE");
    }

    #[test]
    fn test_config_errors_are_server_errors() {
        let api_error: ApiErrorResponse = EngineError::ConfigNotFound {
            path: "/missing/store.yaml".to_string(),
        }
        .into();
        assert_eq!(api_error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api_error.error.code, "CONFIG_ERROR");
        assert!(api_error.error.details.unwrap().contains("store.yaml"));
    }

    #[test]
    fn test_batch_entry_skips_empty_fields() {
        let entry = BatchEntry {
            cast_id: "cast_001".to_string(),
            result: None,
            error: Some(ApiError::validation_error("bad")),
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert!(!json.contains("\"result\""));
        assert!(json.contains("VALIDATION_ERROR"));
    }
}
