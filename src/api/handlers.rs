//! HTTP request handlers for the Compensation Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::batch::calculate_roster;
use crate::calculation::{
    attribute_receipt, calculate_payroll, calculate_receipt_total, validate_receipts,
};
use crate::error::EngineError;
use crate::models::{PayrollInput, SalesAggregationMode};

use super::request::{AttributeRequest, BatchRequest, CalculationRequest};
use super::response::{
    ApiError, ApiErrorResponse, AttributeResponse, BatchEntry, BatchResponse,
};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/attribute", post(attribute_handler))
        .route("/calculate", post(calculate_handler))
        .route("/batch", post(batch_handler))
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn engine_error_response(err: EngineError) -> Response {
    let api_error: ApiErrorResponse = err.into();
    json_response(api_error.status, api_error.error)
}

/// Maps a JSON extraction failure to a 400 response.
fn rejection_response(rejection: JsonRejection, correlation_id: Uuid) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's detailed message
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    json_response(StatusCode::BAD_REQUEST, error)
}

/// Handler for POST /attribute endpoint.
///
/// Attributes one receipt in the requested mode, or in both modes.
async fn attribute_handler(
    State(state): State<AppState>,
    payload: Result<Json<AttributeRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing attribution request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(rejection, correlation_id),
    };

    if let Err(err) = validate_receipts(std::slice::from_ref(&request.receipt)) {
        warn!(correlation_id = %correlation_id, error = %err, "Receipt rejected");
        return engine_error_response(err);
    }

    let policy = state.config().policy();
    let modes: Vec<SalesAggregationMode> = match request.mode {
        Some(mode) => vec![mode],
        None => SalesAggregationMode::ALL.to_vec(),
    };

    let attributions = modes
        .into_iter()
        .map(|mode| attribute_receipt(&request.receipt, policy, mode))
        .collect();
    let response = AttributeResponse {
        receipt_id: request.receipt.id.clone(),
        totals: calculate_receipt_total(&request.receipt, policy),
        attributions,
    };

    info!(
        correlation_id = %correlation_id,
        receipt_id = %response.receipt_id,
        total = response.totals.total,
        "Attribution completed successfully"
    );
    json_response(StatusCode::OK, response)
}

/// Handler for POST /calculate endpoint.
///
/// Accepts a calculation request and returns the cast's payroll result.
async fn calculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<CalculationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing calculation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(rejection, correlation_id),
    };

    let input: PayrollInput = request.into();
    let start_time = Instant::now();
    match calculate_payroll(&input, state.config().policy()) {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                cast_id = %result.cast_id,
                receipts_count = input.receipts.len(),
                selected_total = result.selected_total,
                duration_us = start_time.elapsed().as_micros(),
                "Calculation completed successfully"
            );
            json_response(StatusCode::OK, result)
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Calculation failed"
            );
            engine_error_response(err)
        }
    }
}

/// Handler for POST /batch endpoint.
///
/// Calculates every cast of the request; failures are reported per cast.
async fn batch_handler(
    State(state): State<AppState>,
    payload: Result<Json<BatchRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing batch request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(rejection, correlation_id),
    };

    let inputs: Vec<PayrollInput> = request.casts.into_iter().map(Into::into).collect();
    let start_time = Instant::now();
    let outcomes = calculate_roster(state.config().shared_policy(), inputs).await;

    let results: Vec<BatchEntry> = outcomes
        .into_iter()
        .map(|outcome| match outcome.result {
            Ok(result) => BatchEntry {
                cast_id: outcome.cast_id,
                result: Some(result),
                error: None,
            },
            Err(err) => {
                let api_error: ApiErrorResponse = err.into();
                BatchEntry {
                    cast_id: outcome.cast_id,
                    result: None,
                    error: Some(api_error.error),
                }
            }
        })
        .collect();
    let failed = results.iter().filter(|entry| entry.error.is_some()).count();
    let response = BatchResponse {
        succeeded: results.len() - failed,
        failed,
        results,
    };

    info!(
        correlation_id = %correlation_id,
        casts = response.results.len(),
        failed = response.failed,
        duration_us = start_time.elapsed().as_micros(),
        "Batch completed"
    );
    json_response(StatusCode::OK, response)
}
