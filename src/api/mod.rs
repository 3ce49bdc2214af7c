//! HTTP API module for the Compensation Engine.
//!
//! This module provides the REST API endpoints for attributing receipts and
//! calculating cast pay.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{AttributeRequest, BatchRequest, CalculationRequest, PayPeriodRequest};
pub use response::{ApiError, AttributeResponse, BatchEntry, BatchResponse};
pub use state::AppState;
