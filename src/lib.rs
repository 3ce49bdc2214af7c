//! Sales Attribution and Compensation Engine for hospitality venues
//!
//! This crate attributes receipt sales to the casts who served a table,
//! computes product backs and commission, evaluates each cast's compensation
//! types and selects the one to pay.

#![warn(missing_docs)]

pub mod api;
pub mod batch;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
