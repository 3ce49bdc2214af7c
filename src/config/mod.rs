//! Configuration loading and management for the Compensation Engine.
//!
//! This module provides functionality to load a venue's store metadata and
//! system policy (tax, service charge, rounding and per-mode distribution
//! policy) from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use compensation_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Loaded store: {}", config.store().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    ChargeRates, DEFAULT_HELP_RATIO_PERCENT, DEFAULT_TAX_RATE_PERCENT, DistributionPolicy,
    DistributionPolicyFile, HelpDistributionMethod, MultiCastDistribution, PolicyFile,
    RoundingTiming, StoreMetadata, SystemPolicy,
};
