//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading a venue's
//! store metadata and system policy from YAML files.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::error::{EngineError, EngineResult};

use super::types::{PolicyFile, StoreMetadata, SystemPolicy};

/// Loads and provides access to venue configuration.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── store.yaml   # Store metadata
/// └── policy.yaml  # Tax, rounding and distribution policy
/// ```
///
/// # Example
///
/// ```no_run
/// use compensation_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// println!("Loaded store: {}", loader.store().name);
/// println!("Tax: {}%", loader.policy().charges.tax_rate_percent);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    store: StoreMetadata,
    policy: Arc<SystemPolicy>,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if either file is missing or is not valid YAML.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let store = Self::load_yaml::<StoreMetadata>(&path.join("store.yaml"))?;
        let policy_file = Self::load_yaml::<PolicyFile>(&path.join("policy.yaml"))?;
        let policy = SystemPolicy::from_file(policy_file);

        debug!(
            store_id = %store.store_id,
            tax_rate_percent = policy.charges.tax_rate_percent,
            receipt_rounding = %policy.receipt_rounding,
            "Loaded venue configuration"
        );

        Ok(Self::from_parts(store, policy))
    }

    /// Builds a loader from already constructed parts.
    pub fn from_parts(store: StoreMetadata, policy: SystemPolicy) -> Self {
        Self {
            store,
            policy: Arc::new(policy),
        }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the store metadata.
    pub fn store(&self) -> &StoreMetadata {
        &self.store
    }

    /// Returns the system policy.
    pub fn policy(&self) -> &SystemPolicy {
        &self.policy
    }

    /// Returns a shared handle to the system policy for worker tasks.
    pub fn shared_policy(&self) -> Arc<SystemPolicy> {
        Arc::clone(&self.policy)
    }
}
