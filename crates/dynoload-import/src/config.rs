//! Run configuration for the import pipeline
//!
//! The binary parses and validates the argument surface, then hands the
//! pipeline an [`ImportConfig`]; the pipeline itself never touches the
//! process environment.

use crate::batch::MAX_BATCH_SIZE;
use dynoload_common::types::{Delimiter, FieldClassification};
use dynoload_common::{LoadError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default checkpoint interval, in records written
pub const DEFAULT_PROGRESS_EVERY: u64 = 2500;

/// Validated configuration for one import run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    /// AWS region of the destination table
    pub region: String,

    /// Destination table name
    pub table: String,

    /// Path to the delimited input file
    pub csv_path: PathBuf,

    /// Input delimiter
    pub delimiter: Delimiter,

    /// Keep transport connections alive between batch writes.
    ///
    /// The SDK's pooled HTTP transport reuses connections on its own;
    /// `false` is accepted for compatibility and logged, not enforced.
    pub keep_alive: bool,

    /// Field name to destination type mapping
    pub classification: FieldClassification,

    /// Records per batch write; clamped to the store's limit of 25
    pub batch_size: usize,

    /// Log a progress line every this many written records (0 disables)
    pub progress_every: u64,

    /// Endpoint override for a local destination store
    pub endpoint_url: Option<String>,
}

impl ImportConfig {
    /// Configuration with defaults for everything beyond the three
    /// required settings
    pub fn new(
        region: impl Into<String>,
        table: impl Into<String>,
        csv_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            region: region.into(),
            table: table.into(),
            csv_path: csv_path.into(),
            delimiter: Delimiter::Comma,
            keep_alive: true,
            classification: FieldClassification::default(),
            batch_size: MAX_BATCH_SIZE,
            progress_every: DEFAULT_PROGRESS_EVERY,
            endpoint_url: None,
        }
    }

    /// Batch size within the destination store's accepted range
    pub fn effective_batch_size(&self) -> usize {
        self.batch_size.clamp(1, MAX_BATCH_SIZE)
    }

    /// Reject configurations the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.region.is_empty() {
            return Err(LoadError::config("region must not be empty"));
        }
        if self.table.is_empty() {
            return Err(LoadError::config("table must not be empty"));
        }
        if self.csv_path.as_os_str().is_empty() {
            return Err(LoadError::config("input file path must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_usable() {
        let config = ImportConfig::new("eu-west-2", "people", "./data.csv");
        assert!(config.validate().is_ok());
        assert_eq!(config.effective_batch_size(), MAX_BATCH_SIZE);
        assert_eq!(config.progress_every, DEFAULT_PROGRESS_EVERY);
        assert!(config.keep_alive);
    }

    #[test]
    fn batch_size_is_clamped() {
        let mut config = ImportConfig::new("eu-west-2", "people", "./data.csv");
        config.batch_size = 100;
        assert_eq!(config.effective_batch_size(), MAX_BATCH_SIZE);
        config.batch_size = 0;
        assert_eq!(config.effective_batch_size(), 1);
    }

    #[test]
    fn empty_required_settings_are_rejected() {
        assert!(ImportConfig::new("", "people", "./data.csv")
            .validate()
            .is_err());
        assert!(ImportConfig::new("eu-west-2", "", "./data.csv")
            .validate()
            .is_err());
        assert!(ImportConfig::new("eu-west-2", "people", "")
            .validate()
            .is_err());
    }
}
