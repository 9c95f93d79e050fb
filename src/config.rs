//! Configuration for StableMap
//!
//! Per-instance tuning with sensible defaults.

use crate::error::{Result, StableMapError};

/// Tombstone count at which a delete triggers a compaction pass.
pub const DEFAULT_COMPACTION_THRESHOLD: usize = 100_000;

/// Configuration for a single `StableMap` instance
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    // -------------------------------------------------------------------------
    // Compaction Configuration
    // -------------------------------------------------------------------------
    /// Number of accumulated tombstones that makes the next delete
    /// rewrite the entry sequence. Must be at least 1.
    pub compaction_threshold: usize,

    // -------------------------------------------------------------------------
    // Allocation Configuration
    // -------------------------------------------------------------------------
    /// Entries to reserve up front (index, arena and order sequence)
    pub initial_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            compaction_threshold: DEFAULT_COMPACTION_THRESHOLD,
            initial_capacity: 0,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check the config for values the map cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.compaction_threshold == 0 {
            return Err(StableMapError::Config(
                "compaction_threshold must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the tombstone count that triggers compaction
    pub fn compaction_threshold(mut self, threshold: usize) -> Self {
        self.config.compaction_threshold = threshold;
        self
    }

    /// Set the number of entries to preallocate
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.config.initial_capacity = capacity;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
