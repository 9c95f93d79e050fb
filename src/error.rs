//! Error types for StableMap
//!
//! Map operations themselves are total; errors only come from
//! configuration and the stress tooling built on top of the map.

use thiserror::Error;

/// Result type alias using StableMapError
pub type Result<T> = std::result::Result<T, StableMapError>;

/// Unified error type for StableMap
#[derive(Debug, Error)]
pub enum StableMapError {
    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Concurrency Errors
    // -------------------------------------------------------------------------
    #[error("Worker thread failed: {0}")]
    Worker(String),
}
