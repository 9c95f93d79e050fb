//! # StableMap
//!
//! An insertion-ordered hash map for shared, concurrent use:
//! - Iteration in first-insertion order (updates keep their position)
//! - O(1) lookup / update / delete through a hash index
//! - Tombstoned deletes with amortized batch compaction
//! - Single-writer/multi-reader concurrency model
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  StableMap (RwLock guard)                    │
//! │        read: get / contains_key / snapshot iteration         │
//! │        write: insert / remove / clear / compact              │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │  Key Index  │ EntryId  │ Entry Store │
//!   │  (HashMap)  │ ───────▶ │  (SlotMap + │
//!   └─────────────┘          │   order)    │
//!                            └──────┬──────┘
//!                                   │ tombstones >= threshold
//!                                   ▼
//!                           ┌─────────────┐
//!                           │ Compaction  │
//!                           └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod map;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{StableMapError, Result};
pub use config::{Config, DEFAULT_COMPACTION_THRESHOLD};
pub use map::{materialize, CompactionStats, Iter, Keys, StableMap, Values};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of StableMap
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
