//! Core type definitions for slicekit.
//!
//! This crate defines the entity-agnostic types shared by the index, its
//! slices and their subscribers:
//! - Entity keys and the pluggable key strategy ([`Keyed`], [`KeyGenerator`])
//! - Typed deltas describing one mutation event ([`Delta`], [`DeltaKind`])
//! - Index and slice configuration ([`Config`])
//!
//! Entity types themselves are caller-defined. The only requirement the core
//! imposes on them is [`Keyed`].

mod config;
mod delta;
mod key;

pub use config::{Config, DEFAULT_GUID_KEY, DEFAULT_ID_KEY};
pub use delta::{Delta, DeltaKind};
pub use key::{EntityKey, KeyGenerator, Keyed, SequentialKeys, UuidKeys};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building keys, configs or records.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("expected a JSON object, got {0}")]
    NotAnObject(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
