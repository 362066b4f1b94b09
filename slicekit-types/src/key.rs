//! Entity keys and the key strategy.
//!
//! A key is assigned once, on first admission into an index, and read back
//! through [`Keyed`] for the rest of the entity's lifetime.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Opaque unique identifier of an entity within one index and its slices.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityKey(String);

impl EntityKey {
    /// Creates a fresh time-ordered key (UUID v7 text).
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Parses a key from a string. Empty or whitespace-only input is rejected.
    pub fn parse(s: &str) -> Result<Self> {
        if s.trim().is_empty() {
            return Err(Error::InvalidKey("key must not be empty".into()));
        }
        Ok(Self(s.to_string()))
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for EntityKey {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for EntityKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl AsRef<str> for EntityKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Read and write access to the key an entity carries.
///
/// `field` is the configured `guid_key`. Types with an intrinsic identifier
/// field are free to ignore it; dynamic record types use it to locate the key.
pub trait Keyed {
    /// Returns the entity's key, or `None` if it has not been admitted yet.
    fn key(&self, field: &str) -> Option<EntityKey>;

    /// Stores `key` on the entity. Called at most once per entity by an index.
    fn set_key(&mut self, field: &str, key: EntityKey);
}

/// Produces fresh keys for entities admitted without one.
///
/// Keys must be unique across the lifetime of one index.
pub trait KeyGenerator: Send + Sync {
    fn generate(&self) -> EntityKey;
}

/// Default generator: UUID v7 keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidKeys;

impl KeyGenerator for UuidKeys {
    fn generate(&self) -> EntityKey {
        EntityKey::new()
    }
}

/// Deterministic generator yielding `<prefix>-1`, `<prefix>-2`, ...
#[derive(Debug)]
pub struct SequentialKeys {
    prefix: String,
    next: AtomicU64,
}

impl SequentialKeys {
    /// Creates a generator whose first key is `<prefix>-1`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }
}

impl KeyGenerator for SequentialKeys {
    fn generate(&self) -> EntityKey {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        EntityKey(format!("{}-{}", self.prefix, n))
    }
}
