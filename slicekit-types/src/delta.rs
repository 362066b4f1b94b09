//! Typed change records.
//!
//! A delta carries only the entities affected by one event for one observer.
//! The index and each of its slices derive their own deltas, so the same
//! mutation may produce different payloads (or none) per observer.

use serde::{Deserialize, Serialize};

/// The kind of mutation a [`Delta`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeltaKind {
    /// Initial content, published once at construction.
    Initialize,
    /// Entities admitted by a post.
    Post,
    /// Entities that entered through a put.
    Put,
    /// Entities removed.
    Delete,
    /// Everything was cleared; the payload is the prior membership.
    Reset,
}

/// Entities affected by a single mutation event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delta<E> {
    pub kind: DeltaKind,
    pub entries: Vec<E>,
}

impl<E> Delta<E> {
    pub fn new(kind: DeltaKind, entries: Vec<E>) -> Self {
        Self { kind, entries }
    }

    /// The empty INITIALIZE delta every channel starts from.
    pub fn initial() -> Self {
        Self::new(DeltaKind::Initialize, Vec::new())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<E> Default for Delta<E> {
    fn default() -> Self {
        Self::initial()
    }
}
