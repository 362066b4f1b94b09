//! Reactive entity index with predicate-filtered slices.
//!
//! An [`Index`] is the system of record: a keyed set of entities whose full
//! contents and incremental [`Delta`]s can be observed through replaying
//! multicast channels. Any number of labelled [`Slice`]s can be registered
//! against it. Each slice owns its own entries and channels and re-derives its
//! membership by evaluating its predicate on every event the index forwards.
//!
//! # Consistency
//!
//! After any index mutation returns, every slice holds exactly the index
//! entities its predicate accepts. Mutations run synchronously: the index and
//! all of its slices are updated, and every subscriber notified, before the
//! call returns. Predicates are evaluated for the index and every slice before
//! any state changes, so a panicking predicate leaves everything untouched.
//!
//! Callers needing shared access across threads wrap the whole [`Index`] in a
//! single lock; slices are owned by their index and never mutated separately.

mod entries;
mod index;
mod observable;
mod plan;
mod slice;

pub use entries::Entries;
pub use index::Index;
pub use observable::{ObservableCore, ObservableIndex, SortFn};
pub use slice::{Predicate, Slice};

pub use slicekit_channel::{ReplayChannel, Stream, Subscription};
pub use slicekit_types::{
    Config, Delta, DeltaKind, EntityKey, Error, KeyGenerator, Keyed, SequentialKeys, UuidKeys,
};

/// Bounds every entity stored in an index must satisfy.
pub trait Entity: Keyed + Clone + Send + Sync + 'static {}

impl<T: Keyed + Clone + Send + Sync + 'static> Entity for T {}
