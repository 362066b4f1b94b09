//! Shared observable base of [`Index`](crate::Index) and [`Slice`](crate::Slice).

use crate::{Entity, Entries};
use slicekit_channel::{ReplayChannel, Stream, Subscription};
use slicekit_types::{Config, Delta, DeltaKind, EntityKey};
use std::cmp::Ordering;
use std::sync::Arc;

/// Comparator applied to snapshots before delivery.
pub type SortFn<E> = Arc<dyn Fn(&E, &E) -> Ordering + Send + Sync>;

/// Entries plus the snapshot and delta channels that publish them.
pub struct ObservableCore<E> {
    entries: Entries<E>,
    snapshots: ReplayChannel<Vec<E>>,
    deltas: ReplayChannel<Delta<E>>,
    config: Config,
}

impl<E: Entity> ObservableCore<E> {
    pub(crate) fn new(config: Config) -> Self {
        Self {
            entries: Entries::new(),
            snapshots: ReplayChannel::new(Vec::new()),
            deltas: ReplayChannel::new(Delta::initial()),
            config,
        }
    }

    pub fn entries(&self) -> &Entries<E> {
        &self.entries
    }

    pub(crate) fn entries_mut(&mut self) -> &mut Entries<E> {
        &mut self.entries
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Key field every entity in this index is read through.
    pub(crate) fn guid_key(&self) -> &str {
        &self.config.guid_key
    }

    /// Publishes a delta, then the full snapshot it produced.
    pub(crate) fn publish(&self, kind: DeltaKind, entries: Vec<E>) {
        self.deltas.publish(Delta::new(kind, entries));
        self.snapshots.publish(self.entries.to_vec());
    }

    /// Publishes RESET with the prior membership and an empty snapshot, then
    /// clears the entries. Returns how many entities were dropped.
    pub(crate) fn reset(&mut self) -> usize {
        let prior = self.entries.to_vec();
        let count = prior.len();
        self.deltas.publish(Delta::new(DeltaKind::Reset, prior));
        self.snapshots.publish(Vec::new());
        self.entries.clear();
        count
    }

    pub(crate) fn complete(&self) {
        self.deltas.complete();
        self.snapshots.complete();
    }

    pub fn snapshots(&self) -> &ReplayChannel<Vec<E>> {
        &self.snapshots
    }

    pub fn deltas(&self) -> &ReplayChannel<Delta<E>> {
        &self.deltas
    }
}

fn sorted<E: Clone>(snapshot: &[E], sort: Option<&SortFn<E>>) -> Vec<E> {
    let mut out = snapshot.to_vec();
    if let Some(cmp) = sort {
        out.sort_by(|a, b| cmp(a, b));
    }
    out
}

/// Read-only queries and subscriptions shared by indices and slices.
///
/// Only [`core`](Self::core) is required; everything else is derived from it.
pub trait ObservableIndex<E: Entity> {
    fn core(&self) -> &ObservableCore<E>;

    /// Stream of full snapshots, starting with the current one.
    ///
    /// With a comparator each delivered snapshot is sorted; the stored entries
    /// are not reordered. The sorted copy is built on every publish and held
    /// until read, so an idle stream should be dropped.
    fn observe(&self, sort: Option<SortFn<E>>) -> Stream<Vec<E>> {
        self.core()
            .snapshots
            .stream_map(move |snapshot: &Vec<E>| sorted(snapshot, sort.as_ref()))
    }

    /// Callback form of [`observe`](Self::observe).
    fn observe_with<F>(&self, sort: Option<SortFn<E>>, callback: F) -> Subscription
    where
        F: Fn(&[E]) + Send + Sync + 'static,
    {
        self.core().snapshots.subscribe(move |snapshot: &Vec<E>| match &sort {
            Some(cmp) => callback(sorted(snapshot, Some(cmp)).as_slice()),
            None => callback(snapshot.as_slice()),
        })
    }

    /// Stream of deltas, starting with the most recent one.
    fn observe_delta(&self) -> Stream<Delta<E>> {
        self.core().deltas.stream()
    }

    fn observe_delta_with<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Delta<E>) + Send + Sync + 'static,
    {
        self.core().deltas.subscribe(callback)
    }

    /// Entry count after every snapshot publish.
    fn observe_count(&self) -> Stream<usize> {
        self.core().snapshots.stream_map(|snapshot: &Vec<E>| snapshot.len())
    }

    /// Emptiness after every snapshot publish.
    fn observe_is_empty(&self) -> Stream<bool> {
        self.core()
            .snapshots
            .stream_map(|snapshot: &Vec<E>| snapshot.is_empty())
    }

    /// Entities satisfying `predicate`, in entry iteration order.
    fn select<P>(&self, predicate: P) -> Vec<E>
    where
        P: Fn(&E) -> bool,
    {
        self.core()
            .entries
            .values()
            .filter(|e| predicate(e))
            .cloned()
            .collect()
    }

    fn select_all(&self) -> Vec<E> {
        self.core().entries.to_vec()
    }

    fn select_by_key(&self, key: &EntityKey) -> Option<&E> {
        self.core().entries.get(key)
    }

    fn contains(&self, key: &EntityKey) -> bool {
        self.core().entries.contains(key)
    }

    /// Whether `entity` carries a key that is present here.
    fn contains_entity(&self, entity: &E) -> bool {
        entity
            .key(self.core().guid_key())
            .is_some_and(|key| self.contains(&key))
    }

    fn is_empty(&self) -> bool {
        self.core().entries.is_empty()
    }

    fn count(&self) -> usize {
        self.core().entries.len()
    }

    fn config(&self) -> &Config {
        self.core().config()
    }
}
