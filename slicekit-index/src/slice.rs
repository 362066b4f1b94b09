//! Predicate-scoped views of an index.
//!
//! Membership is re-derived per entity on every event:
//!
//! | member | predicate | effect                         | delta  |
//! |--------|-----------|--------------------------------|--------|
//! | no     | false     | none                           | none   |
//! | no     | true      | inserted                       | PUT (POST when posted) |
//! | yes    | true      | value replaced in place        | none on put, POST on post |
//! | yes    | false     | removed                        | DELETE |
//!
//! A put that keeps an existing member replaces the stored value without
//! publishing anything; subscribers only hear about membership changes.

use crate::plan::{Op, Plan, Replace};
use crate::{Entity, ObservableCore, ObservableIndex};
use slicekit_types::{Config, DeltaKind};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Membership test of a slice.
pub type Predicate<E> = Arc<dyn Fn(&E) -> bool + Send + Sync>;

/// A labelled, predicate-filtered, independently observable view.
pub struct Slice<E> {
    label: String,
    predicate: Predicate<E>,
    core: ObservableCore<E>,
}

impl<E> fmt::Debug for Slice<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slice").field("label", &self.label).finish_non_exhaustive()
    }
}

impl<E: Entity> Slice<E> {
    /// Creates an empty slice. Subscribers start from an empty INITIALIZE delta.
    pub fn new(label: impl Into<String>, predicate: Predicate<E>, config: Config) -> Self {
        Self::seeded(label, predicate, config, &[])
    }

    /// Creates a slice holding the members of `seed` that satisfy `predicate`.
    ///
    /// An INITIALIZE delta with the admitted subset is published even when it
    /// is empty, so every subscriber has a defined first value.
    pub fn seeded(
        label: impl Into<String>,
        predicate: Predicate<E>,
        config: Config,
        seed: &[E],
    ) -> Self {
        let mut core = ObservableCore::new(config);
        let plan = Plan::build(Op::Post, core.entries(), core.guid_key(), seed, |e| predicate(e));
        let admitted = plan.insert_into(core.entries_mut());
        let label = label.into();
        debug!(label = %label, admitted = admitted.len(), "slice initialized");
        core.publish(DeltaKind::Initialize, admitted);
        Self {
            label,
            predicate,
            core,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Evaluates this slice's predicate.
    pub fn matches(&self, entity: &E) -> bool {
        (self.predicate)(entity)
    }

    /// Admits `entity` if it satisfies the predicate.
    pub fn post(&mut self, entity: &E) {
        self.post_all(std::slice::from_ref(entity));
    }

    /// Admits every entity satisfying the predicate and publishes one POST
    /// delta with exactly that subset. Members that no longer satisfy the
    /// predicate are removed with a DELETE delta.
    pub fn post_all(&mut self, entities: &[E]) {
        let plan = self.plan(Op::Post, entities);
        self.commit(plan);
    }

    /// Re-evaluates membership of `entity`.
    pub fn put(&mut self, entity: &E) {
        self.put_all(std::slice::from_ref(entity));
    }

    /// Re-evaluates membership of every entity. Leavers are published as one
    /// DELETE delta, then newcomers as one PUT delta.
    pub fn put_all(&mut self, entities: &[E]) {
        let plan = self.plan(Op::Put, entities);
        self.commit(plan);
    }

    /// Removes `entity` if it is a member.
    pub fn delete(&mut self, entity: &E) {
        self.delete_all(std::slice::from_ref(entity));
    }

    /// Removes every listed member with a single DELETE delta. Entities that
    /// are not members are ignored, and nothing is published if none was.
    pub fn delete_all(&mut self, entities: &[E]) {
        let plan = self.plan(Op::Delete, entities);
        self.commit(plan);
    }

    /// Publishes RESET with the prior membership and an empty snapshot, then
    /// clears the slice.
    pub fn reset(&mut self) {
        let dropped = self.core.reset();
        debug!(label = %self.label, dropped, "slice reset");
    }

    pub(crate) fn plan(&self, op: Op, entities: &[E]) -> Plan<E> {
        Plan::build(
            op,
            self.core.entries(),
            self.core.guid_key(),
            entities,
            |e| (self.predicate)(e),
        )
    }

    pub(crate) fn commit(&mut self, plan: Plan<E>) {
        debug!(
            label = %self.label,
            kept = plan.kept_count(),
            removed = plan.removed_count(),
            "slice update"
        );
        plan.apply(&mut self.core, Replace::Silent);
    }

    /// Completes both channels. Used when the owning index drops the slice.
    pub(crate) fn close(&self) {
        self.core.complete();
    }
}

impl<E: Entity> ObservableIndex<E> for Slice<E> {
    fn core(&self) -> &ObservableCore<E> {
        &self.core
    }
}
