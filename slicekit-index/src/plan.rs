//! Two-phase mutation planning.
//!
//! A [`Plan`] is computed from the current entries and an input batch without
//! touching any state, then applied. The index plans itself and every slice
//! before applying anything, which keeps a mutation all-or-nothing when a
//! predicate panics.

use crate::{Entity, Entries, ObservableCore};
use slicekit_types::{DeltaKind, EntityKey};
use std::collections::HashMap;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Op {
    Post,
    Put,
    Delete,
}

/// Whether a put that keeps an existing member (value replaced, membership
/// unchanged) is reported in the PUT delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Replace {
    Notify,
    Silent,
}

enum Outcome<E> {
    Keep(E),
    Drop(E),
}

struct Kept<E> {
    key: EntityKey,
    entity: E,
    was_member: bool,
}

pub(crate) struct Plan<E> {
    op: Op,
    removed: Vec<(EntityKey, E)>,
    kept: Vec<Kept<E>>,
}

impl<E: Entity> Plan<E> {
    /// Computes the net effect of applying `batch` in order.
    ///
    /// Repeated keys are folded so that the result equals applying each input
    /// one at a time; the deltas report only the net membership change.
    pub(crate) fn build<P>(
        op: Op,
        entries: &Entries<E>,
        guid_key: &str,
        batch: &[E],
        matches: P,
    ) -> Self
    where
        P: Fn(&E) -> bool,
    {
        let mut order: Vec<EntityKey> = Vec::new();
        let mut outcomes: HashMap<EntityKey, Outcome<E>> = HashMap::new();

        for entity in batch {
            let Some(key) = entity.key(guid_key) else {
                warn!(guid_key, "skipping entity without a key");
                continue;
            };
            let outcome = match op {
                Op::Delete => Outcome::Drop(entity.clone()),
                Op::Post | Op::Put if matches(entity) => Outcome::Keep(entity.clone()),
                Op::Post | Op::Put => Outcome::Drop(entity.clone()),
            };
            if outcomes.insert(key.clone(), outcome).is_none() {
                order.push(key);
            }
        }

        let mut removed = Vec::new();
        let mut kept = Vec::new();
        for key in order {
            let was_member = entries.contains(&key);
            match outcomes.remove(&key) {
                Some(Outcome::Keep(entity)) => kept.push(Kept {
                    key,
                    entity,
                    was_member,
                }),
                Some(Outcome::Drop(entity)) if was_member => removed.push((key, entity)),
                _ => {}
            }
        }

        Self { op, removed, kept }
    }

    pub(crate) fn removed_count(&self) -> usize {
        self.removed.len()
    }

    pub(crate) fn kept_count(&self) -> usize {
        self.kept.len()
    }

    /// Inserts every kept entity without publishing and returns them in batch
    /// order. Used for initial content, which is announced as INITIALIZE.
    pub(crate) fn insert_into(self, entries: &mut Entries<E>) -> Vec<E> {
        let mut admitted = Vec::with_capacity(self.kept.len());
        for Kept { key, entity, .. } in self.kept {
            admitted.push(entity.clone());
            entries.insert(key, entity);
        }
        admitted
    }

    /// Applies the plan: removals first (DELETE delta), then admissions
    /// (POST or PUT delta). Each delta is followed by a snapshot publish.
    /// Nothing is published for an empty half.
    pub(crate) fn apply(self, core: &mut ObservableCore<E>, replace: Replace) {
        let Plan { op, removed, kept } = self;

        if !removed.is_empty() {
            let mut payload = Vec::with_capacity(removed.len());
            for (key, entity) in removed {
                core.entries_mut().remove(&key);
                payload.push(entity);
            }
            core.publish(DeltaKind::Delete, payload);
        }

        if kept.is_empty() {
            return;
        }
        let kind = match op {
            Op::Post => DeltaKind::Post,
            Op::Put | Op::Delete => DeltaKind::Put,
        };
        let mut payload = Vec::with_capacity(kept.len());
        for Kept {
            key,
            entity,
            was_member,
        } in kept
        {
            let report = !was_member || op == Op::Post || replace == Replace::Notify;
            if report {
                payload.push(entity.clone());
            }
            core.entries_mut().insert(key, entity);
        }
        if !payload.is_empty() {
            core.publish(kind, payload);
        }
    }
}
