//! The top-level index: system of record, key assignment, slice registry.

use crate::plan::{Op, Plan, Replace};
use crate::{Entity, ObservableCore, ObservableIndex, Predicate, Slice};
use slicekit_types::{Config, DeltaKind, EntityKey, KeyGenerator, Result, UuidKeys};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The canonical keyed entity set plus its registered slices.
///
/// Every mutation is applied to the index, then the same input batch is
/// forwarded to each slice, which re-derives its own membership and deltas.
pub struct Index<E> {
    core: ObservableCore<E>,
    keys: Arc<dyn KeyGenerator>,
    slices: HashMap<String, Slice<E>>,
}

impl<E> fmt::Debug for Index<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Index")
            .field("slices", &self.slices.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl<E: Entity> Default for Index<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> Index<E> {
    /// Creates an empty index with the default configuration and UUID keys.
    pub fn new() -> Self {
        Self {
            core: ObservableCore::new(Config::default()),
            keys: Arc::new(UuidKeys),
            slices: HashMap::new(),
        }
    }

    /// Creates an empty index after validating `config`.
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            core: ObservableCore::new(config),
            ..Self::new()
        })
    }

    /// Replaces the generator used for entities admitted without a key.
    #[must_use]
    pub fn with_key_generator(mut self, keys: impl KeyGenerator + 'static) -> Self {
        self.keys = Arc::new(keys);
        self
    }

    /// Loads initial content, published as a single INITIALIZE delta that
    /// carries the seeded entities. Entries already present stay and are not
    /// repeated in the delta.
    ///
    /// Registered slices receive the same entities as a post.
    #[must_use]
    pub fn seed(mut self, mut entities: Vec<E>) -> Self {
        self.assign_keys(&mut entities);
        let slice_plans = self.plan_slices(Op::Post, &entities);
        let plan = Plan::build(
            Op::Post,
            self.core.entries(),
            self.core.guid_key(),
            &entities,
            |_| true,
        );
        let seeded = plan.insert_into(self.core.entries_mut());
        debug!(count = seeded.len(), "index seeded");
        self.core.publish(DeltaKind::Initialize, seeded);
        self.commit_slices(slice_plans);
        self
    }

    // ── Mutations ────────────────────────────────────────────────

    /// Admits one entity, assigning a key if it has none. Returns its key.
    pub fn post(&mut self, entity: E) -> EntityKey {
        self.post_all(vec![entity]).remove(0)
    }

    /// Admits every entity, assigning keys as needed, and publishes one POST
    /// delta. An entity whose key is already present replaces the stored value.
    pub fn post_all(&mut self, mut entities: Vec<E>) -> Vec<EntityKey> {
        let keys = self.assign_keys(&mut entities);
        self.mutate(Op::Post, &entities);
        keys
    }

    /// Inserts or replaces one entity, assigning a key if it has none.
    pub fn put(&mut self, entity: E) -> EntityKey {
        self.put_all(vec![entity]).remove(0)
    }

    /// Inserts or replaces every entity and publishes one PUT delta carrying
    /// the whole batch. Slices re-evaluate membership for each entity.
    pub fn put_all(&mut self, mut entities: Vec<E>) -> Vec<EntityKey> {
        let keys = self.assign_keys(&mut entities);
        self.mutate(Op::Put, &entities);
        keys
    }

    /// Removes `entity` by key. Returns whether it was present.
    pub fn delete(&mut self, entity: &E) -> bool {
        self.delete_all(std::slice::from_ref(entity)) == 1
    }

    /// Removes every listed entity that is present, publishing one DELETE
    /// delta. Absent or keyless entities are ignored; nothing is published if
    /// none was present. Returns the number removed.
    pub fn delete_all(&mut self, entities: &[E]) -> usize {
        let before = self.core.entries().len();
        self.mutate(Op::Delete, entities);
        before - self.core.entries().len()
    }

    /// Removes the entity stored under `key`, returning it.
    pub fn delete_by_key(&mut self, key: &EntityKey) -> Option<E> {
        let entity = self.core.entries().get(key).cloned()?;
        self.delete_all(std::slice::from_ref(&entity));
        Some(entity)
    }

    /// Removes every entity satisfying `predicate` as one batch.
    pub fn delete_where<P>(&mut self, predicate: P) -> usize
    where
        P: Fn(&E) -> bool,
    {
        let doomed = self.select(predicate);
        self.delete_all(&doomed)
    }

    /// Deletes `entity` if its key is present, otherwise posts it.
    /// Returns whether the entity is present afterwards.
    pub fn toggle(&mut self, entity: E) -> bool {
        if self.contains_entity(&entity) {
            self.delete(&entity);
            false
        } else {
            self.post(entity);
            true
        }
    }

    /// Clears the index and every slice, each publishing RESET with its prior
    /// membership followed by an empty snapshot.
    pub fn reset(&mut self) {
        let dropped = self.core.reset();
        debug!(dropped, slices = self.slices.len(), "index reset");
        for slice in self.slices.values_mut() {
            slice.reset();
        }
    }

    // ── Slices ───────────────────────────────────────────────────

    /// Registers a slice seeded from the current contents. A slice already
    /// registered under `label` is replaced and its channels completed.
    ///
    /// Without an explicit `config` the slice shares the index configuration.
    /// An explicit config is validated; on error nothing is registered.
    pub fn add_slice<P>(
        &mut self,
        label: impl Into<String>,
        predicate: P,
        config: Option<Config>,
    ) -> Result<&Slice<E>>
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
    {
        let label = label.into();
        let config = match config {
            Some(config) => {
                config.validate()?;
                if config.guid_key != self.core.guid_key() {
                    warn!(
                        label = %label,
                        slice_key = %config.guid_key,
                        index_key = %self.core.guid_key(),
                        "slice reads keys from a different field than the index"
                    );
                }
                config
            }
            None => self.core.config().clone(),
        };
        let predicate: Predicate<E> = Arc::new(predicate);
        let seed = self.core.entries().to_vec();
        let slice = Slice::seeded(label.clone(), predicate, config, &seed);
        info!(label = %label, members = slice.count(), "slice registered");
        if let Some(previous) = self.slices.insert(label.clone(), slice) {
            info!(label = %label, "replaced existing slice");
            previous.close();
        }
        Ok(&self.slices[&label])
    }

    pub fn get_slice(&self, label: &str) -> Option<&Slice<E>> {
        self.slices.get(label)
    }

    /// Unregisters a slice and completes both of its channels, so its streams
    /// end after delivering what was already published. Returns whether a
    /// slice was registered under `label`.
    pub fn remove_slice(&mut self, label: &str) -> bool {
        match self.slices.remove(label) {
            Some(slice) => {
                slice.close();
                info!(label, "slice removed");
                true
            }
            None => false,
        }
    }

    pub fn has_slice(&self, label: &str) -> bool {
        self.slices.contains_key(label)
    }

    pub fn slice_labels(&self) -> Vec<&str> {
        self.slices.keys().map(String::as_str).collect()
    }

    pub fn slice_count(&self) -> usize {
        self.slices.len()
    }

    // ── Internals ────────────────────────────────────────────────

    fn assign_keys(&self, entities: &mut [E]) -> Vec<EntityKey> {
        let field = self.core.guid_key();
        entities
            .iter_mut()
            .map(|entity| match entity.key(field) {
                Some(key) => key,
                None => {
                    let key = self.keys.generate();
                    entity.set_key(field, key.clone());
                    key
                }
            })
            .collect()
    }

    /// Plans the index and every slice, then applies all plans.
    fn mutate(&mut self, op: Op, entities: &[E]) {
        let slice_plans = self.plan_slices(op, entities);
        let plan = Plan::build(
            op,
            self.core.entries(),
            self.core.guid_key(),
            entities,
            |_| true,
        );
        debug!(
            ?op,
            batch = entities.len(),
            kept = plan.kept_count(),
            removed = plan.removed_count(),
            "index update"
        );
        plan.apply(&mut self.core, Replace::Notify);
        self.commit_slices(slice_plans);
    }

    fn plan_slices(&self, op: Op, entities: &[E]) -> Vec<(String, Plan<E>)> {
        self.slices
            .iter()
            .map(|(label, slice)| (label.clone(), slice.plan(op, entities)))
            .collect()
    }

    fn commit_slices(&mut self, plans: Vec<(String, Plan<E>)>) {
        for (label, plan) in plans {
            if let Some(slice) = self.slices.get_mut(&label) {
                slice.commit(plan);
            }
        }
    }
}

impl<E: Entity> ObservableIndex<E> for Index<E> {
    fn core(&self) -> &ObservableCore<E> {
        &self.core
    }
}
