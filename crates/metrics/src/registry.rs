//! Directory of live accumulators keyed by entity
//!
//! The registry is the only owner of accumulators. Callers get
//! [`AccumulatorHandle`]s, cheap shared handles that can record and snapshot
//! but cannot take the accumulator out of the registry. A handle that outlives
//! [`MetricsRegistry::remove`] keeps working on its now detached accumulator;
//! the registry hands out a fresh one for the same id afterwards.

use crate::accumulator::MetricsAccumulator;
use crate::entity::EntityId;
use crate::record::MetricsRecord;
use crate::snapshotter::MetricsSnapshotter;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use gridmetrics_core::{Error, MetricsConfig, Result, SharedClock, SystemClock};
use std::ops::Deref;
use std::sync::Arc;
use tracing::{debug, info};

/// Shared reference to an accumulator owned by a [`MetricsRegistry`]
#[derive(Debug, Clone)]
pub struct AccumulatorHandle(Arc<MetricsAccumulator>);

impl AccumulatorHandle {
    fn new(accumulator: MetricsAccumulator) -> Self {
        Self(Arc::new(accumulator))
    }

    /// Whether both handles refer to the same accumulator instance
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for AccumulatorHandle {
    type Target = MetricsAccumulator;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Thread-safe map from [`EntityId`] to its live accumulator
#[derive(Debug)]
pub struct MetricsRegistry {
    accumulators: DashMap<EntityId, AccumulatorHandle>,
    snapshotter: MetricsSnapshotter,
    clock: SharedClock,
    config: MetricsConfig,
}

impl MetricsRegistry {
    /// Create a registry with default configuration and the wall clock
    pub fn new() -> Self {
        Self::build(MetricsConfig::default(), SystemClock::shared())
    }

    /// Create a registry from a validated configuration
    pub fn with_config(config: MetricsConfig, clock: SharedClock) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config, clock))
    }

    fn build(config: MetricsConfig, clock: SharedClock) -> Self {
        let accumulators = match config.shard_amount {
            Some(shards) => DashMap::with_capacity_and_shard_amount(config.initial_capacity, shards),
            None => DashMap::with_capacity(config.initial_capacity),
        };

        Self {
            accumulators,
            snapshotter: MetricsSnapshotter::new(Arc::clone(&clock)),
            clock,
            config,
        }
    }

    pub fn config(&self) -> &MetricsConfig {
        &self.config
    }

    pub fn snapshotter(&self) -> &MetricsSnapshotter {
        &self.snapshotter
    }

    /// Current time according to the registry's clock
    pub fn now_millis(&self) -> i64 {
        self.clock.now_millis()
    }

    /// Return the accumulator for `id`, creating it on first reference
    ///
    /// Concurrent callers racing on the same id all receive the same
    /// accumulator; exactly one is ever created. The conversion into an
    /// [`EntityId`] allocates on every call, so callers that already hold an
    /// id should use [`MetricsRegistry::resolve`].
    pub fn get_or_create(&self, id: impl Into<EntityId>) -> AccumulatorHandle {
        let id = id.into();
        if let Some(handle) = self.get(&id) {
            return handle;
        }
        self.insert_if_absent(id)
    }

    /// Same as [`MetricsRegistry::get_or_create`] for a borrowed id
    ///
    /// Only clones `id` when the accumulator has to be created.
    pub fn resolve(&self, id: &EntityId) -> AccumulatorHandle {
        match self.get(id) {
            Some(handle) => handle,
            None => self.insert_if_absent(id.clone()),
        }
    }

    fn insert_if_absent(&self, id: EntityId) -> AccumulatorHandle {
        match self.accumulators.entry(id) {
            Entry::Occupied(entry) => entry.get().clone(),
            Entry::Vacant(entry) => {
                debug!(entity = %entry.key(), "creating metrics accumulator");
                let handle =
                    AccumulatorHandle::new(MetricsAccumulator::new(Arc::clone(&self.clock)));
                entry.insert(handle.clone());
                handle
            }
        }
    }

    /// Look up an existing accumulator
    pub fn get(&self, id: &EntityId) -> Option<AccumulatorHandle> {
        self.accumulators.get(id).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.accumulators.contains_key(id)
    }

    /// Detach the accumulator for `id`, returning its final snapshot
    pub fn remove(&self, id: &EntityId) -> Option<MetricsRecord> {
        self.accumulators.remove(id).map(|(id, handle)| {
            debug!(entity = %id, "removed metrics accumulator");
            handle.snapshot()
        })
    }

    /// Point-in-time list of registered entities and their accumulators
    pub fn list(&self) -> Vec<(EntityId, AccumulatorHandle)> {
        self.accumulators
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    /// Snapshot one entity, `None` if it was never registered
    pub fn snapshot(&self, id: &EntityId) -> Option<MetricsRecord> {
        self.get(id).map(|handle| self.snapshotter.snapshot_one(&handle))
    }

    /// Snapshot one entity, or the zero record stamped with now
    pub fn snapshot_or_zeroed(&self, id: &EntityId) -> MetricsRecord {
        self.snapshot(id)
            .unwrap_or_else(|| MetricsRecord::zeroed(self.clock.now_millis()))
    }

    /// Reset the accumulator for `id`
    pub fn reset(&self, id: &EntityId) -> Result<()> {
        let handle = self
            .get(id)
            .ok_or_else(|| Error::not_found(id.to_string()))?;
        handle.reset();
        debug!(entity = %id, "reset metrics accumulator");
        Ok(())
    }

    /// Load a previously captured record into the accumulator for `id`
    ///
    /// Creates the accumulator if needed. Records whose timestamps put a read
    /// or write before creation are rejected with [`Error::InvalidState`].
    /// Servers whose clock wraps (milliseconds since midnight) can report such
    /// records; load those with [`MetricsRegistry::restore_unchecked`].
    pub fn restore(&self, id: impl Into<EntityId>, record: &MetricsRecord) -> Result<AccumulatorHandle> {
        record.check_invariants()?;
        Ok(self.restore_unchecked(id, record))
    }

    /// Overwrite the accumulator for `id` with `record` as-is
    pub fn restore_unchecked(&self, id: impl Into<EntityId>, record: &MetricsRecord) -> AccumulatorHandle {
        let id = id.into();
        let handle = self.resolve(&id);
        handle.restore(record);
        debug!(entity = %id, %record, "restored metrics accumulator");
        handle
    }

    /// Drop the cache-level accumulator and every entry accumulator of `cache`
    ///
    /// Returns how many accumulators were removed.
    pub fn close_cache(&self, cache: &str) -> usize {
        let ids: Vec<EntityId> = self
            .accumulators
            .iter()
            .filter(|entry| entry.key().cache_name() == cache)
            .map(|entry| entry.key().clone())
            .collect();

        let removed = ids
            .iter()
            .filter(|id| self.accumulators.remove(*id).is_some())
            .count();

        info!(cache, removed, "closed cache metrics");
        removed
    }

    /// Whole-cache metrics merged from the entry accumulators of `cache`
    pub fn cache_metrics(&self, cache: &str) -> MetricsRecord {
        let entries: Vec<AccumulatorHandle> = self
            .accumulators
            .iter()
            .filter(|entry| entry.key().is_entry() && entry.key().cache_name() == cache)
            .map(|entry| entry.value().clone())
            .collect();

        self.snapshotter
            .aggregate_accumulators(entries.iter().map(|handle| &**handle))
    }

    /// Distinct cache names with at least one registered entity, sorted
    pub fn cache_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .accumulators
            .iter()
            .map(|entry| entry.key().cache_name().to_string())
            .collect();
        names.sort();
        names.dedup();
        names
    }

    pub fn len(&self) -> usize {
        self.accumulators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accumulators.is_empty()
    }

    /// Remove every accumulator
    pub fn clear(&self) {
        let removed = self.accumulators.len();
        self.accumulators.clear();
        info!(removed, "cleared metrics registry");
    }
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}
