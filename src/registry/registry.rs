/*!
 * Pool Registry
 * Hands out and reclaims instances by type key
 */

use super::entry::PoolEntry;
use super::stats::{PoolStats, RegistryStats, TeardownSummary};
use super::traits::Pooling;
use crate::core::limits;
use crate::core::types::PoolKey;
use crate::factory::InstanceFactory;
use crate::instance::{ActivationOptions, PoolInstance, SpawnRequest};
use crate::timer::{DeferredTimerQueue, TimerService};
use ahash::RandomState;
use dashmap::mapref::one::RefMut;
use dashmap::DashMap;
use log::{debug, info, trace, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Registry tuning knobs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Clamp applied to a single prewarm batch
    pub max_prewarm: usize,
    /// Capacity reserved for each new free list
    pub free_list_capacity: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_prewarm: limits::MAX_PREWARM,
            free_list_capacity: limits::FREE_LIST_INITIAL_CAPACITY,
        }
    }
}

impl PoolConfig {
    #[inline]
    #[must_use]
    pub fn with_max_prewarm(mut self, max_prewarm: usize) -> Self {
        self.max_prewarm = max_prewarm;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_free_list_capacity(mut self, capacity: usize) -> Self {
        self.free_list_capacity = capacity;
        self
    }
}

/// Builder for [`PoolRegistry`]
pub struct PoolRegistryBuilder {
    factory: Arc<dyn InstanceFactory>,
    timers: Option<Arc<dyn TimerService>>,
    config: PoolConfig,
}

impl PoolRegistryBuilder {
    pub fn new(factory: Arc<dyn InstanceFactory>) -> Self {
        Self {
            factory,
            timers: None,
            config: PoolConfig::default(),
        }
    }

    /// Use `timers` for auto-return scheduling. Without this, the
    /// registry owns a private [`DeferredTimerQueue`] that nothing
    /// pumps, so auto-return stays dormant until the host supplies a
    /// service it drives.
    #[must_use]
    pub fn with_timer_service(mut self, timers: Arc<dyn TimerService>) -> Self {
        self.timers = Some(timers);
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: PoolConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> PoolRegistry {
        let timers = self
            .timers
            .unwrap_or_else(|| Arc::new(DeferredTimerQueue::new()));

        info!(
            "pool registry initialized (max_prewarm={}, free_list_capacity={})",
            self.config.max_prewarm, self.config.free_list_capacity
        );

        PoolRegistry {
            shared: Arc::new(RegistryShared {
                pools: DashMap::with_hasher(RandomState::new()),
                factory: self.factory,
                timers,
                config: self.config,
                acquisitions: AtomicU64::new(0),
                reuses: AtomicU64::new(0),
                releases: AtomicU64::new(0),
                stale_dropped: AtomicU64::new(0),
            }),
        }
    }
}

/// State shared by every clone of a registry and by the auto-return
/// callbacks instances carry.
pub(crate) struct RegistryShared {
    pools: DashMap<PoolKey, PoolEntry, RandomState>,
    factory: Arc<dyn InstanceFactory>,
    timers: Arc<dyn TimerService>,
    config: PoolConfig,
    acquisitions: AtomicU64,
    reuses: AtomicU64,
    releases: AtomicU64,
    stale_dropped: AtomicU64,
}

impl RegistryShared {
    fn entry(&self, key: &PoolKey) -> RefMut<'_, PoolKey, PoolEntry, RandomState> {
        self.pools
            .entry(key.clone())
            .or_insert_with(|| PoolEntry::with_capacity(self.config.free_list_capacity))
    }

    /// Bind the instance to this registry and run its activation.
    /// Runs with no map shard locked, so hooks may re-enter the registry.
    fn hand_out(
        self: &Arc<Self>,
        instance: &Arc<PoolInstance>,
        request: &SpawnRequest,
        options: &ActivationOptions,
    ) {
        instance.bind(Arc::downgrade(self), Arc::clone(&self.timers));
        instance.activate(request, options);
    }

    pub(crate) fn acquire(
        self: &Arc<Self>,
        key: &PoolKey,
        request: &SpawnRequest,
        options: &ActivationOptions,
    ) -> Option<Arc<PoolInstance>> {
        if key.is_empty() {
            warn!("acquire rejected: empty pool key");
            return None;
        }
        self.acquisitions.fetch_add(1, Ordering::Relaxed);

        let (popped, stale) = {
            let mut entry = self.entry(key);
            entry.free.pop_live()
        };
        if stale > 0 {
            self.stale_dropped.fetch_add(stale as u64, Ordering::Relaxed);
            debug!("dropped {} stale free-list entries for {}", stale, key);
        }

        if let Some(instance) = popped {
            self.reuses.fetch_add(1, Ordering::Relaxed);
            self.hand_out(&instance, request, options);
            trace!("reused instance {} for {}", instance.id(), key);
            return Some(instance);
        }

        // Free list exhausted: construct. Counter moves only on success.
        let instance = match self.factory.create(key, request) {
            Ok(instance) => instance,
            Err(err) => {
                warn!("construction failed for {}: {}", key, err);
                return None;
            }
        };
        self.entry(key).total_created += 1;
        self.hand_out(&instance, request, options);
        trace!("constructed instance {} for {}", instance.id(), key);
        Some(instance)
    }

    pub(crate) fn release(self: &Arc<Self>, instance: &Arc<PoolInstance>) {
        let key = instance.key();
        if key.is_empty() {
            warn!("release ignored: instance {} has an empty key", instance.id());
            return;
        }
        if instance.is_in_pool() {
            warn!(
                "release ignored: instance {} is already pooled",
                instance.id()
            );
            return;
        }

        instance.deactivate();
        self.releases.fetch_add(1, Ordering::Relaxed);
        self.entry(&key).free.push(instance);
        trace!("parked instance {} in {}", instance.id(), key);
    }

    pub(crate) fn prewarm(self: &Arc<Self>, key: &PoolKey, count: usize) -> usize {
        if key.is_empty() || count == 0 {
            return 0;
        }
        let clamped = count.min(self.config.max_prewarm);
        if clamped < count {
            debug!("prewarm for {} clamped from {} to {}", key, count, clamped);
        }

        let request = SpawnRequest::new();
        let options = ActivationOptions::dormant();

        // Hold the whole batch before parking any of it; releasing as we
        // go would hand the same instance back on the next iteration.
        let mut held = Vec::with_capacity(clamped);
        for _ in 0..clamped {
            if let Some(instance) = self.acquire(key, &request, &options) {
                held.push(instance);
            }
        }
        let parked = held.len();
        for instance in &held {
            self.release(instance);
        }

        info!("prewarmed {} with {} instances", key, parked);
        parked
    }

    pub(crate) fn teardown(&self) -> TeardownSummary {
        let mut summary = TeardownSummary::default();

        let keys: Vec<PoolKey> = self.pools.iter().map(|entry| entry.key().clone()).collect();
        for key in keys {
            if let Some((_, mut entry)) = self.pools.remove(&key) {
                let (live, stale) = entry.free.drain_live();
                summary.stale_dropped += stale;
                summary.pools_cleared += 1;
                for instance in live {
                    self.factory.destroy(&instance);
                    summary.destroyed += 1;
                }
            }
        }
        self.pools.clear();

        self.acquisitions.store(0, Ordering::Relaxed);
        self.reuses.store(0, Ordering::Relaxed);
        self.releases.store(0, Ordering::Relaxed);
        self.stale_dropped.store(0, Ordering::Relaxed);

        info!(
            "pool registry teardown: {} destroyed, {} stale dropped, {} pools cleared",
            summary.destroyed, summary.stale_dropped, summary.pools_cleared
        );
        summary
    }

    pub(crate) fn stats(&self) -> RegistryStats {
        let mut pools: Vec<PoolStats> = self
            .pools
            .iter()
            .map(|entry| PoolStats {
                key: entry.key().clone(),
                total_created: entry.value().total_created,
                free: entry.value().free.len(),
            })
            .collect();
        pools.sort_by(|a, b| a.key.cmp(&b.key));

        RegistryStats {
            pools,
            acquisitions: self.acquisitions.load(Ordering::Relaxed),
            reuses: self.reuses.load(Ordering::Relaxed),
            releases: self.releases.load(Ordering::Relaxed),
            stale_dropped: self.stale_dropped.load(Ordering::Relaxed),
        }
    }
}

/// Per-type pooling registry.
///
/// Owns the PoolKey→pool map for one scope (a session, a world). Clones
/// share the same underlying state, which makes handing the registry to
/// subsystems cheap. The owning scope must call
/// [`teardown`](Self::teardown) at end of life.
#[derive(Clone)]
pub struct PoolRegistry {
    shared: Arc<RegistryShared>,
}

impl PoolRegistry {
    /// Start building a registry around `factory`
    pub fn builder(factory: Arc<dyn InstanceFactory>) -> PoolRegistryBuilder {
        PoolRegistryBuilder::new(factory)
    }

    /// Acquire an instance of `key`. See [`Pooling::acquire`].
    pub fn acquire(
        &self,
        key: &PoolKey,
        request: &SpawnRequest,
        options: &ActivationOptions,
    ) -> Option<Arc<PoolInstance>> {
        self.shared.acquire(key, request, options)
    }

    /// Park an instance back into its type's pool. See [`Pooling::release`].
    pub fn release(&self, instance: &Arc<PoolInstance>) {
        self.shared.release(instance)
    }

    /// Pre-populate a pool. See [`Pooling::prewarm`].
    pub fn prewarm(&self, key: &PoolKey, count: usize) -> usize {
        self.shared.prewarm(key, count)
    }

    /// Destroy all dormant instances and reset. See [`Pooling::teardown`].
    pub fn teardown(&self) -> TeardownSummary {
        self.shared.teardown()
    }

    /// Snapshot per-pool and aggregate counters
    pub fn stats(&self) -> RegistryStats {
        self.shared.stats()
    }

    /// Whether a pool exists for `key`
    pub fn contains(&self, key: &PoolKey) -> bool {
        self.shared.pools.contains_key(key)
    }

    /// Number of pools in the registry
    pub fn len(&self) -> usize {
        self.shared.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.pools.is_empty()
    }
}

impl Pooling for PoolRegistry {
    fn acquire(
        &self,
        key: &PoolKey,
        request: &SpawnRequest,
        options: &ActivationOptions,
    ) -> Option<Arc<PoolInstance>> {
        PoolRegistry::acquire(self, key, request, options)
    }

    fn release(&self, instance: &Arc<PoolInstance>) {
        PoolRegistry::release(self, instance)
    }

    fn prewarm(&self, key: &PoolKey, count: usize) -> usize {
        PoolRegistry::prewarm(self, key, count)
    }

    fn teardown(&self) -> TeardownSummary {
        PoolRegistry::teardown(self)
    }
}

impl fmt::Debug for PoolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolRegistry")
            .field("pools", &self.shared.pools.len())
            .finish_non_exhaustive()
    }
}
