/*!
 * Registry Statistics
 * Snapshot types for observability
 */

use crate::core::types::PoolKey;
use serde::{Deserialize, Serialize};

/// Snapshot of one type's pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStats {
    pub key: PoolKey,
    /// Instances the factory has constructed for this key, ever
    pub total_created: u64,
    /// Entries currently parked in the free list (live or stale)
    pub free: usize,
}

/// Registry-wide snapshot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryStats {
    /// Per-key pool snapshots, sorted by key
    pub pools: Vec<PoolStats>,
    /// Acquire calls accepted (reuse or construction attempts)
    pub acquisitions: u64,
    /// Acquisitions satisfied from a free list
    pub reuses: u64,
    /// Release calls that parked an instance
    pub releases: u64,
    /// Free-list entries dropped because their instance was destroyed
    pub stale_dropped: u64,
}

impl RegistryStats {
    /// Total instances constructed across every pool
    pub fn total_created(&self) -> u64 {
        self.pools.iter().map(|pool| pool.total_created).sum()
    }

    /// Total parked entries across every pool
    pub fn total_free(&self) -> usize {
        self.pools.iter().map(|pool| pool.free).sum()
    }
}

/// Outcome of a registry teardown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeardownSummary {
    /// Dormant instances force-destroyed through the factory
    pub destroyed: usize,
    /// Stale free-list entries dropped without a destroy call
    pub stale_dropped: usize,
    /// Pools removed from the registry map
    pub pools_cleared: usize,
}
