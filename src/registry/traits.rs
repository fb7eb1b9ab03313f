/*!
 * Registry Traits
 * Pooling abstraction consumed by hosts
 */

use super::stats::TeardownSummary;
use crate::core::types::PoolKey;
use crate::instance::{ActivationOptions, PoolInstance, SpawnRequest};
use std::sync::Arc;

/// Per-type instance pooling.
///
/// Faults never raise: invalid inputs and construction failures yield
/// `None`/no-op so the pool is safely callable from uncoordinated call
/// sites.
pub trait Pooling: Send + Sync {
    /// Hand out an instance of `key`, reusing a parked one when possible.
    /// `None` means the key was invalid or construction failed.
    fn acquire(
        &self,
        key: &PoolKey,
        request: &SpawnRequest,
        options: &ActivationOptions,
    ) -> Option<Arc<PoolInstance>>;

    /// Park an instance back into its type's pool
    fn release(&self, instance: &Arc<PoolInstance>);

    /// Pre-populate `key`'s pool, returning how many instances ended up
    /// parked
    fn prewarm(&self, key: &PoolKey, count: usize) -> usize;

    /// Destroy all dormant instances and reset the registry
    fn teardown(&self) -> TeardownSummary;
}
