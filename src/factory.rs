/*!
 * Instance Factory
 * Construction and destruction seam consumed by the registry
 */

use crate::core::errors::FactoryResult;
use crate::core::types::PoolKey;
use crate::instance::{PoolInstance, SpawnRequest};
use std::sync::Arc;

/// Constructs and destroys the raw instances a registry pools.
///
/// The factory (or the host behind it) keeps the strong references to
/// every live instance; the registry only ever holds weak ones. That
/// split lets external code destroy an instance at any time; the pool
/// discovers it as a stale free-list entry, never as a dangling pointer.
#[cfg_attr(test, mockall::automock)]
pub trait InstanceFactory: Send + Sync {
    /// Construct a fresh instance of `key`. Called on pool miss.
    fn create(&self, key: &PoolKey, request: &SpawnRequest) -> FactoryResult<Arc<PoolInstance>>;

    /// Release the factory's ownership of a dormant instance so it can be
    /// destroyed. Consumed by teardown only, bypassing release.
    fn destroy(&self, instance: &Arc<PoolInstance>);
}
