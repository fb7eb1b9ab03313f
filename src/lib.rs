/*!
 * Instance Pool Library
 * Per-type pooling of expensive-to-construct runtime instances
 */

pub mod core;
pub mod factory;
pub mod instance;
pub mod registry;
pub mod timer;

// Re-exports
pub use crate::core::{
    CollisionPolicy, FactoryError, FactoryResult, InstanceId, Placement, PoolKey, ScalePolicy,
};
pub use factory::InstanceFactory;
pub use instance::{
    ActivationHooks, ActivationOptions, PoolInstance, PoolState, Poolable, SpawnRequest,
    StandardHooks,
};
pub use registry::{
    PoolConfig, PoolRegistry, PoolRegistryBuilder, PoolStats, Pooling, RegistryStats,
    TeardownSummary,
};
pub use timer::{DeferredTimerQueue, TimerCallback, TimerHandle, TimerId, TimerService};
