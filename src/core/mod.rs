/*!
 * Core Module
 * Shared types, errors, and tunables for the pooling engine
 */

pub mod errors;
pub mod limits;
pub mod types;

pub use errors::{FactoryError, FactoryResult};
pub use types::{CollisionPolicy, InstanceId, Placement, PoolKey, ScalePolicy};
