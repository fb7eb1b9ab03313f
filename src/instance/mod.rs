/*!
 * Instance Module
 * Entity contract, per-instance state machine, and activation plumbing
 */

mod handle;
mod options;
mod poolable;
mod state;

pub use handle::PoolInstance;
pub use options::{ActivationOptions, SpawnRequest};
pub use poolable::{ActivationHooks, Poolable, StandardHooks};
pub use state::{PoolState, PoolableState};
