/*!
 * Error Types
 * Factory-boundary errors with thiserror, miette, and serde support
 */

use crate::core::types::PoolKey;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use smartstring::alias::String as SmartString;
use thiserror::Error;

/// Errors a factory may report when asked to construct an instance.
///
/// The registry absorbs these: a failed construction surfaces to callers
/// as a `None` acquisition, never as a raised fault.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum FactoryError {
    #[error("No factory registration for pool key '{0}'")]
    #[diagnostic(
        code(factory::unknown_key),
        help("Register the type with the factory before acquiring it, or check the key for typos.")
    )]
    UnknownKey(PoolKey),

    #[error("Failed to construct instance: {0}")]
    #[diagnostic(
        code(factory::creation_failed),
        help("Construction resources may be exhausted. View factory logs for details.")
    )]
    CreationFailed(SmartString),

    #[error("Placement rejected: {0}")]
    #[diagnostic(
        code(factory::placement_rejected),
        help("The spawn request's collision policy refused the placement. Adjust the placement or the policy.")
    )]
    PlacementRejected(SmartString),
}

/// Result type for factory operations
pub type FactoryResult<T> = Result<T, FactoryError>;
