/*!
 * Limits
 * Compile-time tunables for pool sizing
 */

/// Upper bound on a single prewarm batch.
///
/// Prewarm requests above this are clamped, not rejected.
pub const MAX_PREWARM: usize = 1024;

/// Initial capacity reserved for a type's free list.
pub const FREE_LIST_INITIAL_CAPACITY: usize = 16;

/// Initial capacity for per-instance notification listener lists.
/// Most instances bind zero or one listener per event.
pub const LISTENER_INITIAL_CAPACITY: usize = 2;
