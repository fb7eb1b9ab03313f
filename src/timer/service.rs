/*!
 * Timer Service Interface
 * Cancellable one-shot scheduled callbacks
 */

use crate::core::types::InstanceId;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Boxed callback invoked at most once when a timer fires
pub type TimerCallback = Box<dyn FnOnce() + Send>;

/// Monotonic identifier for a scheduled timer
pub type TimerId = u64;

/// Handle to a scheduled one-shot timer.
///
/// Cancellation is cooperative: the handle carries a shared flag that the
/// owning service checks immediately before firing, so cancel is O(1) and
/// safe to call after the timer has already fired.
#[derive(Debug, Clone)]
pub struct TimerHandle {
    id: TimerId,
    owner: InstanceId,
    cancelled: Arc<AtomicBool>,
}

impl TimerHandle {
    pub(crate) fn new(id: TimerId, owner: InstanceId) -> Self {
        Self {
            id,
            owner,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Timer identifier
    #[inline(always)]
    pub fn id(&self) -> TimerId {
        self.id
    }

    /// Instance this timer belongs to
    #[inline(always)]
    pub fn owner(&self) -> InstanceId {
        self.owner
    }

    /// Whether the timer has been cancelled
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    pub(crate) fn mark_cancelled(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub(crate) fn cancellation_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }
}

/// Schedules and cancels deferred one-shot callbacks.
///
/// Every timer is owned by an instance; `cancel_all_for` purges all of an
/// instance's pending callbacks in one call, which deactivation uses to
/// guarantee nothing fires against a parked instance.
pub trait TimerService: Send + Sync {
    /// Schedule `callback` to run once after `delay`
    fn schedule_once(
        &self,
        owner: InstanceId,
        delay: Duration,
        callback: TimerCallback,
    ) -> TimerHandle;

    /// Cancel a pending timer; no-op if it already fired or was cancelled
    fn cancel(&self, handle: &TimerHandle);

    /// Cancel every pending timer owned by `owner`, returning how many
    /// were still pending
    fn cancel_all_for(&self, owner: InstanceId) -> usize;
}
