/*!
 * Deferred Timer Queue
 * Deadline-ordered one-shot callbacks pumped by the host update loop
 */

use super::service::{TimerCallback, TimerHandle, TimerId, TimerService};
use crate::core::types::InstanceId;
use log::trace;
use parking_lot::Mutex;
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// A scheduled one-shot entry
struct Scheduled {
    deadline: Duration,
    /// Timer ids are allocated monotonically, so they double as the
    /// schedule-order tie-breaker
    id: TimerId,
    owner: InstanceId,
    cancelled: Arc<AtomicBool>,
    callback: TimerCallback,
}

impl PartialEq for Scheduled {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Scheduled {}

impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // BinaryHeap is a max-heap; reverse both fields so the earliest
        // deadline surfaces first, ties in schedule order
        other
            .deadline
            .cmp(&self.deadline)
            .then_with(|| other.id.cmp(&self.id))
    }
}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

struct QueueInner {
    now: Duration,
    heap: BinaryHeap<Scheduled>,
}

/// Cooperative one-shot timer queue.
///
/// Time is virtual: the host advances it explicitly from its update loop
/// via [`advance`](Self::advance), which fires every callback whose
/// deadline has been reached, in deadline order (ties in schedule order).
/// Callbacks run on the advancing thread with no internal lock held, so
/// they may freely schedule, cancel, or re-enter the pool registry.
///
/// A callback scheduled while a batch is firing (even with zero delay)
/// fires on the next pump, never recursively within the same one.
pub struct DeferredTimerQueue {
    inner: Mutex<QueueInner>,
    next_id: AtomicU64,
}

impl DeferredTimerQueue {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(QueueInner {
                now: Duration::ZERO,
                heap: BinaryHeap::new(),
            }),
            next_id: AtomicU64::new(1),
        }
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.inner.lock().now
    }

    /// Number of scheduled, not-yet-cancelled timers
    pub fn pending(&self) -> usize {
        self.inner
            .lock()
            .heap
            .iter()
            .filter(|entry| !entry.cancelled.load(Ordering::Acquire))
            .count()
    }

    /// Advance virtual time by `dt` and fire every due callback.
    ///
    /// Returns the number of callbacks that actually ran (cancelled
    /// entries are discarded silently, including entries cancelled by an
    /// earlier callback in the same batch).
    pub fn advance(&self, dt: Duration) -> usize {
        let due = {
            let mut inner = self.inner.lock();
            inner.now += dt;
            let now = inner.now;

            let mut due = Vec::new();
            while inner
                .heap
                .peek()
                .is_some_and(|next| next.deadline <= now)
            {
                let Some(entry) = inner.heap.pop() else {
                    break;
                };
                if !entry.cancelled.load(Ordering::Acquire) {
                    due.push(entry);
                }
            }
            due
        };

        let mut fired = 0;
        for entry in due {
            // A callback earlier in this batch may have cancelled us
            if entry.cancelled.load(Ordering::Acquire) {
                continue;
            }
            trace!("timer {} firing for instance {}", entry.id, entry.owner);
            (entry.callback)();
            fired += 1;
        }
        fired
    }
}

impl Default for DeferredTimerQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerService for DeferredTimerQueue {
    fn schedule_once(
        &self,
        owner: InstanceId,
        delay: Duration,
        callback: TimerCallback,
    ) -> TimerHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let handle = TimerHandle::new(id, owner);

        let mut inner = self.inner.lock();
        let deadline = inner.now + delay;
        inner.heap.push(Scheduled {
            deadline,
            id,
            owner,
            cancelled: handle.cancellation_flag(),
            callback,
        });
        trace!(
            "timer {} armed for instance {} (deadline {:?})",
            id,
            owner,
            deadline
        );
        handle
    }

    fn cancel(&self, handle: &TimerHandle) {
        handle.mark_cancelled();
        trace!("timer {} cancelled", handle.id());
    }

    fn cancel_all_for(&self, owner: InstanceId) -> usize {
        let inner = self.inner.lock();
        let mut purged = 0;
        for entry in inner.heap.iter() {
            if entry.owner == owner && !entry.cancelled.swap(true, Ordering::AcqRel) {
                purged += 1;
            }
        }
        if purged > 0 {
            trace!("purged {} timers for instance {}", purged, owner);
        }
        purged
    }
}
