/*!
 * Poolable State
 * Active/InPool bookkeeping and auto-return configuration
 */

use crate::timer::TimerHandle;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Whether an instance is handed out or parked in its pool.
///
/// A freshly constructed instance starts `Active`: it is assumed in use
/// until first released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolState {
    Active,
    InPool,
}

/// Per-instance pooling state: the Active/InPool flag, the configured
/// auto-return duration, and the pending auto-return timer, if any.
///
/// Transitions themselves live on [`PoolInstance`](super::PoolInstance);
/// this struct only owns the data and enforces that at most one timer is
/// pending at a time.
#[derive(Debug)]
pub struct PoolableState {
    state: PoolState,
    auto_return: Option<Duration>,
    timer: Option<TimerHandle>,
}

impl PoolableState {
    pub(crate) fn new() -> Self {
        Self {
            state: PoolState::Active,
            auto_return: None,
            timer: None,
        }
    }

    #[inline(always)]
    pub fn state(&self) -> PoolState {
        self.state
    }

    #[inline]
    pub fn is_in_pool(&self) -> bool {
        self.state == PoolState::InPool
    }

    /// Configured auto-return duration (`None` or zero disable it)
    #[inline]
    pub fn auto_return(&self) -> Option<Duration> {
        self.auto_return
    }

    pub(crate) fn set_auto_return(&mut self, duration: Option<Duration>) {
        self.auto_return = duration;
    }

    /// The positive configured duration, if auto-return is enabled
    pub(crate) fn armed_duration(&self) -> Option<Duration> {
        self.auto_return.filter(|d| !d.is_zero())
    }

    pub(crate) fn mark_active(&mut self) {
        self.state = PoolState::Active;
    }

    pub(crate) fn mark_in_pool(&mut self) {
        self.state = PoolState::InPool;
    }

    /// Take the pending timer handle for cancellation
    pub(crate) fn take_timer(&mut self) -> Option<TimerHandle> {
        self.timer.take()
    }

    /// Store a freshly armed timer. Any previous timer must have been
    /// taken and cancelled first.
    pub(crate) fn put_timer(&mut self, handle: TimerHandle) {
        debug_assert!(
            self.timer.is_none(),
            "arming over a pending auto-return timer"
        );
        self.timer = Some(handle);
    }

    /// Whether an auto-return timer is currently pending
    #[inline]
    pub fn has_pending_timer(&self) -> bool {
        self.timer.is_some()
    }
}
