/*!
 * Pool Instance
 * An entity plus its attached pooling state and notification hooks
 */

use super::options::{ActivationOptions, SpawnRequest};
use super::poolable::{self, Poolable};
use super::state::{PoolState, PoolableState};
use crate::core::limits;
use crate::core::types::{InstanceId, PoolKey};
use crate::registry::RegistryShared;
use crate::timer::TimerService;
use log::debug;
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;

type Listener = Box<dyn Fn() + Send + Sync>;

/// Where a bound instance returns itself to.
///
/// Refreshed on every activation, so an instance follows the registry
/// that most recently handed it out.
#[derive(Clone)]
struct PoolBinding {
    registry: Weak<RegistryShared>,
    timers: Arc<dyn TimerService>,
}

/// A poolable entity together with its pooling state.
///
/// The registry and free lists hold only `Weak` references to this;
/// strong ownership stays with the factory or host. Dropping every
/// strong reference destroys the instance, and the pool detects that
/// lazily the next time its free-list entry is popped.
pub struct PoolInstance {
    id: InstanceId,
    entity: Box<dyn Poolable>,
    state: Mutex<PoolableState>,
    binding: Mutex<Option<PoolBinding>>,
    acquired_listeners: RwLock<Vec<Listener>>,
    released_listeners: RwLock<Vec<Listener>>,
}

impl PoolInstance {
    /// Wrap an entity for pooling. The instance starts `Active`.
    pub fn new(entity: Box<dyn Poolable>) -> Arc<Self> {
        Arc::new(Self {
            id: InstanceId::generate(),
            entity,
            state: Mutex::new(PoolableState::new()),
            binding: Mutex::new(None),
            acquired_listeners: RwLock::new(Vec::with_capacity(limits::LISTENER_INITIAL_CAPACITY)),
            released_listeners: RwLock::new(Vec::with_capacity(limits::LISTENER_INITIAL_CAPACITY)),
        })
    }

    #[inline(always)]
    pub fn id(&self) -> InstanceId {
        self.id
    }

    /// Pool key of the underlying entity's concrete type
    #[inline]
    pub fn key(&self) -> PoolKey {
        self.entity.key()
    }

    /// Access the underlying entity
    #[inline]
    pub fn entity(&self) -> &dyn Poolable {
        self.entity.as_ref()
    }

    pub fn state(&self) -> PoolState {
        self.state.lock().state()
    }

    pub fn is_in_pool(&self) -> bool {
        self.state.lock().is_in_pool()
    }

    /// Configured auto-return duration (`None` or zero mean never)
    pub fn auto_return(&self) -> Option<Duration> {
        self.state.lock().auto_return()
    }

    /// Whether an auto-return timer is currently pending
    pub fn has_pending_auto_return(&self) -> bool {
        self.state.lock().has_pending_timer()
    }

    /// Bind a callback invoked after every activation
    pub fn on_acquired(&self, listener: impl Fn() + Send + Sync + 'static) {
        self.acquired_listeners.write().push(Box::new(listener));
    }

    /// Bind a callback invoked after every deactivation
    pub fn on_released(&self, listener: impl Fn() + Send + Sync + 'static) {
        self.released_listeners.write().push(Box::new(listener));
    }

    /// Configure auto-return. Cancels any pending timer; if the instance
    /// is currently `Active` and the duration is positive, a fresh timer
    /// is armed immediately, without a re-activation cycle.
    pub fn set_auto_return(self: &Arc<Self>, duration: Option<Duration>) {
        self.cancel_pending_timer();
        self.state.lock().set_auto_return(duration);
        self.arm_auto_return();
    }

    /// Hand this instance back to the registry that last activated it.
    ///
    /// Returns `false` (and does nothing) if the instance was never
    /// activated through a registry or that registry is gone. This is
    /// also the auto-return timer's target.
    pub fn return_to_pool(self: &Arc<Self>) -> bool {
        let registry = self
            .binding
            .lock()
            .as_ref()
            .and_then(|binding| binding.registry.upgrade());
        let Some(registry) = registry else {
            debug!("return ignored: instance {} has no live registry", self.id);
            return false;
        };
        registry.release(self);
        true
    }

    /// Adopt the registry/timer pair that will service auto-return
    pub(crate) fn bind(&self, registry: Weak<RegistryShared>, timers: Arc<dyn TimerService>) {
        *self.binding.lock() = Some(PoolBinding { registry, timers });
    }

    /// Transition to `Active`: cancel any pending auto-return timer,
    /// apply the activation hooks, re-arm auto-return, notify listeners.
    pub(crate) fn activate(self: &Arc<Self>, request: &SpawnRequest, options: &ActivationOptions) {
        self.state.lock().mark_active();
        self.cancel_pending_timer();

        match self.entity.hooks() {
            Some(hooks) => hooks.on_activate(self.entity.as_ref(), request, options),
            None => poolable::apply_fallback_activate(self.entity.as_ref(), request, options),
        }

        self.arm_auto_return();
        self.broadcast(&self.acquired_listeners);
        debug!("instance {} activated ({})", self.id, self.key());
    }

    /// Transition to `InPool`: cancel timers, suppress the entity, purge
    /// instance-scoped deferred callbacks, notify listeners.
    ///
    /// Already-parked instances are left untouched; returns whether a
    /// transition happened.
    pub(crate) fn deactivate(&self) -> bool {
        {
            let mut state = self.state.lock();
            if state.is_in_pool() {
                return false;
            }
            state.mark_in_pool();
        }
        self.cancel_pending_timer();

        match self.entity.hooks() {
            Some(hooks) => hooks.on_deactivate(self.entity.as_ref()),
            None => poolable::apply_fallback_deactivate(self.entity.as_ref()),
        }

        // Nothing scheduled against this instance may outlive parking
        if let Some(binding) = self.binding.lock().clone() {
            binding.timers.cancel_all_for(self.id);
        }

        self.broadcast(&self.released_listeners);
        debug!("instance {} deactivated ({})", self.id, self.key());
        true
    }

    fn cancel_pending_timer(&self) {
        let Some(timer) = self.state.lock().take_timer() else {
            return;
        };
        match self.binding.lock().as_ref() {
            Some(binding) => binding.timers.cancel(&timer),
            None => timer.mark_cancelled(),
        }
    }

    /// Arm the auto-return timer if bound, `Active`, and configured with
    /// a positive duration
    fn arm_auto_return(self: &Arc<Self>) {
        let Some(binding) = self.binding.lock().clone() else {
            return;
        };
        let duration = {
            let state = self.state.lock();
            if state.state() != PoolState::Active {
                return;
            }
            match state.armed_duration() {
                Some(duration) => duration,
                None => return,
            }
        };

        let weak = Arc::downgrade(self);
        let handle = binding.timers.schedule_once(
            self.id,
            duration,
            Box::new(move || {
                if let Some(instance) = weak.upgrade() {
                    instance.return_to_pool();
                }
            }),
        );
        self.state.lock().put_timer(handle);
    }

    fn broadcast(&self, listeners: &RwLock<Vec<Listener>>) {
        for listener in listeners.read().iter() {
            listener();
        }
    }
}

impl fmt::Debug for PoolInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolInstance")
            .field("id", &self.id)
            .field("key", &self.key())
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
