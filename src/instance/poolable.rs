/*!
 * Poolable Contract
 * Entity-side trait and the activation hook seam
 */

use super::handle::PoolInstance;
use super::options::{ActivationOptions, SpawnRequest};
use crate::core::types::{Placement, PoolKey};
use std::sync::Weak;

/// Contract a type implements to become poolable.
///
/// The three core primitives (visibility, tick, collision) are required:
/// they are the minimum the engine needs to park an instance. Everything
/// else defaults to a no-op so simple types stay simple.
///
/// Types wanting full-fidelity activation override [`hooks`](Self::hooks)
/// to return an [`ActivationHooks`] implementation (their own, or the
/// ready-made [`StandardHooks`]). Types returning `None` get the built-in
/// minimal toggle of visibility/tick/collision.
pub trait Poolable: Send + Sync {
    /// Pool key of the concrete type. Release files the instance under
    /// this key, so a subtype pools separately from its base type.
    fn key(&self) -> PoolKey;

    fn set_visible(&self, visible: bool);
    fn set_tick_enabled(&self, enabled: bool);
    fn set_collision_enabled(&self, enabled: bool);

    fn set_placement(&self, _placement: &Placement) {}
    fn set_component_tick_enabled(&self, _enabled: bool) {}
    fn reset_physics_velocity(&self) {}
    fn set_effects_active(&self, _active: bool) {}
    fn set_audio_active(&self, _active: bool) {}

    /// Adopt owner/instigator context for this activation
    fn set_context(
        &self,
        _owner: Option<Weak<PoolInstance>>,
        _instigator: Option<Weak<PoolInstance>>,
    ) {
    }

    /// Drop any adopted context so a parked instance holds no references
    fn clear_context(&self) {}

    /// Capability probe for the rich activation path
    fn hooks(&self) -> Option<&dyn ActivationHooks> {
        None
    }
}

/// Per-type activation/deactivation callbacks.
///
/// The registry delegates the whole restore/suppress sequence to this
/// when an instance's type provides it.
pub trait ActivationHooks: Send + Sync {
    fn on_activate(&self, entity: &dyn Poolable, request: &SpawnRequest, options: &ActivationOptions);
    fn on_deactivate(&self, entity: &dyn Poolable);
}

/// Ready-made hook set applying the full option-gated sequence through
/// the [`Poolable`] primitives.
///
/// Activation order: context, placement, visibility, actor tick,
/// collision, component tick, physics velocity reset, effects, audio.
/// Deactivation suppresses all of these and clears context.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardHooks;

impl ActivationHooks for StandardHooks {
    fn on_activate(&self, entity: &dyn Poolable, request: &SpawnRequest, options: &ActivationOptions) {
        entity.set_context(request.owner.clone(), request.instigator.clone());
        if options.restore_placement {
            if let Some(placement) = request.placement.as_ref() {
                entity.set_placement(placement);
            }
        }
        if options.make_visible {
            entity.set_visible(true);
        }
        entity.set_tick_enabled(options.enable_tick);
        entity.set_collision_enabled(options.enable_collision);
        entity.set_component_tick_enabled(options.enable_component_tick);
        if options.reset_physics_velocity {
            entity.reset_physics_velocity();
        }
        if options.activate_effects {
            entity.set_effects_active(true);
        }
        if options.activate_audio {
            entity.set_audio_active(true);
        }
    }

    fn on_deactivate(&self, entity: &dyn Poolable) {
        entity.set_visible(false);
        entity.set_collision_enabled(false);
        entity.set_tick_enabled(false);
        entity.set_component_tick_enabled(false);
        entity.reset_physics_velocity();
        entity.set_effects_active(false);
        entity.set_audio_active(false);
        entity.clear_context();
    }
}

/// Minimal fallback for types without rich hooks: visibility follows the
/// `make_visible` option directly, tick and collision follow their flags.
pub(crate) fn apply_fallback_activate(
    entity: &dyn Poolable,
    request: &SpawnRequest,
    options: &ActivationOptions,
) {
    if options.restore_placement {
        if let Some(placement) = request.placement.as_ref() {
            entity.set_placement(placement);
        }
    }
    entity.set_visible(options.make_visible);
    entity.set_tick_enabled(options.enable_tick);
    entity.set_collision_enabled(options.enable_collision);
}

/// Minimal fallback suppression: hide, no collision, no tick
pub(crate) fn apply_fallback_deactivate(entity: &dyn Poolable) {
    entity.set_visible(false);
    entity.set_collision_enabled(false);
    entity.set_tick_enabled(false);
}
