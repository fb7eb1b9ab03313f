/*!
 * Spawn Requests and Activation Options
 * Parameters carried into an instance activation
 */

use super::handle::PoolInstance;
use crate::core::types::{CollisionPolicy, Placement, ScalePolicy};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Weak};

/// Placement and context parameters passed on acquisition.
///
/// Owner and instigator are weak references: a request never keeps
/// another instance alive, and a dead reference simply clears the
/// corresponding context on the activated instance.
#[derive(Debug, Clone, Default)]
pub struct SpawnRequest {
    pub placement: Option<Placement>,
    pub owner: Option<Weak<PoolInstance>>,
    pub instigator: Option<Weak<PoolInstance>>,
    pub collision: CollisionPolicy,
    pub scale: ScalePolicy,
}

impl SpawnRequest {
    /// Empty request: no placement, no context, default policies
    pub fn new() -> Self {
        Self::default()
    }

    /// Request placing the instance at `placement`
    pub fn at(placement: Placement) -> Self {
        Self {
            placement: Some(placement),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_owner(mut self, owner: &Arc<PoolInstance>) -> Self {
        self.owner = Some(Arc::downgrade(owner));
        self
    }

    #[must_use]
    pub fn with_instigator(mut self, instigator: &Arc<PoolInstance>) -> Self {
        self.instigator = Some(Arc::downgrade(instigator));
        self
    }

    #[must_use]
    pub fn with_collision(mut self, collision: CollisionPolicy) -> Self {
        self.collision = collision;
        self
    }

    #[must_use]
    pub fn with_scale(mut self, scale: ScalePolicy) -> Self {
        self.scale = scale;
        self
    }
}

/// Flags gating which activation side effects run.
///
/// Everything defaults to on. `restore_placement` is additionally gated
/// at apply time on the spawn request actually carrying a placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationOptions {
    pub restore_placement: bool,
    pub make_visible: bool,
    pub enable_tick: bool,
    pub enable_collision: bool,
    pub enable_component_tick: bool,
    pub reset_physics_velocity: bool,
    pub activate_effects: bool,
    pub activate_audio: bool,
}

impl Default for ActivationOptions {
    fn default() -> Self {
        Self {
            restore_placement: true,
            make_visible: true,
            enable_tick: true,
            enable_collision: true,
            enable_component_tick: true,
            reset_physics_velocity: true,
            activate_effects: true,
            activate_audio: true,
        }
    }
}

impl ActivationOptions {
    /// All side effects enabled
    #[inline]
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Options for instances going straight back to the pool: invisible,
    /// no tick, no collision. Used by prewarm.
    #[inline]
    #[must_use]
    pub fn dormant() -> Self {
        Self {
            make_visible: false,
            enable_tick: false,
            enable_collision: false,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_visibility(mut self, visible: bool) -> Self {
        self.make_visible = visible;
        self
    }

    #[must_use]
    pub fn with_tick(mut self, enabled: bool) -> Self {
        self.enable_tick = enabled;
        self
    }

    #[must_use]
    pub fn with_collision(mut self, enabled: bool) -> Self {
        self.enable_collision = enabled;
        self
    }

    #[must_use]
    pub fn with_effects(mut self, enabled: bool) -> Self {
        self.activate_effects = enabled;
        self
    }

    #[must_use]
    pub fn with_audio(mut self, enabled: bool) -> Self {
        self.activate_audio = enabled;
        self
    }
}
