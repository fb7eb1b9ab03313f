/*!
 * Core Types
 * Common vocabulary shared across the pooling engine
 */

use serde::{Deserialize, Serialize};
use smartstring::alias::String as SmartString;
use std::fmt;
use uuid::Uuid;

/// Identifies a poolable type. One pool exists per distinct key.
///
/// Short keys (≤23 bytes) are stored inline without heap allocation,
/// which covers typical type names on the acquire hot path.
///
/// The empty key is reserved as invalid and rejected at the registry
/// boundary.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct PoolKey {
    inner: SmartString,
}

impl PoolKey {
    /// Create a key from any string-like value
    #[inline]
    pub fn new(key: impl AsRef<str>) -> Self {
        Self {
            inner: SmartString::from(key.as_ref()),
        }
    }

    /// Get the key as a string slice
    #[inline(always)]
    pub fn as_str(&self) -> &str {
        self.inner.as_str()
    }

    /// Get length in bytes
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// An empty key never names a valid pool
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl fmt::Display for PoolKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.inner.as_str())
    }
}

impl From<&str> for PoolKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for PoolKey {
    fn from(key: String) -> Self {
        Self {
            inner: SmartString::from(key),
        }
    }
}

/// Unique identifier for a pooled instance
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct InstanceId(Uuid);

impl InstanceId {
    /// Generate a fresh id
    #[inline]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying UUID
    #[inline(always)]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// World placement applied on activation: translation, rotation
/// (quaternion, xyzw), and scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub translation: [f32; 3],
    pub rotation: [f32; 4],
    pub scale: [f32; 3],
}

impl Placement {
    /// Identity placement (no translation, no rotation, unit scale)
    pub const IDENTITY: Self = Self {
        translation: [0.0, 0.0, 0.0],
        rotation: [0.0, 0.0, 0.0, 1.0],
        scale: [1.0, 1.0, 1.0],
    };

    /// Placement at a translation with identity rotation and scale
    #[inline]
    pub fn at(translation: [f32; 3]) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// How construction resolves placement conflicts with existing geometry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Construct at the requested placement unconditionally
    #[default]
    AlwaysSpawn,
    /// Nudge the placement until it no longer overlaps
    AdjustIfOverlapping,
    /// Fail construction rather than overlap
    SkipIfOverlapping,
}

/// How a requested scale combines with the instance's own scale
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalePolicy {
    /// Multiply the request scale into the instance's root scale
    #[default]
    MultiplyWithRoot,
    /// Overwrite the instance's scale with the request scale
    Absolute,
}
