/*!
Core data types and math aliases shared by the engine modules.

This module intentionally contains no algorithms. It defines the data types
exchanged between:
- geometry (swept-volume construction, segment distance)
- history (per-weapon motion samples)
- controller (per-tick sweep and rating pipeline)
- clash detection
*/

use nalgebra as na;

/// Common math aliases for clarity and consistency.
pub type Vec3 = na::Vector3<f32>;
pub type Quat = na::UnitQuaternion<f32>;
pub type Iso = na::Isometry3<f32>;

/// Stable identifier of a cuttable target, assigned by the environment.
pub type TargetId = u64;

/// A rigid transform (isometry) in world space.
#[derive(Clone, Copy, Debug)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl Transform {
    #[inline]
    pub fn new(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    /// Convert to nalgebra `Isometry3` for use with parry3d narrow-phase queries.
    #[inline]
    pub fn iso(&self) -> Iso {
        Iso::from_parts(
            na::Translation3::new(self.translation.x, self.translation.y, self.translation.z),
            self.rotation,
        )
    }
}

/// Logical side/type of a saber. Targets use this to accept or reject a cut
/// (e.g., a left-hand note must be cut by the left saber).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaberType {
    Left,
    Right,
}

/// One motion sample: where the blade's tip and handle end were at `time`.
///
/// `time` is the monotonic simulation clock in seconds. Samples are immutable
/// once recorded.
#[derive(Clone, Copy, Debug)]
pub struct TimeAndPos {
    pub top: Vec3,
    pub bottom: Vec3,
    pub time: f64,
}

/// Per-tick input pose for one saber.
///
/// `tracked` reflects the hardware tracking state: when false the positions
/// are stale or garbage and the controller skips sweeping for this tick.
#[derive(Clone, Copy, Debug)]
pub struct SaberPose {
    pub top: Vec3,
    pub bottom: Vec3,
    pub tracked: bool,
}

impl SaberPose {
    #[inline]
    pub fn tracked(top: Vec3, bottom: Vec3) -> Self {
        Self {
            top,
            bottom,
            tracked: true,
        }
    }

    #[inline]
    pub fn lost() -> Self {
        Self {
            top: Vec3::zeros(),
            bottom: Vec3::zeros(),
            tracked: false,
        }
    }
}
