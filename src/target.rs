//! Boundary to the target collaborator.
//!
//! The engine supplies geometry and swing metadata; the target decides what a
//! valid cut means for itself (required direction, required saber, timing).
//! Broad-phase candidate selection is likewise external: the environment
//! implements [`TargetIndex`] over whatever spatial structure it already has.

use parry3d::query;
use parry3d::shape::{Ball, Cuboid, Shape};

use crate::events::CutCandidate;
use crate::geometry::SweptBox;
use crate::types::{TargetId, Transform, Vec3};

/// Volume occupied by a cuttable target.
#[derive(Clone, Copy, Debug)]
pub enum TargetShape {
    Cuboid {
        /// Local-space half-extents (hx, hy, hz).
        half_extents: Vec3,
        /// World-space pose of the cuboid.
        transform: Transform,
    },
    Sphere {
        /// Radius in meters.
        radius: f32,
        /// World-space pose (translation used; rotation ignored).
        transform: Transform,
    },
}

impl TargetShape {
    /// World-space center of the volume.
    #[inline]
    pub fn center(&self) -> Vec3 {
        match self {
            TargetShape::Cuboid { transform, .. } | TargetShape::Sphere { transform, .. } => {
                transform.translation
            }
        }
    }

    /// Narrow-phase overlap test against a swept blade box.
    pub fn intersects(&self, swept: &SweptBox) -> bool {
        let swept_shape = Cuboid::new(swept.half_extents);
        let swept_iso = swept.transform.iso();
        let result = match *self {
            TargetShape::Cuboid {
                half_extents,
                transform,
            } => {
                let cuboid = Cuboid::new(half_extents);
                query::intersection_test(
                    &swept_iso,
                    &swept_shape as &dyn Shape,
                    &transform.iso(),
                    &cuboid as &dyn Shape,
                )
            }
            TargetShape::Sphere { radius, transform } => {
                let ball = Ball::new(radius);
                query::intersection_test(
                    &swept_iso,
                    &swept_shape as &dyn Shape,
                    &transform.iso(),
                    &ball as &dyn Shape,
                )
            }
        };
        matches!(result, Ok(true))
    }
}

/// The target's verdict on a cut attempt. Produced by [`CutTarget::evaluate_cut`].
#[derive(Clone, Copy, Debug)]
pub struct CutAssessment {
    /// The swing direction matched the target's required cut direction.
    pub direction_ok: bool,
    /// The blade was moving fast enough at contact.
    pub speed_ok: bool,
    /// The target was cut by the saber type it expects.
    pub saber_type_ok: bool,
    /// The target was cut before it was meant to be cuttable.
    pub cut_too_soon: bool,
    /// Angular deviation (degrees) of the swing from the target's ideal cut
    /// direction.
    pub cut_angle_deviation_deg: f32,
}

/// A cuttable target volume. Implemented by the environment.
pub trait CutTarget {
    fn id(&self) -> TargetId;

    /// Current volume for narrow-phase overlap testing.
    fn shape(&self) -> TargetShape;

    /// Judge a cut whose swept volume overlapped this target.
    ///
    /// Returning `None` declines the cut entirely (e.g., the target was
    /// already consumed); no outcome will be produced for it.
    fn evaluate_cut(&mut self, candidate: &CutCandidate) -> Option<CutAssessment>;
}

/// External broad phase over the current set of targets.
///
/// `candidates` may overreport (false positives are filtered by the narrow
/// phase) but must never omit a target whose volume intersects `swept_aabb`.
pub trait TargetIndex {
    fn candidates(
        &mut self,
        swept_aabb: &parry3d::bounding_volume::Aabb,
        out: &mut Vec<usize>,
    );

    fn target_mut(&mut self, index: usize) -> Option<&mut dyn CutTarget>;
}
