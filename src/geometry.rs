//! Scalar/vector geometry for the cut engine.
//!
//! Two jobs live here:
//! - [`three_points_to_box`]: build the oriented box bounding the blade path
//!   swept during one tick (current top/bottom tips plus the previous blade
//!   midpoint). Degenerate inputs yield `None`, never an invalid box.
//! - [`segment_segment_distance`]: closest distance between two segments,
//!   with guards for near-zero-length and near-parallel segments.

use nalgebra as na;
use parry3d::bounding_volume::Aabb;
use parry3d::shape::Cuboid;

use crate::settings::{DIST_EPS, PARALLEL_EPS};
use crate::types::{Quat, Transform, Vec3};

/// Oriented box approximating the volume swept by the blade in one tick.
///
/// Local axes: X along the blade, Y along the swing-plane normal (the cut
/// normal), Z completing the right-handed basis.
#[derive(Clone, Copy, Debug)]
pub struct SweptBox {
    pub half_extents: Vec3,
    pub transform: Transform,
}

impl SweptBox {
    /// The cut-plane normal: the box's local +Y axis in world space.
    #[inline]
    pub fn cut_normal(&self) -> Vec3 {
        self.transform.rotation * Vec3::y()
    }

    /// World-space AABB of the box, for handing to an external broad phase.
    #[inline]
    pub fn aabb(&self) -> Aabb {
        Cuboid::new(self.half_extents).aabb(&self.transform.iso())
    }
}

/// Build a minimal oriented box bounding three points of a one-tick sweep.
///
/// - `p0`, `p1`: current blade top and bottom tips.
/// - `p2`: previous blade midpoint.
/// - `min_half_thickness`: floor for the extent along the plane normal, so a
///   near-planar sweep still has a testable volume.
///
/// Returns `None` when the blade has near-zero length or the three points are
/// collinear — there is no swept volume this tick and the caller should skip
/// collision testing rather than use an invalid box.
pub fn three_points_to_box(
    p0: Vec3,
    p1: Vec3,
    p2: Vec3,
    min_half_thickness: f32,
) -> Option<SweptBox> {
    let u = p1 - p0;
    let v = p2 - p0;

    let u_len = u.norm();
    if u_len <= DIST_EPS {
        return None;
    }

    let n = u.cross(&v);
    let n_len = n.norm();
    // Collinearity test scales with the input so long blades don't pass a
    // fixed absolute threshold spuriously.
    if n_len <= DIST_EPS * u_len.max(1.0) {
        return None;
    }

    let e0 = u / u_len;
    let e1 = n / n_len;
    let e2 = e0.cross(&e1);

    // Project the three points onto the local axes to find extents.
    let mut mins = Vec3::zeros();
    let mut maxs = Vec3::zeros();
    for (i, axis) in [e0, e1, e2].iter().enumerate() {
        let c0 = 0.0f32; // p0 projects to the local origin
        let c1 = u.dot(axis);
        let c2 = v.dot(axis);
        mins[i] = c0.min(c1).min(c2);
        maxs[i] = c0.max(c1).max(c2);
    }

    let local_center = (mins + maxs) * 0.5;
    let mut half_extents = (maxs - mins) * 0.5;
    half_extents.y = half_extents.y.max(min_half_thickness);

    let center = p0 + e0 * local_center.x + e1 * local_center.y + e2 * local_center.z;
    let rotation: Quat =
        na::UnitQuaternion::from_rotation_matrix(&na::Rotation3::from_basis_unchecked(&[
            e0, e1, e2,
        ]));

    Some(SweptBox {
        half_extents,
        transform: Transform::new(center, rotation),
    })
}

/// Closest distance between segments `a0..a1` and `b0..b1`, plus the midpoint
/// of the closest-point pair (the clash contact point).
///
/// Degenerate segments collapse to point queries; near-parallel segments are
/// guarded on the denominator of the line-line system so the result stays
/// finite and stable.
pub fn segment_segment_distance(a0: Vec3, a1: Vec3, b0: Vec3, b1: Vec3) -> (f32, Vec3) {
    let d1 = a1 - a0;
    let d2 = b1 - b0;
    let r = a0 - b0;

    let aa = d1.norm_squared();
    let ee = d2.norm_squared();
    let f = d2.dot(&r);

    let (s, t);
    if aa <= PARALLEL_EPS && ee <= PARALLEL_EPS {
        // Both segments are points.
        s = 0.0;
        t = 0.0;
    } else if aa <= PARALLEL_EPS {
        // First segment is a point.
        s = 0.0;
        t = (f / ee).clamp(0.0, 1.0);
    } else {
        let c = d1.dot(&r);
        if ee <= PARALLEL_EPS {
            // Second segment is a point.
            t = 0.0;
            s = (-c / aa).clamp(0.0, 1.0);
        } else {
            let b = d1.dot(&d2);
            let denom = aa * ee - b * b;

            // Near-parallel: denom collapses; pick s = 0 and resolve t below.
            let s_unclamped = if denom > PARALLEL_EPS {
                (b * f - c * ee) / denom
            } else {
                0.0
            };
            let s_clamped = s_unclamped.clamp(0.0, 1.0);

            let t_unclamped = (b * s_clamped + f) / ee;
            if t_unclamped < 0.0 {
                t = 0.0;
                s = (-c / aa).clamp(0.0, 1.0);
            } else if t_unclamped > 1.0 {
                t = 1.0;
                s = ((b - c) / aa).clamp(0.0, 1.0);
            } else {
                t = t_unclamped;
                s = s_clamped;
            }
        }
    }

    let p1 = a0 + d1 * s;
    let p2 = b0 + d2 * t;
    ((p1 - p2).norm(), (p1 + p2) * 0.5)
}

/// Closest point to `p` on segment `a..b`.
pub(crate) fn closest_point_on_segment(a: Vec3, b: Vec3, p: Vec3) -> Vec3 {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq <= PARALLEL_EPS {
        return a;
    }
    let t = ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Angle between two vectors in degrees. Zero-length inputs score zero.
#[inline]
pub fn angle_between_deg(a: Vec3, b: Vec3) -> f32 {
    if a.norm_squared() <= PARALLEL_EPS || b.norm_squared() <= PARALLEL_EPS {
        return 0.0;
    }
    a.angle(&b).to_degrees()
}

/// Angle between two plane normals, folded into `[0, 90]` degrees.
///
/// Plane normals are sign-agnostic: a normal and its negation describe the
/// same plane, so deviations beyond 90 fold back.
#[inline]
pub(crate) fn plane_deviation_deg(n1: Vec3, n2: Vec3) -> f32 {
    let theta = angle_between_deg(n1, n2);
    theta.min(180.0 - theta)
}

/// Plane normal through three points, or `None` when they are collinear.
#[inline]
pub(crate) fn plane_normal(p0: Vec3, p1: Vec3, p2: Vec3) -> Option<Vec3> {
    let n = (p0 - p1).cross(&(p2 - p1));
    let len = n.norm();
    if len <= DIST_EPS { None } else { Some(n / len) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::MIN_SWEEP_HALF_THICKNESS;
    use nalgebra as na;

    const EPS: f32 = 1.0e-4;

    #[test]
    fn box_from_coincident_points_is_rejected() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert!(three_points_to_box(p, p, p, MIN_SWEEP_HALF_THICKNESS).is_none());
    }

    #[test]
    fn box_from_collinear_points_is_rejected() {
        let p0 = Vec3::new(0.0, 0.0, 0.0);
        let p1 = Vec3::new(0.0, 1.0, 0.0);
        let p2 = Vec3::new(0.0, 2.5, 0.0);
        assert!(three_points_to_box(p0, p1, p2, MIN_SWEEP_HALF_THICKNESS).is_none());
    }

    #[test]
    fn box_from_zero_length_blade_is_rejected() {
        let p0 = Vec3::new(0.0, 1.0, 0.0);
        let p2 = Vec3::new(1.0, 0.0, 0.0);
        assert!(three_points_to_box(p0, p0, p2, MIN_SWEEP_HALF_THICKNESS).is_none());
    }

    #[test]
    fn box_bounds_all_three_points_with_finite_extents() {
        let p0 = Vec3::new(0.0, 1.0, 0.0);
        let p1 = Vec3::new(0.0, 0.0, 0.0);
        let p2 = Vec3::new(0.2, 0.5, 0.0);
        let swept = three_points_to_box(p0, p1, p2, MIN_SWEEP_HALF_THICKNESS).unwrap();

        assert!(swept.half_extents.iter().all(|h| h.is_finite() && *h > 0.0));
        assert!(swept.half_extents.y >= MIN_SWEEP_HALF_THICKNESS);

        // Every input point lies inside the box (inflated by the thickness floor).
        let inv = swept.transform.iso().inverse();
        for p in [p0, p1, p2] {
            let local = inv * na::Point3::new(p.x, p.y, p.z);
            assert!(local.x.abs() <= swept.half_extents.x + EPS);
            assert!(local.y.abs() <= swept.half_extents.y + EPS);
            assert!(local.z.abs() <= swept.half_extents.z + EPS);
        }
    }

    #[test]
    fn cut_normal_is_perpendicular_to_blade() {
        let p0 = Vec3::new(0.0, 1.0, 0.0);
        let p1 = Vec3::new(0.0, 0.0, 0.0);
        let p2 = Vec3::new(0.3, 0.5, 0.1);
        let swept = three_points_to_box(p0, p1, p2, MIN_SWEEP_HALF_THICKNESS).unwrap();

        let blade = p1 - p0;
        assert!(swept.cut_normal().dot(&blade).abs() < EPS);
        assert!((swept.cut_normal().norm() - 1.0).abs() < EPS);
    }

    #[test]
    fn parallel_offset_segments_measure_their_gap() {
        // Scenario A: two parallel unit segments 0.5 apart.
        let a0 = Vec3::new(0.0, 0.0, 0.0);
        let a1 = Vec3::new(0.0, 1.0, 0.0);
        let b0 = Vec3::new(0.5, 0.0, 0.0);
        let b1 = Vec3::new(0.5, 1.0, 0.0);

        let (d_ab, _) = segment_segment_distance(a0, a1, b0, b1);
        let (d_ba, _) = segment_segment_distance(b0, b1, a0, a1);
        assert!((d_ab - 0.5).abs() < EPS);
        assert!((d_ba - 0.5).abs() < EPS);
    }

    #[test]
    fn segment_distance_is_symmetric() {
        let cases = [
            (
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.5, 0.0),
                Vec3::new(0.3, -1.0, 0.7),
                Vec3::new(-0.2, 2.0, 0.1),
            ),
            (
                Vec3::new(-1.0, -1.0, -1.0),
                Vec3::new(1.0, 1.0, 1.0),
                Vec3::new(2.0, 0.0, 0.0),
                Vec3::new(2.0, 0.0, 3.0),
            ),
            (
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 1.0),
                Vec3::new(1.0, 1.0, 1.0),
            ),
        ];
        for (a0, a1, b0, b1) in cases {
            let (d_ab, _) = segment_segment_distance(a0, a1, b0, b1);
            let (d_ba, _) = segment_segment_distance(b0, b1, a0, a1);
            assert!((d_ab - d_ba).abs() < EPS, "asymmetric for {a0:?}..{b1:?}");
        }
    }

    #[test]
    fn crossing_segments_touch_and_midpoint_lies_on_both() {
        let a0 = Vec3::new(-1.0, 0.0, 0.0);
        let a1 = Vec3::new(1.0, 0.0, 0.0);
        let b0 = Vec3::new(0.0, -1.0, 0.0);
        let b1 = Vec3::new(0.0, 1.0, 0.0);

        let (d, mid) = segment_segment_distance(a0, a1, b0, b1);
        assert!(d < EPS);
        // The crossing is at the origin; the midpoint must be there too.
        assert!(mid.norm() < EPS);
    }

    #[test]
    fn degenerate_segments_collapse_to_point_distance() {
        let p = Vec3::new(0.0, 2.0, 0.0);
        let a0 = Vec3::new(0.0, 0.0, 0.0);
        let a1 = Vec3::new(0.0, 1.0, 0.0);

        // Point vs segment: closest at the segment's top end.
        let (d, _) = segment_segment_distance(p, p, a0, a1);
        assert!((d - 1.0).abs() < EPS);

        // Point vs point.
        let q = Vec3::new(3.0, 2.0, 0.0);
        let (d, mid) = segment_segment_distance(p, p, q, q);
        assert!((d - 3.0).abs() < EPS);
        assert!((mid - Vec3::new(1.5, 2.0, 0.0)).norm() < EPS);
    }

    #[test]
    fn near_parallel_segments_stay_finite() {
        // Almost-parallel long segments: the naive line-line denominator
        // vanishes; the guarded path must still return a sane distance.
        let a0 = Vec3::new(0.0, 0.0, 0.0);
        let a1 = Vec3::new(100.0, 0.0, 0.0);
        let b0 = Vec3::new(0.0, 1.0, 0.0);
        let b1 = Vec3::new(100.0, 1.0 + 1.0e-7, 0.0);

        let (d, mid) = segment_segment_distance(a0, a1, b0, b1);
        assert!(d.is_finite());
        assert!(mid.iter().all(|c| c.is_finite()));
        assert!((d - 1.0).abs() < 1.0e-3);
    }
}
