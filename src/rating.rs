//! Pure swing-quality rating functions.
//!
//! These are deterministic, side-effect-free mappings from angle deviations to
//! quality scores, kept separate from the simulation loop so they can be
//! exercised directly by unit tests.
//!
//! A swing is rated by how far the blade traveled (`angle_diff_deg`) weighted
//! by how well it stayed in one plane (`normal_diff_deg`). The before-cut half
//! normalizes against a 90° wind-up, the after-cut half against a 60°
//! follow-through.

use crate::settings::CutConfig;

/// Plane-adherence weight in `[0, 1]`.
///
/// Full credit up to `tolerance_angle_deg`, then a linear decay reaching zero
/// at `max_normal_angle_deg`. Deviations beyond the maximum clamp to zero.
#[inline]
pub fn normal_rating(normal_deviation_deg: f32, cfg: &CutConfig) -> f32 {
    let tol = cfg.tolerance_angle_deg;
    let max = cfg.max_normal_angle_deg;
    if normal_deviation_deg <= tol {
        1.0
    } else if normal_deviation_deg >= max {
        0.0
    } else {
        (max - normal_deviation_deg) / (max - tol)
    }
}

/// Rating contribution of a pre-cut swing step.
///
/// Unclamped: a swing wider than the full angle scores above 1 and the caller
/// decides whether to cap the accumulated total.
#[inline]
pub fn before_cut_rating(angle_diff_deg: f32, normal_diff_deg: f32, cfg: &CutConfig) -> f32 {
    angle_diff_deg * normal_rating(normal_diff_deg, cfg) / cfg.before_cut_full_swing_deg
}

/// Rating contribution of a post-cut follow-through step.
#[inline]
pub fn after_cut_rating(angle_diff_deg: f32, normal_diff_deg: f32, cfg: &CutConfig) -> f32 {
    angle_diff_deg * normal_rating(normal_diff_deg, cfg) / cfg.after_cut_full_swing_deg
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1.0e-5;

    #[test]
    fn normal_rating_matches_reference_points() {
        // Scenario B values.
        let cfg = CutConfig::default();
        assert_eq!(normal_rating(0.0, &cfg), 1.0);
        assert_eq!(normal_rating(75.0, &cfg), 1.0);
        assert!((normal_rating(82.5, &cfg) - 0.5).abs() < EPS);
        assert_eq!(normal_rating(90.0, &cfg), 0.0);
        assert_eq!(normal_rating(120.0, &cfg), 0.0);
    }

    #[test]
    fn normal_rating_is_non_increasing() {
        let cfg = CutConfig::default();
        let mut prev = normal_rating(0.0, &cfg);
        let mut deg = 0.0;
        while deg <= 90.0 {
            let r = normal_rating(deg, &cfg);
            assert!(r <= prev + EPS, "rating rose at {deg} deg");
            assert!((0.0..=1.0).contains(&r));
            prev = r;
            deg += 0.5;
        }
    }

    #[test]
    fn cut_ratings_are_non_negative_and_zero_at_zero_angle() {
        let cfg = CutConfig::default();
        for normal in [0.0, 40.0, 80.0, 90.0] {
            assert_eq!(before_cut_rating(0.0, normal, &cfg), 0.0);
            assert_eq!(after_cut_rating(0.0, normal, &cfg), 0.0);
            for angle in [0.0, 15.0, 90.0, 180.0] {
                assert!(before_cut_rating(angle, normal, &cfg) >= 0.0);
                assert!(after_cut_rating(angle, normal, &cfg) >= 0.0);
            }
        }
    }

    #[test]
    fn full_swing_on_plane_earns_full_rating() {
        let cfg = CutConfig::default();
        assert!((before_cut_rating(90.0, 0.0, &cfg) - 1.0).abs() < EPS);
        assert!((after_cut_rating(60.0, 0.0, &cfg) - 1.0).abs() < EPS);
    }

    #[test]
    fn follow_through_needs_less_travel_than_wind_up() {
        let cfg = CutConfig::default();
        // The same 45 degrees of travel is worth more after the cut.
        assert!(after_cut_rating(45.0, 0.0, &cfg) > before_cut_rating(45.0, 0.0, &cfg));
    }
}
