//! Time-windowed motion history for one saber.
//!
//! The controller appends one [`TimeAndPos`] per valid tick; the buffer prunes
//! itself to a fixed retention window. Recent samples feed two derived values:
//! the cut-plane normal that seeds after-cut tracking, and the pre-cut swing
//! rating.

use std::collections::VecDeque;

use crate::geometry::{angle_between_deg, plane_deviation_deg, plane_normal};
use crate::rating::before_cut_rating;
use crate::settings::CutConfig;
use crate::types::{TimeAndPos, Vec3};

/// Append-only, time-ordered ring of blade poses.
///
/// Invariant: sample times are strictly increasing. The buffer is the sole
/// writer; out-of-order times are dropped rather than corrupting the order.
#[derive(Debug)]
pub struct MotionHistory {
    samples: VecDeque<TimeAndPos>,
    retention_seconds: f64,
}

impl MotionHistory {
    pub fn new(retention_seconds: f64) -> Self {
        Self {
            samples: VecDeque::with_capacity(64),
            retention_seconds,
        }
    }

    /// Record the blade pose for this tick and prune samples that fell out of
    /// the retention window.
    pub fn add_sample(&mut self, top: Vec3, bottom: Vec3, time: f64) {
        if let Some(last) = self.samples.back()
            && time <= last.time
        {
            log::trace!("dropping non-increasing history sample at t={time}");
            return;
        }
        self.samples.push_back(TimeAndPos { top, bottom, time });

        while let Some(front) = self.samples.front() {
            if time - front.time > self.retention_seconds {
                self.samples.pop_front();
            } else {
                break;
            }
        }
    }

    /// Latest sample, O(1).
    #[inline]
    pub fn last_sample(&self) -> Option<&TimeAndPos> {
        self.samples.back()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Normal of the plane the blade swept over the most recent tick, used to
    /// seed after-cut tracking. `None` while the blade is stationary or the
    /// history holds fewer than two samples.
    pub fn compute_cut_plane_normal(&self) -> Option<Vec3> {
        let n = self.samples.len();
        if n < 2 {
            return None;
        }
        let last = &self.samples[n - 1];
        let prev = &self.samples[n - 2];
        plane_normal(last.top, last.bottom, prev.top)
    }

    /// Rate the recent swing in `[0, 1]`.
    ///
    /// Walks sample pairs backwards from the newest, capped at the configured
    /// lookback, and accumulates per-step blade travel weighted by how well
    /// each step stayed in the overall swing plane. Returns 0 with
    /// insufficient history.
    pub fn compute_swing_rating(&self, cfg: &CutConfig) -> f32 {
        let n = self.samples.len();
        if n < 2 {
            return 0.0;
        }
        let Some(overall_normal) = self.compute_cut_plane_normal() else {
            return 0.0;
        };

        let newest_time = self.samples[n - 1].time;
        let mut rating = 0.0f32;

        for i in (1..n).rev() {
            let prev = &self.samples[i - 1];
            if newest_time - prev.time > cfg.swing_lookback_seconds {
                break;
            }
            let next = &self.samples[i];

            let Some(step_normal) = plane_normal(next.top, next.bottom, prev.top) else {
                // Stationary step: no travel, nothing to rate.
                continue;
            };
            let normal_diff = plane_deviation_deg(step_normal, overall_normal);
            let step_angle = angle_between_deg(next.top - next.bottom, prev.top - prev.bottom);
            rating += before_cut_rating(step_angle, normal_diff, cfg);
        }

        rating.min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::HISTORY_RETENTION_SECONDS;

    fn swing_history(total_angle_deg: f32, duration: f64, ticks: usize) -> MotionHistory {
        // Blade anchored at the origin, tip rotating in the XY plane.
        let mut history = MotionHistory::new(HISTORY_RETENTION_SECONDS);
        for i in 0..=ticks {
            let frac = i as f32 / ticks as f32;
            let theta = (total_angle_deg * frac).to_radians();
            let top = Vec3::new(theta.sin(), theta.cos(), 0.0);
            history.add_sample(top, Vec3::zeros(), i as f64 * duration / ticks as f64);
        }
        history
    }

    #[test]
    fn last_sample_tracks_the_maximum_time() {
        let mut history = MotionHistory::new(HISTORY_RETENTION_SECONDS);
        let times = [0.0, 0.016, 0.032, 0.048, 0.064];
        for (i, t) in times.iter().enumerate() {
            history.add_sample(Vec3::new(i as f32, 1.0, 0.0), Vec3::zeros(), *t);
            assert_eq!(history.last_sample().unwrap().time, *t);
        }
        assert_eq!(history.last_sample().unwrap().time, 0.064);
    }

    #[test]
    fn non_increasing_times_are_dropped() {
        let mut history = MotionHistory::new(HISTORY_RETENTION_SECONDS);
        history.add_sample(Vec3::y(), Vec3::zeros(), 1.0);
        history.add_sample(Vec3::x(), Vec3::zeros(), 1.0);
        history.add_sample(Vec3::x(), Vec3::zeros(), 0.5);
        assert_eq!(history.len(), 1);
        assert_eq!(history.last_sample().unwrap().time, 1.0);
    }

    #[test]
    fn retention_window_prunes_old_samples() {
        let mut history = MotionHistory::new(0.1);
        for i in 0..100 {
            history.add_sample(Vec3::y(), Vec3::zeros(), i as f64 * 0.016);
        }
        let newest = history.last_sample().unwrap().time;
        assert!(history.len() < 100);
        for s in &history.samples {
            assert!(newest - s.time <= 0.1 + 1.0e-9);
        }
    }

    #[test]
    fn swing_rating_is_zero_with_insufficient_history() {
        let cfg = CutConfig::default();
        let mut history = MotionHistory::new(HISTORY_RETENTION_SECONDS);
        assert_eq!(history.compute_swing_rating(&cfg), 0.0);
        history.add_sample(Vec3::y(), Vec3::zeros(), 0.0);
        assert_eq!(history.compute_swing_rating(&cfg), 0.0);
    }

    #[test]
    fn wider_swing_rates_higher_than_narrow_swing() {
        // Scenario C: 90 degrees in 0.2s beats 30 degrees in 0.2s.
        let cfg = CutConfig::default();
        let wide = swing_history(90.0, 0.2, 10);
        let narrow = swing_history(30.0, 0.2, 10);

        let wide_rating = wide.compute_swing_rating(&cfg);
        let narrow_rating = narrow.compute_swing_rating(&cfg);
        assert!(wide_rating > narrow_rating);
        assert!((wide_rating - 1.0).abs() < 0.05);
        assert!((narrow_rating - 30.0 / 90.0).abs() < 0.05);
    }

    #[test]
    fn stationary_prefix_does_not_change_the_rating() {
        let cfg = CutConfig::default();
        let mut with_prefix = MotionHistory::new(HISTORY_RETENTION_SECONDS);
        // Held still for 10 ticks, then swung.
        for i in 0..10 {
            with_prefix.add_sample(Vec3::y(), Vec3::zeros(), i as f64 * 0.01 - 0.1);
        }
        for i in 0..=10 {
            let theta = (90.0f32 * i as f32 / 10.0).to_radians();
            with_prefix.add_sample(
                Vec3::new(theta.sin(), theta.cos(), 0.0),
                Vec3::zeros(),
                i as f64 * 0.02,
            );
        }
        let plain = swing_history(90.0, 0.2, 10);
        let a = with_prefix.compute_swing_rating(&cfg);
        let b = plain.compute_swing_rating(&cfg);
        assert!((a - b).abs() < 1.0e-3);
    }

    #[test]
    fn cut_plane_normal_is_perpendicular_to_the_swing_plane() {
        let history = swing_history(45.0, 0.1, 5);
        let normal = history.compute_cut_plane_normal().unwrap();
        // The swing stays in the XY plane, so the normal is +-Z.
        assert!(normal.x.abs() < 1.0e-4);
        assert!(normal.y.abs() < 1.0e-4);
        assert!((normal.z.abs() - 1.0).abs() < 1.0e-4);
    }

    #[test]
    fn stationary_blade_has_no_cut_plane() {
        let mut history = MotionHistory::new(HISTORY_RETENTION_SECONDS);
        history.add_sample(Vec3::y(), Vec3::zeros(), 0.0);
        history.add_sample(Vec3::y(), Vec3::zeros(), 0.016);
        assert!(history.compute_cut_plane_normal().is_none());
    }
}
