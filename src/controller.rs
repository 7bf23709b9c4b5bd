//! Per-weapon controller: the per-tick cut pipeline.
//!
//! Each tick, in order:
//! - feed all in-flight after-cut counters the newest pose (or the last-known
//!   pose while tracking is lost) and recycle any that finished;
//! - bail out if tracking is invalid this tick;
//! - append the pose to the motion history;
//! - update the smoothed blade speed (previous tick must also have been valid);
//! - build the swept box and test it against broad-phase candidate targets;
//! - for each overlap, emit a cut candidate and let the target judge it; an
//!   accepted cut borrows an after-cut counter that keeps scoring the
//!   follow-through over the next window.

use crate::counter::{CounterHandle, CounterPool};
use crate::events::{CutCandidate, CutOutcome, EngineEvent, EventQueue};
use crate::geometry::{SweptBox, closest_point_on_segment, three_points_to_box};
use crate::history::MotionHistory;
use crate::settings::CutConfig;
use crate::target::{CutAssessment, TargetIndex};
use crate::types::{SaberPose, SaberType, TargetId, Vec3};

/// Bookkeeping for a cut whose after-cut counter is still tracking.
#[derive(Debug)]
struct PendingCut {
    counter: CounterHandle,
    target: TargetId,
    assessment: CutAssessment,
    before_rating: f32,
    contact_point: Vec3,
    cut_normal: Vec3,
}

/// Owns one saber's motion history, counter pool, and tick pipeline.
pub struct SaberController {
    saber: SaberType,
    cfg: CutConfig,
    history: MotionHistory,
    pool: CounterPool,
    in_flight: Vec<PendingCut>,
    /// Did the previous tick carry a valid tracked pose? The first valid tick
    /// after a loss has no usable previous sample to sweep from.
    prev_valid: bool,
    last_top: Vec3,
    last_bottom: Vec3,
    blade_speed: f32,
    /// Scratch for broad-phase candidate indices, reused across ticks.
    scratch: Vec<usize>,
    /// Targets the swept volume covered on the most recent sweep. A candidate
    /// fires only when a target enters this set, so one contact episode
    /// yields one `CutCandidate` no matter how many ticks the overlap lasts.
    overlapped: Vec<TargetId>,
    overlap_scratch: Vec<TargetId>,
}

impl SaberController {
    pub fn new(saber: SaberType, cfg: CutConfig) -> Self {
        Self {
            saber,
            cfg,
            history: MotionHistory::new(cfg.history_retention_seconds),
            pool: CounterPool::with_capacity(cfg.pool_prealloc),
            in_flight: Vec::new(),
            prev_valid: false,
            last_top: Vec3::zeros(),
            last_bottom: Vec3::zeros(),
            blade_speed: 0.0,
            scratch: Vec::new(),
            overlapped: Vec::new(),
            overlap_scratch: Vec::new(),
        }
    }

    #[inline]
    pub fn saber(&self) -> SaberType {
        self.saber
    }

    /// Smoothed blade speed estimate (m/s).
    #[inline]
    pub fn blade_speed(&self) -> f32 {
        self.blade_speed
    }

    /// Last tracked blade segment, if any pose was ever valid.
    #[inline]
    pub fn blade_segment(&self) -> Option<(Vec3, Vec3)> {
        self.history.last_sample().map(|s| (s.top, s.bottom))
    }

    pub fn tick(
        &mut self,
        time: f64,
        pose: SaberPose,
        targets: &mut dyn TargetIndex,
        events: &mut EventQueue,
    ) {
        // In-flight counters are never cancelled on tracking loss; they keep
        // sampling the last-known pose until their window elapses.
        let (feed_top, feed_bottom) = if pose.tracked {
            (pose.top, pose.bottom)
        } else {
            (self.last_top, self.last_bottom)
        };
        self.step_counters(feed_top, feed_bottom, time, events);

        if !pose.tracked {
            log::trace!("{:?} saber tracking invalid at t={time}, tick skipped", self.saber);
            self.prev_valid = false;
            return;
        }

        let prev = self.history.last_sample().copied();
        self.history.add_sample(pose.top, pose.bottom, time);

        if self.prev_valid
            && let Some(prev) = prev
        {
            self.update_blade_speed(pose.top, &prev.top, time - prev.time);

            let prev_mid = (prev.top + prev.bottom) * 0.5;
            match three_points_to_box(
                pose.top,
                pose.bottom,
                prev_mid,
                self.cfg.min_sweep_half_thickness,
            ) {
                Some(swept) => self.sweep_targets(time, &pose, &swept, targets, events),
                None => {
                    // Stationary or freshly-tracked blade: expected, not a fault.
                    log::debug!("{:?} saber has no swept volume at t={time}", self.saber);
                }
            }
        }

        self.last_top = pose.top;
        self.last_bottom = pose.bottom;
        self.prev_valid = true;
    }

    /// Feed tracking counters and recycle the ones that finished, emitting
    /// their merged outcomes.
    fn step_counters(&mut self, top: Vec3, bottom: Vec3, time: f64, events: &mut EventQueue) {
        for pending in &self.in_flight {
            self.pool
                .get_mut(pending.counter)
                .process_tick(top, bottom, time, &self.cfg);
        }

        let mut i = 0;
        while i < self.in_flight.len() {
            if !self.pool.get(self.in_flight[i].counter).did_finish() {
                i += 1;
                continue;
            }
            let pending = self.in_flight.swap_remove(i);
            let after_rating = self.pool.get(pending.counter).rating();
            events.push(EngineEvent::CutOutcome(CutOutcome {
                target: pending.target,
                saber: self.saber,
                assessment: pending.assessment,
                before_rating: pending.before_rating,
                after_rating,
                combined_rating: pending.before_rating.min(1.0) + after_rating.min(1.0),
                contact_point: pending.contact_point,
                cut_normal: pending.cut_normal,
                counter: pending.counter,
            }));
            self.pool.release(pending.counter);
        }
    }

    /// Asymmetric exponential smoothing: fast rise, slow decay. Displacement
    /// spikes above the sanity ceiling are tracking glitches and count as
    /// zero speed rather than a fault.
    fn update_blade_speed(&mut self, top: Vec3, prev_top: &Vec3, dt: f64) {
        let dt = dt as f32;
        if dt <= 0.0 {
            return;
        }
        let mut raw = (top - prev_top).norm() / dt;
        if raw > self.cfg.blade_speed_ceiling_mps {
            log::debug!("{:?} saber speed spike {raw:.1} m/s, clamped to zero", self.saber);
            raw = 0.0;
        }
        let rate = if raw > self.blade_speed {
            self.cfg.speed_rise_rate
        } else {
            self.cfg.speed_fall_rate
        };
        let alpha = 1.0 - (-rate * dt).exp();
        self.blade_speed += (raw - self.blade_speed) * alpha;
    }

    fn sweep_targets(
        &mut self,
        time: f64,
        pose: &SaberPose,
        swept: &SweptBox,
        targets: &mut dyn TargetIndex,
        events: &mut EventQueue,
    ) {
        let mut candidates = std::mem::take(&mut self.scratch);
        candidates.clear();
        targets.candidates(&swept.aabb(), &mut candidates);

        let mut overlapped_now = std::mem::take(&mut self.overlap_scratch);
        overlapped_now.clear();

        for &index in &candidates {
            let Some(target) = targets.target_mut(index) else {
                continue;
            };
            let shape = target.shape();
            if !shape.intersects(swept) {
                continue;
            }

            let id = target.id();
            overlapped_now.push(id);
            // Only a fresh overlap counts as a cut attempt; a blade dwelling
            // inside the same volume keeps the episode open without
            // re-announcing it.
            if self.overlapped.contains(&id) {
                continue;
            }

            let candidate = CutCandidate {
                target: id,
                saber: self.saber,
                contact_point: closest_point_on_segment(pose.top, pose.bottom, shape.center()),
                cut_normal: swept.cut_normal(),
                before_rating: self.history.compute_swing_rating(&self.cfg),
                blade_speed: self.blade_speed,
            };
            events.push(EngineEvent::CutCandidate(candidate));

            // The target owns pass/fail semantics; declining produces no outcome.
            let Some(assessment) = target.evaluate_cut(&candidate) else {
                continue;
            };

            let handle = self.pool.acquire();
            self.pool
                .get_mut(handle)
                .init(candidate.cut_normal, pose.top, pose.bottom, time);
            self.in_flight.push(PendingCut {
                counter: handle,
                target: candidate.target,
                assessment,
                before_rating: candidate.before_rating,
                contact_point: candidate.contact_point,
                cut_normal: candidate.cut_normal,
            });
        }

        std::mem::swap(&mut self.overlapped, &mut overlapped_now);
        self.overlap_scratch = overlapped_now;
        self.scratch = candidates;
    }
}
