//! Engine facade: one instance owns both saber controllers, the clash
//! detector, and the output event queue.
//!
//! The tick order is fixed (left saber, right saber, clash) so consumers
//! observe a deterministic event order. Everything runs synchronously within
//! the calling tick; there is no background work.

use crate::clash::ClashDetector;
use crate::controller::SaberController;
use crate::events::{EngineEvent, EventQueue};
use crate::settings::CutConfig;
use crate::target::TargetIndex;
use crate::types::{SaberPose, SaberType};

pub struct SaberEngine {
    cfg: CutConfig,
    left: SaberController,
    right: SaberController,
    clash: ClashDetector,
    events: EventQueue,
}

impl SaberEngine {
    pub fn new(cfg: CutConfig) -> Self {
        Self {
            cfg,
            left: SaberController::new(SaberType::Left, cfg),
            right: SaberController::new(SaberType::Right, cfg),
            clash: ClashDetector::new(),
            events: EventQueue::new(),
        }
    }

    #[inline]
    pub fn config(&self) -> &CutConfig {
        &self.cfg
    }

    #[inline]
    pub fn left(&self) -> &SaberController {
        &self.left
    }

    #[inline]
    pub fn right(&self) -> &SaberController {
        &self.right
    }

    #[inline]
    pub fn is_clashing(&self) -> bool {
        self.clash.is_clashing()
    }

    /// Advance the engine by one simulation tick.
    ///
    /// `time` is the monotonic simulation clock in seconds; `targets` is the
    /// environment's broad phase over the currently cuttable volumes.
    pub fn tick(
        &mut self,
        time: f64,
        left_pose: SaberPose,
        right_pose: SaberPose,
        targets: &mut dyn TargetIndex,
    ) {
        self.left.tick(time, left_pose, targets, &mut self.events);
        self.right.tick(time, right_pose, targets, &mut self.events);

        let left_segment = left_pose
            .tracked
            .then_some((left_pose.top, left_pose.bottom));
        let right_segment = right_pose
            .tracked
            .then_some((right_pose.top, right_pose.bottom));
        self.clash
            .tick(left_segment, right_segment, &self.cfg, &mut self.events);
    }

    /// Drain this tick's events in emission order.
    pub fn drain_events(&mut self) -> impl Iterator<Item = EngineEvent> + '_ {
        self.events.drain()
    }
}
