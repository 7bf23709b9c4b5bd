//! Engine output events.
//!
//! Notifications are an explicit ordered queue the consumer drains after each
//! tick, not an ambient broadcast: ordering is deterministic (left saber,
//! right saber, clash) and there are no subscriber lifetimes to manage.

use crate::counter::CounterHandle;
use crate::target::CutAssessment;
use crate::types::{SaberType, TargetId, Vec3};

/// Fired synchronously the tick a saber's swept volume first overlaps a target.
#[derive(Clone, Copy, Debug)]
pub struct CutCandidate {
    pub target: TargetId,
    pub saber: SaberType,
    /// Closest point of the blade to the target at contact.
    pub contact_point: Vec3,
    /// The swept box's plane normal at contact.
    pub cut_normal: Vec3,
    /// Pre-cut swing rating in `[0, 1]`.
    pub before_rating: f32,
    /// Smoothed instantaneous blade speed at contact (m/s).
    pub blade_speed: f32,
}

/// Final merged record for one cut, fired once its after-cut counter finishes.
#[derive(Clone, Copy, Debug)]
pub struct CutOutcome {
    pub target: TargetId,
    pub saber: SaberType,
    /// The target's verdict, captured at contact time.
    pub assessment: CutAssessment,
    /// Pre-cut swing rating in `[0, 1]`.
    pub before_rating: f32,
    /// Follow-through rating in `[0, 1]`.
    pub after_rating: f32,
    /// `min(before, 1) + min(after, 1)`, in `[0, 2]`.
    pub combined_rating: f32,
    pub contact_point: Vec3,
    pub cut_normal: Vec3,
    /// Pool slot of the counter that tracked this cut. Provenance only: the
    /// counter is recycled the same tick, so by the time the queue is drained
    /// the slot may already be tracking another cut. The frozen rating is
    /// copied into `after_rating`; never read it back through this handle.
    pub counter: CounterHandle,
}

#[derive(Clone, Copy, Debug)]
pub enum EngineEvent {
    CutCandidate(CutCandidate),
    CutOutcome(CutOutcome),
    /// The clash predicate flipped.
    ClashStateChanged { clashing: bool, contact_point: Vec3 },
}

/// Ordered event buffer filled during a tick and drained by the consumer.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<EngineEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, event: EngineEvent) {
        self.events.push(event);
    }

    /// Drain all pending events in emission order.
    pub fn drain(&mut self) -> impl Iterator<Item = EngineEvent> + '_ {
        self.events.drain(..)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.events.len()
    }
}
