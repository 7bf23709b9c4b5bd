//! Blade-on-blade clash detection.
//!
//! A pure per-tick predicate over the two sabers' current blade segments: no
//! history, no pooling. The detector raises when the closest distance between
//! the segments drops below the configured threshold and both sabers are
//! active, and reports edge-triggered state changes.

use crate::events::{EngineEvent, EventQueue};
use crate::geometry::segment_segment_distance;
use crate::settings::CutConfig;
use crate::types::Vec3;

#[derive(Debug, Default)]
pub struct ClashDetector {
    clashing: bool,
    contact_point: Vec3,
}

impl ClashDetector {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_clashing(&self) -> bool {
        self.clashing
    }

    /// Midpoint of the closest-point pair from the last clashing tick.
    #[inline]
    pub fn contact_point(&self) -> Vec3 {
        self.contact_point
    }

    /// Sample both blade segments for this tick. `None` marks an inactive
    /// saber; a clash requires both to be active.
    pub fn tick(
        &mut self,
        left: Option<(Vec3, Vec3)>,
        right: Option<(Vec3, Vec3)>,
        cfg: &CutConfig,
        events: &mut EventQueue,
    ) {
        let now_clashing = match (left, right) {
            (Some((l_top, l_bottom)), Some((r_top, r_bottom))) => {
                let (distance, midpoint) =
                    segment_segment_distance(l_top, l_bottom, r_top, r_bottom);
                if distance < cfg.clash_distance {
                    self.contact_point = midpoint;
                    true
                } else {
                    false
                }
            }
            _ => false,
        };

        if now_clashing != self.clashing {
            self.clashing = now_clashing;
            events.push(EngineEvent::ClashStateChanged {
                clashing: now_clashing,
                contact_point: self.contact_point,
            });
        }
    }
}
