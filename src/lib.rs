/*!
Saber swing and cut-quality detection engine.

Single-threaded and tick-driven: every tick the engine ingests the pose of two
hand-held blades, sweeps each blade's one-tick volume against candidate target
volumes supplied by the environment, scores accepted cuts before and after the
moment of contact, and watches for blade-on-blade clashes. Results surface as
an ordered event queue drained by the consumer.

The code is split for clarity:

- types:      shared data types (math aliases, Transform, poses, samples)
- settings:   tunable constants and the runtime `CutConfig`
- geometry:   swept-box construction and segment-segment distance
- history:    per-blade time-windowed motion buffer and swing rating
- rating:     pure angle-to-quality mappings
- counter:    pooled after-cut follow-through trackers
- target:     the boundary to the environment's cuttable targets
- events:     output events and the drain queue
- controller: per-blade tick pipeline
- clash:      blade-on-blade proximity predicate
- engine:     facade owning both controllers and the detector
*/

pub mod clash;
pub mod controller;
pub mod counter;
pub mod events;
pub mod geometry;
pub mod history;
pub mod rating;
pub mod settings;
pub mod target;
pub mod types;

mod engine;

// Re-export commonly used types and functions.
pub use clash::ClashDetector;
pub use controller::SaberController;
pub use counter::{AfterCutCounter, CounterHandle, CounterPool, CounterState};
pub use engine::SaberEngine;
pub use events::{CutCandidate, CutOutcome, EngineEvent, EventQueue};
pub use geometry::{SweptBox, angle_between_deg, segment_segment_distance, three_points_to_box};
pub use history::MotionHistory;
pub use rating::{after_cut_rating, before_cut_rating, normal_rating};
pub use settings::CutConfig;
pub use target::{CutAssessment, CutTarget, TargetIndex, TargetShape};
pub use types::{SaberPose, SaberType, TargetId, TimeAndPos, Transform};
