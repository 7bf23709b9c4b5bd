/*!
Cut-engine tunables and tolerances.

These constants centralize the parameters used by the swing rating, the
after-cut tracker, the swept-volume sweep, and the clash detector. Keeping
them together makes tuning easier and helps ensure deterministic behavior
across platforms.

Notes
- Distances are in meters, angles in degrees, time in seconds.
- Favor practical world-space tolerances over machine epsilon for robust behavior.
- These are sensible defaults; override per-session via [`CutConfig`] from
  your game data.
*/

/// Normal deviation (degrees) up to which a swing plane counts as fully on-plane.
pub const TOLERANCE_ANGLE_DEG: f32 = 75.0;

/// Normal deviation (degrees) at and beyond which a swing plane scores zero.
pub const MAX_NORMAL_ANGLE_DEG: f32 = 90.0;

/// Swing angle (degrees) that earns a full before-cut rating.
pub const BEFORE_CUT_FULL_SWING_DEG: f32 = 90.0;

/// Swing angle (degrees) that earns a full after-cut rating.
/// Follow-through requires less travel than wind-up for full credit.
pub const AFTER_CUT_FULL_SWING_DEG: f32 = 60.0;

/// How long the after-cut tracker keeps sampling follow-through (seconds).
pub const AFTER_CUT_WINDOW_SECONDS: f64 = 0.4;

/// Maximum lookback used when rating the pre-cut swing (seconds).
pub const SWING_LOOKBACK_SECONDS: f64 = 0.4;

/// Motion-history retention (seconds). Kept slightly above the swing lookback
/// so the oldest step in the rating window always has a predecessor sample.
pub const HISTORY_RETENTION_SECONDS: f64 = 0.5;

/// Blade-to-blade distance (meters) below which the sabers are clashing.
pub const CLASH_DISTANCE: f32 = 0.04;

/// Sanity ceiling for the raw per-tick blade speed (meters per second).
/// Displacement spikes above this are tracking glitches and score as zero speed.
pub const BLADE_SPEED_CEILING_MPS: f32 = 100.0;

/// Exponential smoothing rate (1/seconds) when the blade speed is rising.
pub const SPEED_RISE_RATE: f32 = 20.0;

/// Exponential smoothing rate (1/seconds) when the blade speed is falling.
/// Much slower than the rise rate so a brief hit doesn't erase the speed reading.
pub const SPEED_FALL_RATE: f32 = 2.0;

/// After-cut counters pre-allocated per controller at startup.
pub const POOL_PREALLOC: usize = 20;

/// Minimum half-thickness (meters) of the swept box along its plane normal.
/// A one-tick sweep is nearly planar; the box still needs a volume to test.
pub const MIN_SWEEP_HALF_THICKNESS: f32 = 0.01;

/// Practical small distance for comparisons (meters).
pub const DIST_EPS: f32 = 1.0e-6;

/// Guard on the denominator of the segment-segment line system.
/// Below this the segments are treated as parallel.
pub const PARALLEL_EPS: f32 = 1.0e-8;

/// Runtime configuration for one engine instance.
///
/// Defaults mirror the module constants; game data may override any field
/// before constructing the engine.
#[derive(Clone, Copy, Debug)]
pub struct CutConfig {
    pub tolerance_angle_deg: f32,
    pub max_normal_angle_deg: f32,
    pub before_cut_full_swing_deg: f32,
    pub after_cut_full_swing_deg: f32,
    pub after_cut_window_seconds: f64,
    pub swing_lookback_seconds: f64,
    pub history_retention_seconds: f64,
    pub clash_distance: f32,
    pub blade_speed_ceiling_mps: f32,
    pub speed_rise_rate: f32,
    pub speed_fall_rate: f32,
    pub pool_prealloc: usize,
    pub min_sweep_half_thickness: f32,
}

impl Default for CutConfig {
    fn default() -> Self {
        Self {
            tolerance_angle_deg: TOLERANCE_ANGLE_DEG,
            max_normal_angle_deg: MAX_NORMAL_ANGLE_DEG,
            before_cut_full_swing_deg: BEFORE_CUT_FULL_SWING_DEG,
            after_cut_full_swing_deg: AFTER_CUT_FULL_SWING_DEG,
            after_cut_window_seconds: AFTER_CUT_WINDOW_SECONDS,
            swing_lookback_seconds: SWING_LOOKBACK_SECONDS,
            history_retention_seconds: HISTORY_RETENTION_SECONDS,
            clash_distance: CLASH_DISTANCE,
            blade_speed_ceiling_mps: BLADE_SPEED_CEILING_MPS,
            speed_rise_rate: SPEED_RISE_RATE,
            speed_fall_rate: SPEED_FALL_RATE,
            pool_prealloc: POOL_PREALLOC,
            min_sweep_half_thickness: MIN_SWEEP_HALF_THICKNESS,
        }
    }
}
