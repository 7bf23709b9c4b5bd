//! After-cut rating counter and its object pool.
//!
//! Once a cut lands, follow-through quality can only be judged over the next
//! fraction of a second, so each cut borrows an [`AfterCutCounter`] from the
//! controller's [`CounterPool`], feeds it the blade pose every tick, and
//! returns it once the tracking window elapses. Cuts arrive in bursts; the
//! pool exists so the hot per-tick path never allocates in the common case.

use crate::geometry::{angle_between_deg, plane_deviation_deg, plane_normal};
use crate::rating::after_cut_rating;
use crate::settings::CutConfig;
use crate::types::Vec3;

/// Lifecycle of a counter. A counter is `Idle` exactly while it sits in the
/// pool's free list, `Tracking` while in a controller's in-flight list, and
/// `Finished` for the single tick between its window elapsing and the
/// controller recycling it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CounterState {
    Idle,
    Tracking,
    Finished,
}

/// Reusable per-cut follow-through tracker.
#[derive(Debug)]
pub struct AfterCutCounter {
    state: CounterState,
    cut_normal: Vec3,
    cut_top: Vec3,
    cut_bottom: Vec3,
    cut_time: f64,
    rating: f32,
}

impl AfterCutCounter {
    fn new() -> Self {
        Self {
            state: CounterState::Idle,
            cut_normal: Vec3::zeros(),
            cut_top: Vec3::zeros(),
            cut_bottom: Vec3::zeros(),
            cut_time: 0.0,
            rating: 0.0,
        }
    }

    /// Idle -> Tracking. Records the reference pose at the moment of the cut
    /// and clears any rating left over from a previous use.
    pub fn init(&mut self, cut_normal: Vec3, top: Vec3, bottom: Vec3, cut_time: f64) {
        debug_assert_eq!(self.state, CounterState::Idle);
        self.state = CounterState::Tracking;
        self.cut_normal = cut_normal;
        self.cut_top = top;
        self.cut_bottom = bottom;
        self.cut_time = cut_time;
        self.rating = 0.0;
    }

    /// Feed the current blade pose while tracking.
    ///
    /// Keeps the best follow-through rating seen so far: blade travel since
    /// the cut, weighted by how well the motion stayed in the cut plane. Once
    /// the window elapses the counter freezes its rating and reports
    /// `Finished`.
    pub fn process_tick(&mut self, top: Vec3, bottom: Vec3, time: f64, cfg: &CutConfig) {
        if self.state != CounterState::Tracking {
            return;
        }
        if time - self.cut_time >= cfg.after_cut_window_seconds {
            self.state = CounterState::Finished;
            return;
        }

        let angle_diff = angle_between_deg(top - bottom, self.cut_top - self.cut_bottom);
        let normal_diff = match plane_normal(top, bottom, self.cut_top) {
            Some(step_normal) => plane_deviation_deg(step_normal, self.cut_normal),
            // No measurable travel yet; the plane is undefined and the angle
            // term is zero anyway.
            None => 0.0,
        };
        let candidate = after_cut_rating(angle_diff, normal_diff, cfg).min(1.0);
        self.rating = self.rating.max(candidate);
    }

    #[inline]
    pub fn did_finish(&self) -> bool {
        self.state == CounterState::Finished
    }

    #[inline]
    pub fn state(&self) -> CounterState {
        self.state
    }

    /// Best follow-through rating observed, in `[0, 1]`.
    #[inline]
    pub fn rating(&self) -> f32 {
        self.rating
    }

    /// Back to Idle for reuse. Called by the pool on release.
    fn reset(&mut self) {
        self.state = CounterState::Idle;
        self.rating = 0.0;
    }
}

/// Handle into a [`CounterPool`]. Stable for the lifetime of the pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CounterHandle(u32);

/// Typed free-list of [`AfterCutCounter`]s.
///
/// Pre-sized at startup; grows transparently if a burst of simultaneous cuts
/// outruns the pre-allocation (the only dynamic allocation permitted on the
/// hot path) and never shrinks.
#[derive(Debug)]
pub struct CounterPool {
    slots: Vec<AfterCutCounter>,
    free: Vec<CounterHandle>,
}

impl CounterPool {
    pub fn with_capacity(prealloc: usize) -> Self {
        let mut pool = Self {
            slots: Vec::with_capacity(prealloc),
            free: Vec::with_capacity(prealloc),
        };
        for _ in 0..prealloc {
            pool.slots.push(AfterCutCounter::new());
            pool.free.push(CounterHandle((pool.slots.len() - 1) as u32));
        }
        pool
    }

    /// Take an idle counter out of the pool, growing it if exhausted.
    pub fn acquire(&mut self) -> CounterHandle {
        if let Some(handle) = self.free.pop() {
            return handle;
        }
        self.slots.push(AfterCutCounter::new());
        let handle = CounterHandle((self.slots.len() - 1) as u32);
        log::debug!("after-cut counter pool grew to {}", self.slots.len());
        handle
    }

    /// Return a counter to the free list, resetting it for reuse.
    pub fn release(&mut self, handle: CounterHandle) {
        self.slots[handle.0 as usize].reset();
        self.free.push(handle);
    }

    #[inline]
    pub fn get(&self, handle: CounterHandle) -> &AfterCutCounter {
        &self.slots[handle.0 as usize]
    }

    #[inline]
    pub fn get_mut(&mut self, handle: CounterHandle) -> &mut AfterCutCounter {
        &mut self.slots[handle.0 as usize]
    }

    /// Total counters ever constructed. Diagnostic only.
    #[inline]
    pub fn total(&self) -> usize {
        self.slots.len()
    }

    /// Counters currently idle in the free list. Diagnostic only.
    #[inline]
    pub fn idle(&self) -> usize {
        self.free.len()
    }
}
