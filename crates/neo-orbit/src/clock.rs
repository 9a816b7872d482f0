//! Playback clock: turns wall-clock frame time into simulated time under a
//! signed speed multiplier and an independent pause flag.

use tracing::warn;

/// Longest wall-clock step fed to the clock. A stalled frame (window drag,
/// debugger break) is clamped rather than replayed as one huge jump.
pub const MAX_FRAME_TIME: f64 = 0.25;

/// Simulated seconds produced by `dt_wall` wall-clock seconds.
///
/// Paused yields exactly zero whatever the speed. Negative speed runs time
/// backwards; it is never clamped to zero here.
pub fn advance(dt_wall: f64, speed: f64, paused: bool) -> f64 {
    if paused || !dt_wall.is_finite() || !speed.is_finite() {
        return 0.0;
    }
    dt_wall * speed
}

/// Clamp a measured frame time into `[0, MAX_FRAME_TIME]`.
pub fn clamp_frame_time(dt_wall: f64) -> f64 {
    if !dt_wall.is_finite() || dt_wall < 0.0 {
        return 0.0;
    }
    if dt_wall > MAX_FRAME_TIME {
        warn!(
            "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
            dt_wall * 1000.0,
            MAX_FRAME_TIME * 1000.0
        );
        return MAX_FRAME_TIME;
    }
    dt_wall
}

/// Accumulated simulated time for the life of a view.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlaybackClock {
    sim_time: f64,
    ticks: u64,
}

impl PlaybackClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance and return the simulated delta.
    pub fn advance(&mut self, dt_wall: f64, speed: f64, paused: bool) -> f64 {
        let dt_sim = advance(dt_wall, speed, paused);
        self.sim_time += dt_sim;
        self.ticks += 1;
        dt_sim
    }

    /// Simulated seconds since creation or the last reset. May be negative.
    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Only called on an explicit user reset.
    pub fn reset(&mut self) {
        self.sim_time = 0.0;
    }
}

/// Allowed speed range. Lower bound may be negative.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpeedRange {
    pub min: f64,
    pub max: f64,
}

impl Default for SpeedRange {
    fn default() -> Self {
        Self {
            min: -1000.0,
            max: 1000.0,
        }
    }
}

impl SpeedRange {
    /// Build a range, swapping the bounds if they arrive reversed.
    pub fn new(a: f64, b: f64) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Clamp a requested speed. Non-finite requests fall back to `fallback`.
    pub fn clamp(&self, speed: f64, fallback: f64) -> f64 {
        if speed.is_nan() {
            return fallback.clamp(self.min, self.max);
        }
        speed.clamp(self.min, self.max)
    }
}
