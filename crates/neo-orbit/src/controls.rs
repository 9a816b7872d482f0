//! User-facing playback controls as an explicit context updated by discrete
//! commands. The render loop reads one [`ControlSnapshot`] per frame.

use tracing::debug;

use crate::clock::SpeedRange;
use crate::record::KindFilter;

/// Default speed preset ladder.
pub const DEFAULT_SPEED_PRESETS: [f64; 10] =
    [0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 50.0, 100.0, 500.0, 1000.0];

/// Speed restored by [`ControlCommand::ResetSpeed`].
pub const RESET_SPEED: f64 = 1.0;

/// A discrete user action.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ControlCommand {
    SetSpeed(f64),
    TogglePause,
    SetPaused(bool),
    /// Set speed back to [`RESET_SPEED`].
    ResetSpeed,
    /// Step up the preset ladder, keeping the direction of playback.
    NextPreset,
    PrevPreset,
    /// Negate the speed.
    Reverse,
    SetFilter(KindFilter),
    /// Zero the simulated clock.
    ResetTime,
}

/// Immutable per-frame copy of the controls.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlSnapshot {
    pub speed: f64,
    pub paused: bool,
    pub filter: KindFilter,
    /// Incremented by every `ResetTime`; the loop resets the clock and the
    /// orbit angles when it sees a new value.
    pub time_epoch: u64,
}

/// Mutable control context.
#[derive(Clone, Debug)]
pub struct ControlState {
    speed: f64,
    paused: bool,
    filter: KindFilter,
    time_epoch: u64,
    range: SpeedRange,
    presets: Vec<f64>,
}

impl ControlState {
    /// Create controls starting at `initial_speed`, clamped to `range`.
    /// Presets are stored sorted; non-positive and non-finite values are dropped.
    pub fn new(initial_speed: f64, range: SpeedRange, presets: &[f64]) -> Self {
        let mut presets: Vec<f64> = presets
            .iter()
            .copied()
            .filter(|p| p.is_finite() && *p > 0.0)
            .collect();
        presets.sort_by(f64::total_cmp);
        presets.dedup();
        Self {
            speed: range.clamp(initial_speed, RESET_SPEED),
            paused: false,
            filter: KindFilter::All,
            time_epoch: 0,
            range,
            presets,
        }
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn filter(&self) -> KindFilter {
        self.filter
    }

    pub fn range(&self) -> SpeedRange {
        self.range
    }

    pub fn presets(&self) -> &[f64] {
        &self.presets
    }

    /// Apply one command. Returns the new filter if it changed.
    pub fn apply(&mut self, command: ControlCommand) -> Option<KindFilter> {
        debug!(?command, "control command");
        match command {
            ControlCommand::SetSpeed(speed) => {
                self.speed = self.range.clamp(speed, self.speed);
            }
            ControlCommand::TogglePause => self.paused = !self.paused,
            ControlCommand::SetPaused(paused) => self.paused = paused,
            ControlCommand::ResetSpeed => {
                self.speed = self.range.clamp(RESET_SPEED, RESET_SPEED);
            }
            ControlCommand::NextPreset => self.step_preset(true),
            ControlCommand::PrevPreset => self.step_preset(false),
            ControlCommand::Reverse => {
                self.speed = self.range.clamp(-self.speed, self.speed);
            }
            ControlCommand::SetFilter(filter) => {
                if filter != self.filter {
                    self.filter = filter;
                    return Some(filter);
                }
            }
            ControlCommand::ResetTime => {
                self.time_epoch = self.time_epoch.wrapping_add(1);
            }
        }
        None
    }

    fn step_preset(&mut self, up: bool) {
        let magnitude = self.speed.abs();
        let sign = if self.speed < 0.0 { -1.0 } else { 1.0 };
        let next = if up {
            self.presets.iter().copied().find(|p| *p > magnitude)
        } else {
            self.presets.iter().rev().copied().find(|p| *p < magnitude)
        };
        if let Some(preset) = next {
            self.speed = self.range.clamp(sign * preset, self.speed);
        }
    }

    pub fn snapshot(&self) -> ControlSnapshot {
        ControlSnapshot {
            speed: self.speed,
            paused: self.paused,
            filter: self.filter,
            time_epoch: self.time_epoch,
        }
    }
}

impl Default for ControlState {
    fn default() -> Self {
        Self::new(10.0, SpeedRange::default(), &DEFAULT_SPEED_PRESETS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pause_keeps_speed() {
        let mut controls = ControlState::default();
        controls.apply(ControlCommand::SetSpeed(42.0));
        controls.apply(ControlCommand::TogglePause);
        assert!(controls.paused());
        controls.apply(ControlCommand::TogglePause);
        assert!(!controls.paused());
        assert_eq!(controls.speed(), 42.0);
    }

    #[test]
    fn test_set_speed_clamps_but_keeps_sign() {
        let mut controls = ControlState::default();
        controls.apply(ControlCommand::SetSpeed(-20.0));
        assert_eq!(controls.speed(), -20.0);
        controls.apply(ControlCommand::SetSpeed(1e9));
        assert_eq!(controls.speed(), 1000.0);
        controls.apply(ControlCommand::SetSpeed(f64::NAN));
        assert_eq!(controls.speed(), 1000.0);
    }

    #[test]
    fn test_reset_and_reverse() {
        let mut controls = ControlState::default();
        controls.apply(ControlCommand::Reverse);
        assert_eq!(controls.speed(), -10.0);
        controls.apply(ControlCommand::ResetSpeed);
        assert_eq!(controls.speed(), RESET_SPEED);
    }

    #[test]
    fn test_preset_stepping() {
        let mut controls = ControlState::default();
        controls.apply(ControlCommand::NextPreset);
        assert_eq!(controls.speed(), 50.0);
        controls.apply(ControlCommand::PrevPreset);
        controls.apply(ControlCommand::PrevPreset);
        assert_eq!(controls.speed(), 5.0);
        controls.apply(ControlCommand::SetSpeed(1000.0));
        controls.apply(ControlCommand::NextPreset);
        assert_eq!(controls.speed(), 1000.0, "top preset is sticky");
    }

    #[test]
    fn test_preset_stepping_in_reverse() {
        let mut controls = ControlState::default();
        controls.apply(ControlCommand::SetSpeed(-2.0));
        controls.apply(ControlCommand::NextPreset);
        assert_eq!(controls.speed(), -5.0);
    }

    #[test]
    fn test_filter_change_reported_once() {
        let mut controls = ControlState::default();
        assert_eq!(
            controls.apply(ControlCommand::SetFilter(KindFilter::Comet)),
            Some(KindFilter::Comet)
        );
        assert_eq!(controls.apply(ControlCommand::SetFilter(KindFilter::Comet)), None);
    }

    #[test]
    fn test_reset_time_bumps_epoch() {
        let mut controls = ControlState::default();
        let before = controls.snapshot().time_epoch;
        controls.apply(ControlCommand::ResetTime);
        assert_eq!(controls.snapshot().time_epoch, before + 1);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut controls = ControlState::default();
        let snap = controls.snapshot();
        controls.apply(ControlCommand::SetSpeed(3.0));
        assert_eq!(snap.speed, 10.0);
    }
}
