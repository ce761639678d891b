//! Timer phase, countdown state and the snapshots handed to observers

use std::{fmt, time::Instant};
use serde::{Deserialize, Serialize};

use super::Settings;

/// The two phases of the cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Work,
    Break,
}

impl Phase {
    /// The phase that follows this one
    pub fn next(self) -> Self {
        match self {
            Phase::Work => Phase::Break,
            Phase::Break => Phase::Work,
        }
    }

    /// Full length of this phase under the given settings
    pub fn duration_ms(self, settings: &Settings) -> u64 {
        match self {
            Phase::Work => settings.work_duration_ms(),
            Phase::Break => settings.break_duration_ms(),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::Work => "Working",
            Phase::Break => "On break",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Work => f.write_str("work"),
            Phase::Break => f.write_str("break"),
        }
    }
}

/// Countdown state owned by the timer controller
#[derive(Debug, Clone)]
pub struct TimerState {
    pub phase: Phase,
    pub remaining_ms: u64,
    pub running: bool,
    /// Reference instant for the next elapsed-time computation
    pub last_tick_at: Instant,
}

impl TimerState {
    /// Paused at the start of a work phase
    pub fn new(settings: &Settings, now: Instant) -> Self {
        Self {
            phase: Phase::Work,
            remaining_ms: settings.work_duration_ms(),
            running: false,
            last_tick_at: now,
        }
    }

    /// Enter `phase` with its full duration
    pub fn enter(&mut self, phase: Phase, settings: &Settings) {
        self.phase = phase;
        self.remaining_ms = phase.duration_ms(settings);
    }

    /// Cut the remaining time down to the current phase length
    pub fn clamp_to(&mut self, settings: &Settings) {
        self.remaining_ms = self.remaining_ms.min(self.phase.duration_ms(settings));
    }
}

/// Full, self-contained view of the timer for observers and queries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub phase: Phase,
    pub phase_label: String,
    pub remaining_ms: u64,
    pub running: bool,
    pub settings: Settings,
}

impl Snapshot {
    pub fn new(timer: &TimerState, settings: &Settings) -> Self {
        Self {
            phase: timer.phase,
            phase_label: timer.phase.label().to_string(),
            remaining_ms: timer.remaining_ms,
            running: timer.running,
            settings: *settings,
        }
    }

    /// Fraction of the current phase already elapsed, in `[0, 1]`
    pub fn progress(&self) -> f64 {
        let total = self.phase.duration_ms(&self.settings);
        if total == 0 {
            return 0.0;
        }
        (1.0 - self.remaining_ms as f64 / total as f64).clamp(0.0, 1.0)
    }
}
