//! Timer state structure and phase definitions

use std::fmt;

use serde::{Deserialize, Serialize};

/// Length of the focus interval in seconds (25:00)
pub const FOCUS_SECONDS: u64 = 1500;
/// Length of the break interval in seconds (05:00)
pub const BREAK_SECONDS: u64 = 300;

/// Which interval is currently counting down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Focus,
    Break,
}

impl Phase {
    /// Full duration of this phase, used whenever the phase is (re)entered
    pub fn duration_seconds(self) -> u64 {
        match self {
            Phase::Focus => FOCUS_SECONDS,
            Phase::Break => BREAK_SECONDS,
        }
    }

    /// The phase that follows this one
    pub fn next(self) -> Self {
        match self {
            Phase::Focus => Phase::Break,
            Phase::Break => Phase::Focus,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Focus => "Focus",
            Phase::Break => "Break",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Countdown state owned by the timer controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub phase: Phase,
    pub remaining_seconds: u64,
    pub is_running: bool,
    /// Rendered clock text, kept in sync for API consumers
    pub display: String,
}

impl TimerState {
    /// Create the initial state: stopped, focus phase, 25:00
    pub fn new() -> Self {
        Self::stopped(Phase::Focus)
    }

    /// Create a stopped state at the full duration of `phase`
    pub fn stopped(phase: Phase) -> Self {
        let remaining_seconds = phase.duration_seconds();
        Self {
            phase,
            remaining_seconds,
            is_running: false,
            display: format_clock(remaining_seconds),
        }
    }

    /// Set remaining seconds and refresh the display text
    pub fn set_remaining(&mut self, remaining_seconds: u64) {
        self.remaining_seconds = remaining_seconds;
        self.display = format_clock(remaining_seconds);
    }

    /// Enter `phase` at its full duration without touching the running flag
    pub fn enter_phase(&mut self, phase: Phase) {
        self.phase = phase;
        self.set_remaining(phase.duration_seconds());
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Format seconds as a zero-padded `MM:SS` clock
pub fn format_clock(seconds: u64) -> String {
    let (minutes, seconds) = (seconds / 60, seconds % 60);
    format!("{:02}:{:02}", minutes, seconds)
}
