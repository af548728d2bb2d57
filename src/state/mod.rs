//! State management module
//! 
//! This module contains the timer state, the controller that owns it and the
//! shared application state published to the control API.

pub mod timer_state;
pub mod controller;
pub mod app_state;

// Re-export main types
pub use timer_state::{format_clock, Phase, TimerState, BREAK_SECONDS, FOCUS_SECONDS};
pub use controller::{Confirmation, Control, Presenter, Scheduler, TimerController, TICK_INTERVAL};
pub use app_state::AppState;
