//! Focus Timer - A focus/break countdown timer
//!
//! This library provides the timer state machine alternating 25-minute focus
//! and 5-minute break intervals, the tokio event loop driving it, a console
//! front end and an optional local HTTP control API.

pub mod config;
pub mod state;
pub mod api;
pub mod console;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::{AppState, Phase, TimerController, TimerState};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
