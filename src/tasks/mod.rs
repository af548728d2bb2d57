//! Background tasks module
//! 
//! This module contains the timer event loop and the tokio scheduler that
//! feeds it ticks.

pub mod events;
pub mod scheduler;
pub mod timer_loop;

// Re-export main types and functions
pub use events::{Command, Event, TickHandle};
pub use scheduler::TokioScheduler;
pub use timer_loop::{apply_command, apply_line, timer_event_loop, ConsoleController};
