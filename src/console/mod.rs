//! Console front end module
//! 
//! This module contains the terminal presentation layer driving the timer.

pub mod terminal;

// Re-export main types
pub use terminal::Console;
