//! Process-level utilities
//! 
//! Currently only graceful shutdown on SIGINT/SIGTERM.

pub mod signals;

pub use signals::shutdown_signal;
