//! External services module
//! 
//! This module contains the side effects the timer triggers outside the
//! process, currently the audible alert.

pub mod alert;

// Re-export main functions
pub use alert::*;
