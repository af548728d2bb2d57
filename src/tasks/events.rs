//! Events consumed by the timer event loop

use std::str::FromStr;
use tokio::sync::oneshot;

use crate::state::TimerState;

/// Identifies one tick armed by the tokio scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickHandle(pub(crate) u64);

/// User-initiated timer commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Stop,
    Toggle,
    Reset,
    Quit,
}

impl Command {
    pub fn as_str(self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Stop => "stop",
            Command::Toggle => "toggle",
            Command::Reset => "reset",
            Command::Quit => "quit",
        }
    }
}

impl FromStr for Command {
    type Err = String;

    /// Parse a console line. An empty line toggles, like pressing Enter on the control.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_lowercase().as_str() {
            "" | "t" | "toggle" => Ok(Command::Toggle),
            "s" | "start" => Ok(Command::Start),
            "p" | "stop" => Ok(Command::Stop),
            "r" | "reset" => Ok(Command::Reset),
            "q" | "quit" | "exit" => Ok(Command::Quit),
            other => Err(format!("Unknown command: {}", other)),
        }
    }
}

/// Everything the event loop reacts to
#[derive(Debug)]
pub enum Event {
    /// A scheduled tick fired
    Tick(TickHandle),
    /// A command from the control API, answered with the resulting state
    Command {
        command: Command,
        reply: Option<oneshot::Sender<TimerState>>,
    },
}
