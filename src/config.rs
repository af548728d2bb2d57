//! Configuration and CLI argument handling

use std::path::PathBuf;
use clap::Parser;

use crate::services::AlertSound;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "focus-timer")]
#[command(about = "A 25/5 focus and break countdown timer for the terminal")]
#[command(version)]
pub struct Config {
    /// Port for the local control API (disabled when not set)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Host address the control API binds to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Sound file played when an interval finishes
    #[arg(short, long, default_value = "alert.wav")]
    pub sound: PathBuf,

    /// Do not play any alert sound
    #[arg(short, long)]
    pub mute: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Control API address, if the API is enabled
    pub fn address(&self) -> Option<String> {
        self.port.map(|port| format!("{}:{}", self.host, port))
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Alert sound settings
    pub fn alert(&self) -> AlertSound {
        if self.mute {
            AlertSound::muted()
        } else {
            AlertSound::new(self.sound.clone())
        }
    }
}
