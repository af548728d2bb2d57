//! Alert sound playback

use std::{
    io::Write,
    path::{Path, PathBuf},
};
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Where the interval-finished alert comes from
#[derive(Debug, Clone)]
pub struct AlertSound {
    pub enabled: bool,
    pub path: PathBuf,
}

impl AlertSound {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            enabled: true,
            path: path.into(),
        }
    }

    /// An alert that is never played
    pub fn muted() -> Self {
        Self {
            enabled: false,
            path: PathBuf::new(),
        }
    }
}

/// Command-line players tried for the configured asset, in order
fn players() -> &'static [&'static str] {
    if cfg!(target_os = "macos") {
        &["afplay"]
    } else if cfg!(target_os = "linux") {
        &["paplay", "aplay"]
    } else {
        &[]
    }
}

/// System sounds used when the configured asset can't be played
fn fallback_sounds() -> &'static [&'static str] {
    if cfg!(target_os = "macos") {
        &[
            "/System/Library/Sounds/Glass.aiff",
            "/System/Library/Sounds/Ping.aiff",
        ]
    } else if cfg!(target_os = "linux") {
        &[
            "/usr/share/sounds/sound-icons/bell.wav",
            "/usr/share/sounds/alsa/Front_Left.wav",
            "/usr/share/sounds/gnome/default/alerts/glass.ogg",
        ]
    } else {
        &[]
    }
}

/// Play one file with one player, waiting for it to finish
async fn play_with(player: &str, path: &Path) -> Result<(), String> {
    debug!("Playing {} with {}", path.display(), player);

    let output = Command::new(player)
        .arg(path)
        .output()
        .await
        .map_err(|e| format!("Failed to execute {}: {}", player, e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("{} failed: {}", player, stderr.trim()));
    }

    Ok(())
}

/// Try every available player on `path`
async fn play_file(path: &Path) -> Result<(), String> {
    let mut last_error = "No audio player known for this platform".to_string();

    for player in players() {
        match play_with(player, path).await {
            Ok(()) => return Ok(()),
            Err(e) => last_error = e,
        }
    }

    Err(last_error)
}

/// Play the alert sound, falling back to system sounds and then the terminal bell
pub async fn play_alert_sound(sound: &AlertSound) -> Result<(), String> {
    if !sound.enabled {
        debug!("Alert muted");
        return Ok(());
    }

    if sound.path.exists() {
        match play_file(&sound.path).await {
            Ok(()) => return Ok(()),
            Err(e) => warn!("Could not play {}: {}", sound.path.display(), e),
        }
    }

    for fallback in fallback_sounds() {
        let path = Path::new(fallback);
        if path.exists() && play_file(path).await.is_ok() {
            debug!("Played fallback sound {}", fallback);
            return Ok(());
        }
    }

    ring_bell().map_err(|e| format!("No alert sound could be played: {}", e))
}

/// Write the ASCII bell to stdout
fn ring_bell() -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(b"\x07")?;
    stdout.flush()
}

/// Check that the alert asset exists so a missing file is reported at startup
pub fn check_alert_asset(sound: &AlertSound) -> Result<(), String> {
    if !sound.enabled {
        info!("Alert sound muted");
        return Ok(());
    }

    if sound.path.is_file() {
        info!("Alert sound: {}", sound.path.display());
        Ok(())
    } else {
        Err(format!(
            "Alert sound {} not found, falling back to system sounds",
            sound.path.display()
        ))
    }
}
