//! Shared application state read by the control API

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::warn;

use super::TimerState;
use crate::tasks::{Command, Event};

/// Handle to the event loop plus a published snapshot of the timer
#[derive(Debug)]
pub struct AppState {
    /// Sender into the timer event loop
    pub events_tx: mpsc::UnboundedSender<Event>,
    /// Channel for timer updates
    pub timer_update_tx: watch::Sender<TimerState>,
    /// Keep the receiver alive to prevent channel closure
    pub _timer_update_rx: watch::Receiver<TimerState>,
    pub start_time: Instant,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl AppState {
    pub fn new(events_tx: mpsc::UnboundedSender<Event>) -> Self {
        let (timer_update_tx, timer_update_rx) = watch::channel(TimerState::new());

        Self {
            events_tx,
            timer_update_tx,
            _timer_update_rx: timer_update_rx,
            start_time: Instant::now(),
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
        }
    }

    /// Send a command to the event loop and wait for the resulting timer state
    pub async fn dispatch(&self, command: Command) -> Result<TimerState, String> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.events_tx
            .send(Event::Command {
                command,
                reply: Some(reply_tx),
            })
            .map_err(|_| "Timer event loop is not running".to_string())?;

        reply_rx
            .await
            .map_err(|_| format!("Timer event loop dropped the {} command", command.as_str()))
    }

    /// Publish a new timer snapshot to watchers
    pub fn publish(&self, timer_state: &TimerState) {
        if let Err(e) = self.timer_update_tx.send(timer_state.clone()) {
            warn!("Failed to send timer update: {}", e);
        }
    }

    /// Get the latest published timer state
    pub fn get_timer_state(&self) -> TimerState {
        self.timer_update_tx.borrow().clone()
    }

    /// Remember the last command applied to the timer
    pub fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    /// Calculate uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}
