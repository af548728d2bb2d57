//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use tracing::{error, info};

use crate::{state::AppState, tasks::Command};
use super::responses::{ApiResponse, HealthResponse, StatusResponse};

/// Forward a command to the timer loop and wrap the resulting state
async fn run_command(state: &AppState, command: Command, message: &str) -> Result<Json<ApiResponse>, StatusCode> {
    match state.dispatch(command).await {
        Ok(timer) => {
            info!("{} endpoint called - timer at {}", command.as_str(), timer.display);
            Ok(Json(ApiResponse::for_timer(message.to_string(), timer)))
        }
        Err(e) => {
            error!("Failed to apply {} command: {}", command.as_str(), e);
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}

/// Handle POST /start - Start or resume the countdown
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    run_command(&state, Command::Start, "Timer started").await
}

/// Handle POST /stop - Pause the countdown
pub async fn stop_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    run_command(&state, Command::Stop, "Timer stopped").await
}

/// Handle POST /toggle - Press the start/stop control
pub async fn toggle_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    run_command(&state, Command::Toggle, "Timer toggled").await
}

/// Handle POST /reset - Back to a stopped 25:00 focus interval
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    run_command(&state, Command::Reset, "Timer reset").await
}

/// Handle POST /quit - Put the quit question on the console. Answers at once; the
/// countdown keeps going until someone confirms there.
pub async fn quit_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    run_command(&state, Command::Quit, "Quit confirmation pending on the console").await
}

/// Handle GET /status - Return the latest published timer state
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        timer: state.get_timer_state(),
        uptime: state.get_uptime(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
