//! Focus Timer - A focus/break countdown timer
//!
//! This is the main entry point for the focus-timer application.

use std::sync::Arc;
use tokio::{net::TcpListener, sync::mpsc};
use tracing::{info, warn};

use focus_timer::{
    config::Config,
    console::Console,
    state::{AppState, TimerController},
    api::create_router,
    services::check_alert_asset,
    tasks::{timer_event_loop, TokioScheduler},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Logs go to stderr, the clock owns stdout
    tracing_subscriber::fmt()
        .with_env_filter(format!("focus_timer={},tower_http=info", config.log_level()))
        .with_writer(std::io::stderr)
        .init();

    info!("Starting focus-timer v{}", env!("CARGO_PKG_VERSION"));

    let alert = config.alert();
    if let Err(e) = check_alert_asset(&alert) {
        warn!("{}", e);
    }

    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let state = Arc::new(AppState::new(events_tx.clone()));

    if let Some(addr) = config.address() {
        let listener = TcpListener::bind(&addr).await?;
        let app = create_router(Arc::clone(&state));

        info!("Control API running on http://{}", addr);
        info!("Endpoints:");
        info!("  POST /start  - Start or resume the countdown");
        info!("  POST /stop   - Pause the countdown");
        info!("  POST /toggle - Press the start/stop control");
        info!("  POST /reset  - Reset to a stopped 25:00 focus interval");
        info!("  POST /quit   - Ask to quit (confirmed on the console)");
        info!("  GET  /status - Current timer state");
        info!("  GET  /health - Health check");

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("Server error: {}", e);
            }
        });
    }

    let controller = TimerController::new(TokioScheduler::new(events_tx), Console::stdio(alert));
    timer_event_loop(controller, events_rx, state).await;

    info!("focus-timer shutdown complete");
    Ok(())
}
