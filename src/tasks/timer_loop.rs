//! Timer event loop
//!
//! The loop owns the controller and applies ticks, console input and control
//! API commands one at a time.

use std::{io::Write, sync::Arc};
use tokio::{io::AsyncBufRead, sync::mpsc};
use tracing::{debug, info};

use super::{
    events::{Command, Event},
    scheduler::TokioScheduler,
};
use crate::{
    console::Console,
    state::{AppState, TimerController},
    utils::shutdown_signal,
};

/// Controller type driven by the event loop
pub type ConsoleController<R, W> = TimerController<TokioScheduler, Console<R, W>>;

/// Apply one command to the controller. Returns whether the application should exit.
///
/// Quit only opens the confirmation; the answer comes through [`apply_line`].
pub fn apply_command<R, W>(controller: &mut ConsoleController<R, W>, command: Command) -> bool
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    debug!("Applying {} command", command.as_str());
    match command {
        Command::Start => controller.start(),
        Command::Stop => controller.stop(),
        Command::Toggle => controller.toggle(),
        Command::Reset => controller.reset(),
        Command::Quit => return controller.request_quit(),
    }
    false
}

/// Apply one console line: the answer to an open quit question, or a command.
/// `None` means input closed. Returns whether the application should exit.
pub fn apply_line<R, W>(
    controller: &mut ConsoleController<R, W>,
    state: &AppState,
    line: Option<&str>,
) -> bool
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    if controller.quit_pending() {
        let confirmed = controller.presenter_mut().quit_answer(line);
        return controller.answer_quit(confirmed);
    }

    let Some(line) = line else {
        return false;
    };

    match line.parse::<Command>() {
        Ok(command) => {
            state.record_action(command.as_str());
            apply_command(controller, command)
        }
        Err(_) if matches!(line.trim(), "h" | "help" | "?") => {
            controller.presenter_mut().print_help();
            false
        }
        Err(e) => {
            controller.presenter_mut().message(&e);
            false
        }
    }
}

/// Run the timer until a confirmed quit or a shutdown signal
pub async fn timer_event_loop<R, W>(
    mut controller: ConsoleController<R, W>,
    mut events_rx: mpsc::UnboundedReceiver<Event>,
    state: Arc<AppState>,
) where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    info!("Starting timer event loop");
    controller.presenter_mut().print_help();
    state.publish(controller.state());

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);
    let mut input_open = true;

    loop {
        let exit = tokio::select! {
            Some(event) = events_rx.recv() => match event {
                Event::Tick(handle) => {
                    controller.handle_tick(handle);
                    false
                }
                Event::Command { command, reply } => {
                    state.record_action(command.as_str());
                    let exit = apply_command(&mut controller, command);
                    if let Some(reply) = reply {
                        if reply.send(controller.state().clone()).is_err() {
                            debug!("Command sender went away before the reply");
                        }
                    }
                    exit
                }
            },

            line = controller.presenter_mut().next_line(), if input_open => {
                if line.is_none() {
                    debug!("Console input closed");
                    input_open = false;
                }
                apply_line(&mut controller, &state, line.as_deref())
            },

            _ = &mut shutdown => {
                info!("Shutdown signal received");
                true
            }
        };

        state.publish(controller.state());

        if exit || controller.presenter().is_terminated() {
            break;
        }
    }

    // No tick may outlive the loop
    controller.stop();
    state.publish(controller.state());
    info!("Timer event loop finished");
}
