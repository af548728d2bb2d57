//! Terminal presenter: clock line, line commands and quit confirmation

use std::io::{self, Stdout, Write};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{debug, warn};

use crate::{
    services::{play_alert_sound, AlertSound},
    state::{Confirmation, Control, Phase, Presenter},
};

const HELP: &str = "Commands: [Enter] start/stop  s start  p stop  r reset  q quit  h help";

/// Console front end for the timer
#[derive(Debug)]
pub struct Console<R, W> {
    lines: Lines<R>,
    out: W,
    alert: AlertSound,
    phase: Phase,
    clock: String,
    control: Control,
    /// The quit question is showing on the clock line
    asking_quit: bool,
    terminated: bool,
}

impl Console<BufReader<Stdin>, Stdout> {
    /// Console reading commands from stdin and drawing on stdout
    pub fn stdio(alert: AlertSound) -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), io::stdout(), alert)
    }
}

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(input: R, out: W, alert: AlertSound) -> Self {
        Self {
            lines: input.lines(),
            out,
            alert,
            phase: Phase::Focus,
            clock: String::new(),
            control: Control::Start,
            asking_quit: false,
            terminated: false,
        }
    }

    /// Read the next input line. `None` once input is closed.
    pub async fn next_line(&mut self) -> Option<String> {
        match self.lines.next_line().await {
            Ok(line) => line,
            Err(e) => {
                warn!("Failed to read console input: {}", e);
                None
            }
        }
    }

    /// Read a quit answer from a console line. `None` (closed input) declines.
    pub fn quit_answer(&mut self, line: Option<&str>) -> bool {
        self.asking_quit = false;
        let confirmed = line
            .map(|answer| matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
            .unwrap_or(false);

        if !confirmed {
            self.redraw();
        }
        confirmed
    }

    /// Whether a confirmed quit asked the application to exit
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn print_help(&mut self) {
        self.message(HELP);
    }

    /// Print a line of text below the clock, then redraw the clock
    pub fn message(&mut self, text: &str) {
        self.write(&format!("\n{}\n", text));
        self.redraw();
    }

    fn redraw(&mut self) {
        // Nothing is drawn after the final newline
        if self.terminated {
            return;
        }

        let line = if self.asking_quit {
            format!("\r{} {}  Do you want to quit? [y/N] ", self.phase, self.clock)
        } else {
            format!(
                "\r{} {}  [Enter: {}]  ",
                self.phase,
                self.clock,
                self.control.label()
            )
        };
        self.write(&line);
    }

    fn write(&mut self, text: &str) {
        if let Err(e) = self
            .out
            .write_all(text.as_bytes())
            .and_then(|_| self.out.flush())
        {
            warn!("Failed to write to console: {}", e);
        }
    }
}

impl<R, W> Presenter for Console<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    fn render_clock(&mut self, text: &str) {
        self.clock = text.to_string();
        self.redraw();
    }

    fn set_control(&mut self, control: Control) {
        debug!("Enter now bound to {}", control.action());
        self.control = control;
        self.redraw();
    }

    fn phase_changed(&mut self, phase: Phase) {
        self.phase = phase;
        let text = match phase {
            Phase::Focus => "Break over, back to focus.",
            Phase::Break => "Focus interval done, take a break.",
        };
        self.message(text);
    }

    fn play_alert(&mut self) {
        if !self.alert.enabled {
            debug!("Alert muted, not playing");
            return;
        }

        let sound = self.alert.clone();
        tokio::spawn(async move {
            if let Err(e) = play_alert_sound(&sound).await {
                warn!("Alert failed: {}", e);
            }
        });
    }

    fn confirm_quit(&mut self) -> Confirmation {
        self.asking_quit = true;
        self.write("\n");
        self.redraw();
        Confirmation::Pending
    }

    fn terminate(&mut self) {
        self.terminated = true;
        self.write("\n");
    }
}
