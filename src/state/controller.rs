//! Timer controller: the focus/break state machine
//!
//! The controller owns the single [`TimerState`] of the application and is the
//! only place it is mutated. It never sleeps or spawns work itself; ticks are
//! armed through a [`Scheduler`] and every observable change is pushed to a
//! [`Presenter`].

use std::{fmt::Debug, time::Duration};
use tracing::{debug, info};

use super::{Phase, TimerState};

/// Delay between two countdown ticks
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Deferred-callback capability provided by the event loop
pub trait Scheduler {
    /// Opaque handle identifying one scheduled tick
    type Handle: Copy + Eq + Debug;

    /// Arrange for a tick carrying the returned handle to be delivered once `after` elapses
    fn schedule_after(&mut self, after: Duration) -> Self::Handle;

    /// Cancel a scheduled tick. No-op if it already fired or is unknown.
    fn cancel(&mut self, handle: Self::Handle);
}

/// Start/stop control shown to the user, and the command it is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Start,
    Stop,
}

impl Control {
    pub fn label(self) -> &'static str {
        match self {
            Control::Start => "Start",
            Control::Stop => "Stop",
        }
    }

    /// Name of the command the control triggers
    pub fn action(self) -> &'static str {
        match self {
            Control::Start => "start",
            Control::Stop => "stop",
        }
    }
}

/// Answer to a quit confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Yes,
    No,
    /// The question is on screen; the answer arrives later through
    /// [`TimerController::answer_quit`]
    Pending,
}

/// Presentation layer notified by the controller
pub trait Presenter {
    /// Show the clock text, e.g. "25:00"
    fn render_clock(&mut self, text: &str);

    /// Update the start/stop control label and its bound command
    fn set_control(&mut self, control: Control);

    /// The active phase changed, on interval completion or reset
    fn phase_changed(&mut self, _phase: Phase) {}

    /// Audible notification that an interval finished
    fn play_alert(&mut self);

    /// Ask the user whether to quit. Must not block waiting for the answer.
    fn confirm_quit(&mut self) -> Confirmation;

    /// Exit the application
    fn terminate(&mut self);
}

/// Owns the timer state and enforces the phase-transition policy
#[derive(Debug)]
pub struct TimerController<S: Scheduler, P: Presenter> {
    state: TimerState,
    scheduler: S,
    presenter: P,
    /// The single outstanding tick, if any
    pending: Option<S::Handle>,
    /// A quit confirmation is waiting for its answer
    quit_pending: bool,
}

impl<S: Scheduler, P: Presenter> TimerController<S, P> {
    /// Create a controller in the initial `Stopped(Focus)` state
    pub fn new(scheduler: S, mut presenter: P) -> Self {
        let state = TimerState::new();
        presenter.render_clock(&state.display);
        presenter.set_control(Control::Start);

        Self {
            state,
            scheduler,
            presenter,
            pending: None,
            quit_pending: false,
        }
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Handle of the outstanding tick, if one is armed
    pub fn pending_tick(&self) -> Option<S::Handle> {
        self.pending
    }

    /// Control currently offered to the user
    pub fn control(&self) -> Control {
        if self.state.is_running {
            Control::Stop
        } else {
            Control::Start
        }
    }

    /// Begin (or resume) counting down. No-op while already running.
    pub fn start(&mut self) {
        if self.state.is_running {
            debug!("Start ignored, timer already running");
            return;
        }

        info!(
            "Starting {} countdown at {}",
            self.state.phase, self.state.display
        );
        self.state.is_running = true;
        self.presenter.set_control(Control::Stop);
        self.presenter.render_clock(&self.state.display);
        self.arm_tick();
    }

    /// Pause the countdown, keeping the remaining time
    pub fn stop(&mut self) {
        if self.state.is_running {
            info!("Stopping countdown at {}", self.state.display);
        }
        self.state.is_running = false;
        self.cancel_pending();
        self.presenter.set_control(Control::Start);
    }

    /// Return to a stopped focus interval at 25:00
    pub fn reset(&mut self) {
        info!("Resetting timer");
        let previous = self.state.phase;
        self.state.is_running = false;
        self.cancel_pending();
        self.state.enter_phase(Phase::Focus);
        if previous != Phase::Focus {
            self.presenter.phase_changed(Phase::Focus);
        }
        self.presenter.set_control(Control::Start);
        self.presenter.render_clock(&self.state.display);
    }

    /// Run whichever command the start/stop control is bound to
    pub fn toggle(&mut self) {
        match self.control() {
            Control::Start => self.start(),
            Control::Stop => self.stop(),
        }
    }

    /// Whether a quit confirmation is waiting for its answer
    pub fn quit_pending(&self) -> bool {
        self.quit_pending
    }

    /// Ask for confirmation and terminate on a yes. Returns whether the app is terminating.
    ///
    /// The countdown keeps running while a pending question is open.
    pub fn request_quit(&mut self) -> bool {
        if self.quit_pending {
            debug!("Quit already awaiting confirmation");
            return false;
        }

        match self.presenter.confirm_quit() {
            Confirmation::Yes => self.finish_quit(),
            Confirmation::No => {
                debug!("Quit declined");
                false
            }
            Confirmation::Pending => {
                debug!("Quit awaiting confirmation");
                self.quit_pending = true;
                false
            }
        }
    }

    /// Deliver the answer to a pending quit confirmation. Returns whether the app is terminating.
    pub fn answer_quit(&mut self, confirmed: bool) -> bool {
        if !self.quit_pending {
            debug!("No quit confirmation pending");
            return false;
        }
        self.quit_pending = false;

        if confirmed {
            self.finish_quit()
        } else {
            debug!("Quit declined");
            false
        }
    }

    fn finish_quit(&mut self) -> bool {
        info!("Quit confirmed");
        self.cancel_pending();
        self.presenter.terminate();
        true
    }

    /// Deliver a scheduled tick. Firings for anything but the outstanding handle are stale.
    pub fn handle_tick(&mut self, handle: S::Handle) {
        if self.pending != Some(handle) {
            debug!("Ignoring stale tick {:?}", handle);
            return;
        }
        self.pending = None;
        self.tick();
    }

    /// Advance the countdown by one second
    pub fn tick(&mut self) {
        if !self.state.is_running {
            return;
        }

        if self.state.remaining_seconds == 0 {
            // The swap happens on the tick after 00:00 was shown; no decrement here.
            let finished = self.state.phase;
            let next = finished.next();
            info!("{} interval finished, switching to {}", finished, next);
            self.presenter.play_alert();
            self.state.enter_phase(next);
            self.presenter.phase_changed(next);
        } else {
            let remaining = self.state.remaining_seconds - 1;
            self.state.set_remaining(remaining);
        }

        debug!("Tick: {} {}", self.state.phase, self.state.display);
        self.presenter.render_clock(&self.state.display);

        if self.state.is_running {
            self.arm_tick();
        }
    }

    /// Arm the next tick, replacing any outstanding one
    fn arm_tick(&mut self) {
        self.cancel_pending();
        self.pending = Some(self.scheduler.schedule_after(TICK_INTERVAL));
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic scheduler recording what is pending
    #[derive(Debug, Default)]
    pub struct FakeScheduler {
        next_id: u64,
        pub pending: Vec<u64>,
        pub cancelled: Vec<u64>,
        pub delays: Vec<Duration>,
    }

    impl Scheduler for FakeScheduler {
        type Handle = u64;

        fn schedule_after(&mut self, after: Duration) -> u64 {
            self.next_id += 1;
            self.pending.push(self.next_id);
            self.delays.push(after);
            self.next_id
        }

        fn cancel(&mut self, handle: u64) {
            if let Some(pos) = self.pending.iter().position(|&h| h == handle) {
                self.pending.remove(pos);
                self.cancelled.push(handle);
            }
        }
    }

    impl FakeScheduler {
        /// Fire the oldest pending tick, returning its handle
        pub fn fire(&mut self) -> Option<u64> {
            if self.pending.is_empty() {
                None
            } else {
                Some(self.pending.remove(0))
            }
        }
    }

    #[derive(Debug, Default)]
    pub struct RecordingPresenter {
        pub clocks: Vec<String>,
        pub controls: Vec<Control>,
        pub phases: Vec<Phase>,
        pub alerts: usize,
        pub confirm: Option<Confirmation>,
        pub confirm_asked: usize,
        pub terminated: bool,
    }

    impl Presenter for RecordingPresenter {
        fn render_clock(&mut self, text: &str) {
            self.clocks.push(text.to_string());
        }

        fn set_control(&mut self, control: Control) {
            self.controls.push(control);
        }

        fn phase_changed(&mut self, phase: Phase) {
            self.phases.push(phase);
        }

        fn play_alert(&mut self) {
            self.alerts += 1;
        }

        fn confirm_quit(&mut self) -> Confirmation {
            self.confirm_asked += 1;
            self.confirm.unwrap_or(Confirmation::No)
        }

        fn terminate(&mut self) {
            self.terminated = true;
        }
    }

    type TestController = TimerController<FakeScheduler, RecordingPresenter>;

    fn controller() -> TestController {
        TimerController::new(FakeScheduler::default(), RecordingPresenter::default())
    }

    /// Fire the pending tick through the scheduler, the way the event loop does
    fn fire(ctl: &mut TestController) {
        let handle = ctl.scheduler.fire().expect("a tick should be pending");
        ctl.handle_tick(handle);
    }

    fn last_clock(ctl: &TestController) -> &str {
        ctl.presenter().clocks.last().map(String::as_str).unwrap_or("")
    }

    #[test]
    fn starts_stopped_in_focus() {
        let ctl = controller();
        assert_eq!(ctl.state(), &TimerState::new());
        assert_eq!(ctl.control(), Control::Start);
        assert_eq!(ctl.pending_tick(), None);
        assert_eq!(last_clock(&ctl), "25:00");
    }

    #[test]
    fn start_arms_one_tick_after_a_second() {
        let mut ctl = controller();
        ctl.start();
        assert!(ctl.state().is_running);
        assert_eq!(ctl.scheduler().pending.len(), 1);
        assert_eq!(ctl.scheduler().delays, vec![TICK_INTERVAL]);
        assert_eq!(ctl.presenter().controls.last(), Some(&Control::Stop));
    }

    #[test]
    fn double_start_keeps_a_single_pending_tick() {
        let mut ctl = controller();
        ctl.start();
        ctl.start();
        assert_eq!(ctl.scheduler().pending.len(), 1);

        fire(&mut ctl);
        ctl.start();
        assert_eq!(ctl.scheduler().pending.len(), 1);
        assert_eq!(ctl.state().remaining_seconds, 1499);
    }

    #[test]
    fn tick_without_running_does_nothing() {
        let mut ctl = controller();
        ctl.tick();
        assert_eq!(ctl.state().remaining_seconds, 1500);
        assert!(ctl.scheduler().pending.is_empty());
    }

    #[test]
    fn direct_tick_replaces_outstanding_handle() {
        let mut ctl = controller();
        ctl.start();
        ctl.tick();
        ctl.tick();
        assert_eq!(ctl.scheduler().pending.len(), 1);
        assert_eq!(ctl.state().remaining_seconds, 1498);
    }

    #[test]
    fn focus_swaps_to_break_one_tick_after_zero() {
        let mut ctl = controller();
        ctl.start();

        for _ in 0..1499 {
            fire(&mut ctl);
        }
        assert_eq!(last_clock(&ctl), "00:01");

        fire(&mut ctl); // tick 1500
        assert_eq!(ctl.state().remaining_seconds, 0);
        assert_eq!(ctl.state().phase, Phase::Focus);
        assert_eq!(last_clock(&ctl), "00:00");
        assert_eq!(ctl.presenter().alerts, 0);

        fire(&mut ctl); // tick 1501
        assert_eq!(ctl.state().phase, Phase::Break);
        assert_eq!(ctl.state().remaining_seconds, 300);
        assert_eq!(last_clock(&ctl), "05:00");
        assert_eq!(ctl.presenter().alerts, 1);
        assert_eq!(ctl.presenter().phases, vec![Phase::Break]);

        fire(&mut ctl); // tick 1502
        assert_eq!(last_clock(&ctl), "04:59");
        assert!(ctl.state().is_running);
        assert_eq!(ctl.scheduler().pending.len(), 1);
    }

    #[test]
    fn phases_alternate_strictly() {
        let mut ctl = controller();
        ctl.start();

        // focus 1500 + swap, break 300 + swap, repeated
        let cycle = (1500 + 1) + (300 + 1);
        for _ in 0..(cycle * 2) {
            fire(&mut ctl);
        }

        assert_eq!(
            ctl.presenter().phases,
            vec![Phase::Break, Phase::Focus, Phase::Break, Phase::Focus]
        );
        assert_eq!(ctl.presenter().alerts, 4);
        assert_eq!(ctl.state().phase, Phase::Focus);
        assert_eq!(ctl.state().remaining_seconds, 1500);
    }

    #[test]
    fn stop_cancels_pending_tick_and_keeps_time() {
        let mut ctl = controller();
        ctl.start();
        for _ in 0..10 {
            fire(&mut ctl);
        }
        ctl.stop();

        assert!(!ctl.state().is_running);
        assert!(ctl.scheduler().pending.is_empty());
        assert_eq!(ctl.scheduler().cancelled.len(), 1);
        assert_eq!(ctl.pending_tick(), None);
        assert_eq!(ctl.presenter().controls.last(), Some(&Control::Start));
        assert_eq!(ctl.state().remaining_seconds, 1490);

        ctl.start();
        assert_eq!(ctl.state().remaining_seconds, 1490);
        fire(&mut ctl);
        assert_eq!(ctl.state().remaining_seconds, 1489);
    }

    #[test]
    fn stale_tick_after_stop_is_ignored() {
        let mut ctl = controller();
        ctl.start();
        let stale = ctl.pending_tick().expect("armed");
        ctl.stop();
        ctl.start();

        ctl.handle_tick(stale);
        assert_eq!(ctl.state().remaining_seconds, 1500);
        assert_eq!(ctl.scheduler().pending.len(), 1);
    }

    #[test]
    fn stale_tick_after_reset_does_not_resume_break() {
        let mut ctl = controller();
        ctl.start();
        for _ in 0..1501 {
            fire(&mut ctl);
        }
        assert_eq!(ctl.state().phase, Phase::Break);
        let stale = ctl.pending_tick().expect("armed");

        ctl.reset();
        ctl.handle_tick(stale);

        assert_eq!(ctl.state(), &TimerState::new());
        assert!(ctl.scheduler().pending.is_empty());
    }

    #[test]
    fn reset_is_idempotent() {
        let mut ctl = controller();
        ctl.start();
        for _ in 0..42 {
            fire(&mut ctl);
        }

        ctl.reset();
        let once = ctl.state().clone();
        ctl.reset();

        assert_eq!(ctl.state(), &once);
        assert_eq!(once, TimerState::stopped(Phase::Focus));
        assert_eq!(last_clock(&ctl), "25:00");
        assert_eq!(ctl.presenter().controls.last(), Some(&Control::Start));
    }

    #[test]
    fn toggle_follows_the_control() {
        let mut ctl = controller();
        ctl.toggle();
        assert!(ctl.state().is_running);
        assert_eq!(ctl.control(), Control::Stop);

        ctl.toggle();
        assert!(!ctl.state().is_running);
        assert_eq!(ctl.control(), Control::Start);
        assert!(ctl.scheduler().pending.is_empty());
    }

    #[test]
    fn quit_terminates_only_when_confirmed() {
        let mut ctl = controller();
        ctl.start();
        fire(&mut ctl);
        let before = ctl.state().clone();

        assert!(!ctl.request_quit());
        assert!(!ctl.presenter().terminated);
        assert_eq!(ctl.state(), &before);
        assert_eq!(ctl.scheduler().pending.len(), 1);

        ctl.presenter_mut().confirm = Some(Confirmation::Yes);
        assert!(ctl.request_quit());
        assert!(ctl.presenter().terminated);
        assert_eq!(ctl.presenter().confirm_asked, 2);
        assert!(ctl.scheduler().pending.is_empty());
    }

    #[test]
    fn countdown_continues_while_quit_is_pending() {
        let mut ctl = controller();
        ctl.presenter_mut().confirm = Some(Confirmation::Pending);
        ctl.start();

        assert!(!ctl.request_quit());
        assert!(ctl.quit_pending());
        for _ in 0..5 {
            fire(&mut ctl);
        }
        assert_eq!(ctl.state().remaining_seconds, 1495);

        // Asking again while the question is open doesn't ask twice
        assert!(!ctl.request_quit());
        assert_eq!(ctl.presenter().confirm_asked, 1);

        assert!(!ctl.answer_quit(false));
        assert!(!ctl.quit_pending());
        assert!(!ctl.presenter().terminated);
        assert!(ctl.state().is_running);
        assert_eq!(ctl.scheduler().pending.len(), 1);

        assert!(!ctl.request_quit());
        assert!(ctl.answer_quit(true));
        assert!(ctl.presenter().terminated);
        assert!(ctl.scheduler().pending.is_empty());
    }

    #[test]
    fn answer_without_question_is_ignored() {
        let mut ctl = controller();
        assert!(!ctl.answer_quit(true));
        assert!(!ctl.presenter().terminated);
    }

    #[test]
    fn control_labels_and_actions() {
        assert_eq!(Control::Start.label(), "Start");
        assert_eq!(Control::Stop.action(), "stop");
    }
}
