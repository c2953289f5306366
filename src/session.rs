//! Session phase machine and the shared countdown.
//!
//! One [`Session`] drives a whole training run through its phases:
//! Setup -> Step1 -> Step2 -> Review. Both step phases share a single
//! [`Countdown`]; the clock is never duplicated per phase, so the time left
//! in Step 2 is exactly whatever Step 1 did not use.
//!
//! The controller is the only writer of its own state. Ticks and explicit
//! transitions arrive through the same synchronous call path, which is what
//! guarantees there is no observable moment where the clock reads zero but
//! the phase has not yet moved to Review.

/// Default time budget for a whole run, in seconds.
pub const DEFAULT_TOTAL_SECONDS: u32 = 120;

/// One stage of the guided exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Setup,
    Step1,
    Step2,
    Review,
}

impl Phase {
    /// Whether this is one of the two timed content phases.
    #[must_use]
    pub fn is_step(self) -> bool {
        matches!(self, Phase::Step1 | Phase::Step2)
    }
}

/// The shared time budget for a run.
///
/// Invariant: `0 <= remaining_seconds <= total_seconds`, and the remaining
/// time only changes (by exactly one second) while the countdown is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    total_seconds: u32,
    remaining_seconds: u32,
    is_running: bool,
}

impl Countdown {
    fn new(total_seconds: u32) -> Self {
        Self {
            total_seconds,
            remaining_seconds: total_seconds,
            is_running: false,
        }
    }

    #[must_use]
    pub fn total_seconds(&self) -> u32 {
        self.total_seconds
    }

    #[must_use]
    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.is_running
    }

    fn reset_and_start(&mut self) {
        self.remaining_seconds = self.total_seconds;
        self.is_running = true;
    }

    fn stop(&mut self) {
        self.is_running = false;
    }

    /// Advance the clock by one second.
    ///
    /// Returns `true` when this tick exhausted the budget; the countdown
    /// stops itself in the same call so callers never see `remaining == 0`
    /// with the clock still running.
    fn tick(&mut self) -> bool {
        if !self.is_running {
            return false;
        }

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            self.is_running = false;
            return true;
        }

        false
    }
}

/// The phase state machine for one training run.
#[derive(Debug, Clone, Copy)]
pub struct Session {
    phase: Phase,
    countdown: Countdown,
}

impl Session {
    #[must_use]
    pub fn new(total_seconds: u32) -> Self {
        Self {
            phase: Phase::Setup,
            countdown: Countdown::new(total_seconds),
        }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn countdown(&self) -> Countdown {
        self.countdown
    }

    #[must_use]
    pub fn remaining_seconds(&self) -> u32 {
        self.countdown.remaining_seconds()
    }

    #[must_use]
    pub fn total_seconds(&self) -> u32 {
        self.countdown.total_seconds()
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.countdown.is_running()
    }

    /// Begin the run: Setup -> Step1, with a full clock.
    ///
    /// Returns `false` without touching any state when the theme is blank or
    /// the session is not in Setup. An empty theme is a validation failure
    /// for the host to surface, not an error.
    pub fn start(&mut self, theme: &str) -> bool {
        if self.phase != Phase::Setup || theme.trim().is_empty() {
            return false;
        }

        self.countdown.reset_and_start();
        self.phase = Phase::Step1;
        true
    }

    /// Step1 -> Step2. The countdown keeps running, untouched.
    pub fn advance(&mut self) {
        if self.phase == Phase::Step1 {
            self.phase = Phase::Step2;
        }
    }

    /// Step2 -> Review, stopping the clock.
    pub fn complete(&mut self) {
        if self.phase == Phase::Step2 {
            self.countdown.stop();
            self.phase = Phase::Review;
        }
    }

    /// Back to Setup, discarding all phase-scoped state.
    ///
    /// Accepted from any phase: besides the Review-screen restart this is
    /// also the host's abandon path, and resetting can never corrupt state.
    pub fn restart(&mut self) {
        self.countdown = Countdown::new(self.countdown.total_seconds());
        self.phase = Phase::Setup;
    }

    /// One elapsed-second event.
    ///
    /// While running, decrements the clock; when the budget runs out during
    /// Step1 or Step2 the session moves to Review in this same call, with no
    /// explicit `complete` needed from the host.
    pub fn tick(&mut self) {
        if self.countdown.tick() && self.phase.is_step() {
            self.phase = Phase::Review;
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DEFAULT_TOTAL_SECONDS)
    }
}
