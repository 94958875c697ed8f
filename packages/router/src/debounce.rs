//! Cancelable single-shot timer for viewport-driven refreshes.
//!
//! Time is supplied by the caller as the elapsed [`Duration`] since some
//! fixed origin (typically session start), so tests can step it freely.

use std::time::Duration;

/// Default quiescence window.
pub const DEFAULT_DEBOUNCE_WINDOW: Duration = Duration::from_millis(200);

/// Coalesces a burst of events into one action after a quiet period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Debouncer {
    window: Duration,
    deadline: Option<Duration>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_WINDOW)
    }
}

impl Debouncer {
    /// Creates an idle debouncer with the given quiet period.
    #[must_use]
    pub const fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    /// Cancels any pending action and schedules a new one at `now + window`.
    pub fn schedule(&mut self, now: Duration) {
        self.deadline = Some(now.saturating_add(self.window));
    }

    /// Cancels the pending action, if any.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Returns `true` while an action is scheduled.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns `true` exactly once when the pending deadline has passed.
    pub fn poll(&mut self, now: Duration) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
