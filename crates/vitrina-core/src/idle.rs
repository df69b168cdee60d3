// ── Login prompt idle timer ──
//
// Anonymous visitors get the login prompt after a quiet period. It opens
// at most once, and never after the visitor dismissed it or navigated.

use std::time::Duration;

use tokio::time::Instant;

pub const IDLE_PROMPT_DELAY: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct IdlePrompt {
    delay: Duration,
    last_activity: Instant,
    dismissed: bool,
    navigated: bool,
    shown: bool,
}

impl IdlePrompt {
    pub fn new(now: Instant) -> Self {
        Self::with_delay(now, IDLE_PROMPT_DELAY)
    }

    pub fn with_delay(now: Instant, delay: Duration) -> Self {
        Self {
            delay,
            last_activity: now,
            dismissed: false,
            navigated: false,
            shown: false,
        }
    }

    /// Any interaction restarts the countdown.
    pub fn record_activity(&mut self, now: Instant) {
        self.last_activity = now;
    }

    pub fn record_navigation(&mut self) {
        self.navigated = true;
    }

    pub fn dismiss(&mut self) {
        self.dismissed = true;
    }

    fn armed(&self, authenticated: bool) -> bool {
        !(authenticated || self.dismissed || self.navigated || self.shown)
    }

    /// When the prompt would fire, if it still can.
    pub fn deadline(&self, authenticated: bool) -> Option<Instant> {
        self.armed(authenticated)
            .then(|| self.last_activity + self.delay)
    }

    /// Whether to open the prompt now. Returns `true` at most once.
    pub fn poll(&mut self, now: Instant, authenticated: bool) -> bool {
        match self.deadline(authenticated) {
            Some(at) if now >= at => {
                self.shown = true;
                true
            }
            _ => false,
        }
    }
}
