//! Blinking text caret.
//!
//! The caret is visible for one period, hidden for the next, and so on,
//! counted from the last reset. The host polls [`Caret::tick`] from its event
//! loop and redraws when it reports a change.

use std::time::{Duration, Instant};

/// Default blink half-period.
pub const DEFAULT_BLINK_PERIOD: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
pub struct Caret {
    period: Duration,
    started: Instant,
    visible: bool,
}

impl Caret {
    pub fn new(period: Duration, now: Instant) -> Self {
        Self {
            period,
            started: now,
            visible: true,
        }
    }

    /// Show the caret and restart the blink cycle.
    pub fn reset(&mut self, now: Instant) {
        self.started = now;
        self.visible = true;
    }

    /// Update visibility for `now`. Returns whether it flipped.
    pub fn tick(&mut self, now: Instant) -> bool {
        let visible = self.visible_at(now);
        let changed = visible != self.visible;
        self.visible = visible;
        changed
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Instant of the next visibility flip after `now`.
    pub fn next_toggle(&self, now: Instant) -> Instant {
        let period = self.period.as_nanos().max(1);
        let phase = now.saturating_duration_since(self.started).as_nanos();
        let next = (phase / period + 1) * period;
        self.started + Duration::from_nanos(u64::try_from(next).unwrap_or(u64::MAX))
    }

    fn visible_at(&self, now: Instant) -> bool {
        let period = self.period.as_millis().max(1);
        let elapsed = now.saturating_duration_since(self.started).as_millis();
        (elapsed / period) % 2 == 0
    }
}
