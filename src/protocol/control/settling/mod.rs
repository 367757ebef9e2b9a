//! Settling window armed after commands the rectifier needs time to apply.
//!
//! While the window is pending, polling is suspended. It clears itself once
//! `now - sent_at >= duration`; there is no other way to cancel it.
use embassy_time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Pending flag plus the timestamp of the command that armed it.
pub struct SettlingWindow {
    pending: bool,
    sent_at: Instant,
    duration: Duration,
}

impl SettlingWindow {
    /// Idle window of the given length.
    pub const fn new(duration: Duration) -> Self {
        Self {
            pending: false,
            sent_at: Instant::from_ticks(0),
            duration,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Timestamp of the command that armed the window, if pending.
    pub fn sent_at(&self) -> Option<Instant> {
        self.pending.then_some(self.sent_at)
    }

    /// Start (or restart) the window at `now`. Any running window is replaced.
    pub fn arm(&mut self, now: Instant) {
        self.pending = true;
        self.sent_at = now;
    }

    /// Instant at which a pending window clears.
    pub fn deadline(&self) -> Option<Instant> {
        self.sent_at().map(|sent_at| sent_at + self.duration)
    }

    /// Whether the window has run its full length at `now`.
    pub fn is_due(&self, now: Instant) -> bool {
        self.pending && now.saturating_duration_since(self.sent_at) >= self.duration
    }

    /// Clear the window if it is due. Returns `true` when it was cleared by this call.
    pub fn expire(&mut self, now: Instant) -> bool {
        if self.is_due(now) {
            self.pending = false;
            true
        } else {
            false
        }
    }

    /// Time left before the window clears; zero when idle.
    pub fn remaining(&self, now: Instant) -> Duration {
        if !self.pending {
            return Duration::from_ticks(0);
        }
        let elapsed = now.saturating_duration_since(self.sent_at);
        self.duration
            .checked_sub(elapsed)
            .unwrap_or(Duration::from_ticks(0))
    }

    /// Whole seconds left, rounded up: `max(0, ceil((duration - elapsed) / 1000))`.
    pub fn remaining_secs(&self, now: Instant) -> u32 {
        let micros = self.remaining(now).as_micros();
        let secs = micros.div_ceil(1_000_000);
        u32::try_from(secs).unwrap_or(u32::MAX)
    }
}
