//! Monotonic time source for the protocol state machines.
//!
//! The settling window and the polling sequencer only ever compare
//! timestamps; they never sleep. Injecting the clock lets tests step time
//! deterministically.
use embassy_time::Instant;

/// Source of the current monotonic timestamp.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Clock backed by the embassy time driver of the target.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    #[inline]
    fn now(&self) -> Instant {
        Instant::now()
    }
}

impl<K: Clock> Clock for &K {
    #[inline]
    fn now(&self) -> Instant {
        (**self).now()
    }
}
