//! Staged polling of the five measurements.
//!
//! Firing all five read requests in one burst makes the rectifier drop
//! answers, so a cycle is split into three batches with settling gaps:
//!
//! ```text
//! Idle ──(> poll interval)──▶ [OutputVoltage] ──▶ AwaitingCurrentBatch
//! AwaitingCurrentBatch ──(> 100 ms)──▶ [OutputCurrent, OutputCurrentLimit] ──▶ AwaitingFinalBatch
//! AwaitingFinalBatch ──(> 1000 ms)──▶ [Temperature, SupplyVoltage] ──▶ Idle
//! ```
//!
//! The sequencer is a pure decision engine: [`PollSequencer::advance`] says
//! which requests are due and the caller transmits them.
use crate::config::BridgeConfig;
use crate::core::Measurement;
use embassy_time::{Duration, Instant};

/// Position inside a polling cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PollCycle {
    Idle,
    AwaitingCurrentBatch,
    AwaitingFinalBatch,
}

const FIRST_BATCH: &[Measurement] = &[Measurement::OutputVoltage];
const CURRENT_BATCH: &[Measurement] = &[Measurement::OutputCurrent, Measurement::OutputCurrentLimit];
const FINAL_BATCH: &[Measurement] = &[Measurement::Temperature, Measurement::SupplyVoltage];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Gaps between the stages of a cycle.
pub struct PollTiming {
    pub poll_interval: Duration,
    pub current_batch_delay: Duration,
    pub final_batch_delay: Duration,
}

impl PollTiming {
    pub fn from_config(config: &BridgeConfig) -> Self {
        Self {
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            current_batch_delay: Duration::from_millis(config.current_batch_delay_ms),
            final_batch_delay: Duration::from_millis(config.final_batch_delay_ms),
        }
    }
}

#[derive(Debug, Clone)]
/// Polling state machine.
pub struct PollSequencer {
    state: PollCycle,
    last_advance: Instant,
    timing: PollTiming,
}

impl PollSequencer {
    /// Start idle; the first cycle begins one poll interval after `now`.
    pub fn new(timing: PollTiming, now: Instant) -> Self {
        Self {
            state: PollCycle::Idle,
            last_advance: now,
            timing,
        }
    }

    pub fn state(&self) -> PollCycle {
        self.state
    }

    pub fn last_advance(&self) -> Instant {
        self.last_advance
    }

    /// Return the batch of read requests due at `now`, if any, and move to the
    /// next stage.
    ///
    /// While `settling` is true nothing is returned and the stage is kept, so
    /// the cycle resumes where it stopped.
    pub fn advance(&mut self, now: Instant, settling: bool) -> Option<&'static [Measurement]> {
        if settling {
            return None;
        }

        let elapsed = now.saturating_duration_since(self.last_advance);
        let (gap, batch, next) = match self.state {
            PollCycle::Idle => (
                self.timing.poll_interval,
                FIRST_BATCH,
                PollCycle::AwaitingCurrentBatch,
            ),
            PollCycle::AwaitingCurrentBatch => (
                self.timing.current_batch_delay,
                CURRENT_BATCH,
                PollCycle::AwaitingFinalBatch,
            ),
            PollCycle::AwaitingFinalBatch => {
                (self.timing.final_batch_delay, FINAL_BATCH, PollCycle::Idle)
            }
        };

        if elapsed > gap {
            self.state = next;
            self.last_advance = now;
            Some(batch)
        } else {
            None
        }
    }

    /// Drop back to `Idle`, keeping `last_advance`. Called when a settling
    /// window clears.
    pub fn reset(&mut self) {
        self.state = PollCycle::Idle;
    }
}
