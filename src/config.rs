//! Bridge configuration: bus identifiers, protocol timing, start-up policy.
//!
//! [`BridgeConfig::new`] carries the values the R48 family ships with. All
//! setters are fluent so a configuration can be built in a `const` or inline:
//!
//! ```rust
//! use r48_can_bridge::config::{BridgeConfig, OverlapPolicy};
//!
//! let config = BridgeConfig::new()
//!     .with_tick_ms(10)
//!     .with_overlap_policy(OverlapPolicy::Reject);
//! assert_eq!(config.settling_ms, 45_000);
//! ```
use crate::protocol::transport::can_id::CanId;

/// CAN bitrate used by the rectifier (bit/s).
pub const CAN_BITRATE: u32 = 125_000;

/// Fixed wait after a settling command (ms).
pub const SETTLING_WINDOW_MS: u64 = 45_000;

/// Idle time between two polling cycles (ms).
pub const POLL_INTERVAL_MS: u64 = 5_000;

/// Delay between the output-voltage request and the current batch (ms).
pub const CURRENT_BATCH_DELAY_MS: u64 = 100;

/// Delay between the current batch and the final batch (ms).
pub const FINAL_BATCH_DELAY_MS: u64 = 1_000;

/// What the command gate does with a write that arrives while a settling
/// window is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OverlapPolicy {
    /// Send it; the window restarts from the new command (last write wins).
    Restart,
    /// Refuse it with [`CommandError::Settling`](crate::error::CommandError::Settling).
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Tuning knobs for the bridge.
pub struct BridgeConfig {
    /// Identifier for every write command.
    pub command_id: CanId,
    /// Identifier for every read request.
    pub read_request_id: CanId,
    /// Identifier the rectifier answers on.
    pub response_id: CanId,
    /// Bus speed handed to the controller at bring-up.
    pub bitrate: u32,
    /// Length of the settling window.
    pub settling_ms: u64,
    /// Idle period before a polling cycle starts.
    pub poll_interval_ms: u64,
    /// Gap before the current batch.
    pub current_batch_delay_ms: u64,
    /// Gap before the final batch.
    pub final_batch_delay_ms: u64,
    /// Runner tick period. Keep it under 100 ms.
    pub tick_ms: u32,
    /// Number of controller start attempts before giving up.
    pub init_attempts: u8,
    /// Pause between two start attempts.
    pub init_retry_delay_ms: u32,
    /// Request all five measurements once right after start.
    pub prime_on_start: bool,
    /// Behaviour for writes issued during a settling window.
    pub overlap_policy: OverlapPolicy,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl BridgeConfig {
    /// Factory configuration.
    pub const fn new() -> Self {
        Self {
            command_id: CanId::COMMAND,
            read_request_id: CanId::READ_REQUEST,
            response_id: CanId::RESPONSE,
            bitrate: CAN_BITRATE,
            settling_ms: SETTLING_WINDOW_MS,
            poll_interval_ms: POLL_INTERVAL_MS,
            current_batch_delay_ms: CURRENT_BATCH_DELAY_MS,
            final_batch_delay_ms: FINAL_BATCH_DELAY_MS,
            tick_ms: 20,
            init_attempts: 3,
            init_retry_delay_ms: 250,
            prime_on_start: true,
            overlap_policy: OverlapPolicy::Restart,
        }
    }

    pub const fn with_settling_ms(mut self, millis: u64) -> Self {
        self.settling_ms = millis;
        self
    }

    pub const fn with_poll_interval_ms(mut self, millis: u64) -> Self {
        self.poll_interval_ms = millis;
        self
    }

    pub const fn with_tick_ms(mut self, millis: u32) -> Self {
        self.tick_ms = millis;
        self
    }

    /// At least one attempt is always made.
    pub const fn with_init_attempts(mut self, attempts: u8) -> Self {
        self.init_attempts = if attempts == 0 { 1 } else { attempts };
        self
    }

    pub const fn with_prime_on_start(mut self, prime: bool) -> Self {
        self.prime_on_start = prime;
        self
    }

    pub const fn with_overlap_policy(mut self, policy: OverlapPolicy) -> Self {
        self.overlap_policy = policy;
        self
    }
}
