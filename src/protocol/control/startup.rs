//! CAN controller bring-up.
//!
//! A controller that refuses to start is fatal for the bridge. The policy is
//! a bounded number of attempts spaced by a short pause; when they are all
//! spent the caller gets [`InitError::RetriesExhausted`] and is expected to
//! restart the device rather than run without a bus.
use crate::config::BridgeConfig;
use crate::error::InitError;
use crate::protocol::transport::traits::{bridge_timer::BridgeTimer, can_bus::CanBus};

/// Start the controller at the configured bitrate.
///
/// Returns the number of attempts it took.
pub async fn bring_up<C: CanBus, T: BridgeTimer>(
    bus: &mut C,
    timer: &mut T,
    config: &BridgeConfig,
) -> Result<u8, InitError<C::Error>>
where
    C::Error: core::fmt::Debug,
{
    let attempts = config.init_attempts.max(1);
    let mut attempt = 1;

    loop {
        match bus.start(config.bitrate).await {
            Ok(()) => {
                #[cfg(feature = "defmt")]
                defmt::info!("CAN controller started ({} bit/s)", config.bitrate);
                return Ok(attempt);
            }
            Err(last) if attempt >= attempts => {
                #[cfg(feature = "defmt")]
                defmt::error!("CAN controller failed to start, giving up after {}", attempts);
                return Err(InitError::RetriesExhausted { attempts, last });
            }
            Err(_) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("CAN controller start attempt {} failed", attempt);
                timer.delay_ms(config.init_retry_delay_ms).await;
                attempt += 1;
            }
        }
    }
}
