//! Asynchronous timer abstraction used by the runner tick and the bring-up retries.

/// Timer trait abstraction; must remain thread-safe when applicable.
pub trait BridgeTimer {
    /// Asynchronously wait for `millis` milliseconds.
    fn delay_ms<'a>(&'a mut self, millis: u32) -> impl core::future::Future<Output = ()> + 'a;
}
