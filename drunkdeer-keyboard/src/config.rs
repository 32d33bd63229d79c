//! Controller tuning

use std::time::Duration;

use drunkdeer_transport::protocol::timing;

/// Timing and sizing of the controller's I/O loops
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Pause after each write
    pub send_delay: Duration,
    /// Blocking read timeout of the reader loop (ms)
    pub read_timeout_ms: i32,
    /// Max wait handing a received frame to the decoder
    pub handoff_timeout: Duration,
    /// Max wait for the loops to exit on close
    pub close_timeout: Duration,
    /// Outbound queue capacity
    pub queue_capacity: usize,
    /// Wake-up interval of blocking waits, so shutdown is observed
    pub poll_tick: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            send_delay: Duration::from_millis(timing::DEFAULT_DELAY_MS),
            read_timeout_ms: timing::READ_TIMEOUT_MS,
            handoff_timeout: Duration::from_millis(timing::HANDOFF_TIMEOUT_MS),
            close_timeout: Duration::from_millis(timing::CLOSE_TIMEOUT_MS),
            queue_capacity: timing::QUEUE_CAPACITY,
            poll_tick: Duration::from_millis(timing::IDENTITY_POLL_MS),
        }
    }
}

impl ControllerConfig {
    /// Override the inter-packet delay
    pub fn with_send_delay(mut self, delay: Duration) -> Self {
        self.send_delay = delay;
        self
    }

    pub fn with_close_timeout(mut self, timeout: Duration) -> Self {
        self.close_timeout = timeout;
        self
    }

    /// Time for `n` queued payloads to reach the device
    pub fn pacing(&self, n: u32) -> Duration {
        self.send_delay * n
    }
}
