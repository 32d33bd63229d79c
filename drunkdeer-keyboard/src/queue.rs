//! Outbound payload queue and writer loop

use std::sync::Arc;
use std::time::Duration;

use crossbeam::channel::{bounded, Receiver, RecvTimeoutError, SendTimeoutError, Sender};
use drunkdeer_transport::protocol::{build_frame, cmd};
use drunkdeer_transport::{Transport, TransportError};
use parking_lot::Mutex;
use tracing::{debug, error, warn};

use crate::config::ControllerConfig;
use crate::error::KeyboardError;
use crate::state::DeviceState;

/// Producer side of the bounded outbound queue
pub(crate) struct OutboundQueue {
    sender: Mutex<Option<Sender<Vec<u8>>>>,
}

/// Create the queue and the receiver consumed by the writer loop
pub(crate) fn outbound_queue(capacity: usize) -> (OutboundQueue, Receiver<Vec<u8>>) {
    let (tx, rx) = bounded(capacity);
    (
        OutboundQueue {
            sender: Mutex::new(Some(tx)),
        },
        rx,
    )
}

impl OutboundQueue {
    /// Queue a payload, blocking while the queue is full
    ///
    /// Fails with [`KeyboardError::Closed`] once shutdown begins.
    pub fn enqueue(
        &self,
        payload: Vec<u8>,
        state: &DeviceState,
        tick: Duration,
    ) -> Result<(), KeyboardError> {
        let sender = self.sender.lock().clone().ok_or(KeyboardError::Closed)?;

        state.begin_send();
        let mut payload = payload;
        loop {
            if state.is_closing() {
                state.end_send();
                return Err(KeyboardError::Closed);
            }
            match sender.send_timeout(payload, tick) {
                Ok(()) => return Ok(()),
                Err(SendTimeoutError::Timeout(p)) => payload = p,
                Err(SendTimeoutError::Disconnected(_)) => {
                    state.end_send();
                    return Err(KeyboardError::Closed);
                }
            }
        }
    }

    /// Stop accepting payloads
    pub fn release(&self) {
        self.sender.lock().take();
    }
}

fn write_payload(transport: &dyn Transport, payload: &[u8]) -> Result<(), TransportError> {
    let Some(&command) = payload.first() else {
        warn!("Skipping empty payload");
        return Ok(());
    };
    debug!(
        "TX {} ({} bytes): {:02x?}",
        cmd::name(command),
        payload.len(),
        &payload[..payload.len().min(12)]
    );
    transport.write_frame(&build_frame(payload))
}

/// Drain the queue in FIFO order, pacing writes by `send_delay`
///
/// A write failure is fatal: it is recorded and shutdown is requested.
pub(crate) fn run_writer_loop(
    transport: Arc<dyn Transport>,
    queue: Receiver<Vec<u8>>,
    state: Arc<DeviceState>,
    config: ControllerConfig,
) {
    debug!("Writer loop started");
    while !state.is_closing() {
        let payload = match queue.recv_timeout(config.poll_tick) {
            Ok(payload) => payload,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        };

        let result = write_payload(transport.as_ref(), &payload);
        state.end_send();
        if let Err(e) = result {
            error!("Write to {} failed: {}", transport.device_info().label(), e);
            state.record_fatal(e);
            state.request_shutdown();
            break;
        }

        if state.pause(config.send_delay) {
            break;
        }
    }
    debug!("Writer loop stopped");
}
