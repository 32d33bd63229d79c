//! Inbound reader and decoder loops
//!
//! The reader owns the blocking HID read and hands each frame to the decoder
//! through a rendezvous channel. A frame the decoder cannot take within the
//! hand-off timeout is dropped.

use std::sync::Arc;

use crossbeam::channel::{Receiver, RecvTimeoutError, SendTimeoutError, Sender};
use drunkdeer_transport::protocol::cmd;
use drunkdeer_transport::{Transport, FRAME_SIZE};
use tracing::{debug, error};

use crate::config::ControllerConfig;
use crate::decode::{decode, InboundPacket};
use crate::state::DeviceState;

pub(crate) fn run_reader_loop(
    transport: Arc<dyn Transport>,
    handoff: Sender<InboundPacket>,
    state: Arc<DeviceState>,
    config: ControllerConfig,
) {
    debug!("Reader loop started");
    let mut buf = [0u8; FRAME_SIZE];

    while !state.is_closing() {
        let len = match transport.read_frame(&mut buf, config.read_timeout_ms) {
            Ok(0) => continue,
            Ok(len) => len,
            Err(e) => {
                if !state.is_closing() {
                    error!("Read from {} failed: {}", transport.device_info().label(), e);
                    state.record_fatal(e);
                    state.request_shutdown();
                }
                break;
            }
        };

        let Some(packet) = InboundPacket::from_frame(&buf[..len]) else {
            debug!("Discarding frame with report id {:#04x}", buf[0]);
            continue;
        };

        match handoff.send_timeout(packet, config.handoff_timeout) {
            Ok(()) => {}
            Err(SendTimeoutError::Timeout(packet)) => {
                debug!("Decoder busy, dropped {} frame", cmd::name(packet.cmd));
            }
            Err(SendTimeoutError::Disconnected(_)) => break,
        }
    }
    debug!("Reader loop stopped");
}

pub(crate) fn run_decoder_loop(
    handoff: Receiver<InboundPacket>,
    state: Arc<DeviceState>,
    config: ControllerConfig,
) {
    debug!("Decoder loop started");
    while !state.is_closing() {
        match handoff.recv_timeout(config.poll_tick) {
            Ok(packet) => {
                debug!("RX {} ({} bytes)", cmd::name(packet.cmd), packet.data.len() + 1);
                state.apply(decode(&packet));
            }
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    debug!("Decoder loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam::channel::bounded;
    use drunkdeer_transport::protocol::build_frame;
    use drunkdeer_transport::{TransportDeviceInfo, TransportError};
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use std::thread;
    use std::time::{Duration, Instant};

    /// Serves queued frames, then times out
    struct FrameSource {
        info: TransportDeviceInfo,
        frames: Mutex<VecDeque<[u8; FRAME_SIZE]>>,
    }

    impl FrameSource {
        fn new() -> Self {
            Self {
                info: TransportDeviceInfo {
                    vid: 0x352D,
                    pid: 0x2383,
                    usage_page: 0xFF00,
                    usage: 0,
                    device_path: "test".into(),
                    serial: None,
                    product_name: None,
                },
                frames: Mutex::new(VecDeque::new()),
            }
        }

        fn push(&self, payload: &[u8]) {
            self.frames.lock().push_back(build_frame(payload));
        }

        fn is_empty(&self) -> bool {
            self.frames.lock().is_empty()
        }
    }

    impl Transport for FrameSource {
        fn write_frame(&self, _frame: &[u8; FRAME_SIZE]) -> Result<(), TransportError> {
            Ok(())
        }

        fn read_frame(
            &self,
            buf: &mut [u8; FRAME_SIZE],
            timeout_ms: i32,
        ) -> Result<usize, TransportError> {
            if let Some(frame) = self.frames.lock().pop_front() {
                *buf = frame;
                return Ok(FRAME_SIZE);
            }
            thread::sleep(Duration::from_millis(timeout_ms.clamp(0, 5) as u64));
            Ok(0)
        }

        fn device_info(&self) -> &TransportDeviceInfo {
            &self.info
        }
    }

    #[test]
    fn test_reader_drops_frame_nobody_takes() {
        let source = Arc::new(FrameSource::new());
        let state = Arc::new(DeviceState::new());
        let (handoff_tx, handoff_rx) = bounded(0);
        let config = ControllerConfig {
            read_timeout_ms: 5,
            handoff_timeout: Duration::from_millis(10),
            ..ControllerConfig::default()
        };

        let reader = {
            let transport: Arc<dyn Transport> = source.clone();
            let state = Arc::clone(&state);
            thread::spawn(move || run_reader_loop(transport, handoff_tx, state, config))
        };

        // Nobody receives, so the frame is dropped after the hand-off timeout
        source.push(&[cmd::LED_MODE_SELECT, 0x01, 0x00, 0x01, 0x07, 0x03, 0x08, 0xFF]);
        let deadline = Instant::now() + Duration::from_secs(5);
        while !source.is_empty() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(2));
        }
        assert!(source.is_empty());
        thread::sleep(Duration::from_millis(60));
        assert!(handoff_rx.try_recv().is_err());

        // The reader keeps going and hands over the next frame
        source.push(&[cmd::TURBO_RT, 0x00, 0x1E, 0x01, 0x00, 0x00, 0x01, 0x01, 0x00]);
        let packet = handoff_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(packet.cmd, cmd::TURBO_RT);
        assert_eq!(&packet.data[..3], &[0x00, 0x1E, 0x01]);

        state.request_shutdown();
        reader.join().unwrap();
    }
}
