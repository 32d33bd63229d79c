//! Command handlers for the CLI application.
//!
//! This module organizes command handlers by category:
//! - `device`: Commands that talk to a keyboard (load, reset, list)
//! - `profiles`: Profile directory commands (save, import, profiles)
//! - `utility`: Utility commands (version, command list)

pub mod device;
pub mod profiles;
pub mod utility;

use std::time::Duration;

use anyhow::Context;
use drunkdeer_keyboard::Controller;
use tracing::{debug, warn};

/// Result type for command handlers
pub type CommandResult = anyhow::Result<()>;

/// Max wait for the identity response
pub const IDENTITY_TIMEOUT: Duration = Duration::from_secs(5);

/// Pacing intervals to wait for queued commands before closing
pub const SETTLE_PACKETS: u32 = 10;

/// Open the `index`-th keyboard
pub fn open_keyboard(index: usize) -> anyhow::Result<Controller> {
    let keyboard = drunkdeer_keyboard::open_keyboard(index)
        .with_context(|| format!("Failed to open keyboard {index}"))?;
    debug!("Device opened: {}", keyboard.device_info().label());
    Ok(keyboard)
}

/// Open a keyboard, run a closure with it, then flush and close it
pub fn with_keyboard<F>(index: usize, f: F) -> CommandResult
where
    F: FnOnce(&Controller) -> CommandResult,
{
    let keyboard = open_keyboard(index)?;
    run_and_finish(&keyboard, f)
}

/// Run a closure with an open keyboard, then flush and close it
///
/// The closure's error wins over a close failure, which is only logged.
pub fn run_and_finish<F>(keyboard: &Controller, f: F) -> CommandResult
where
    F: FnOnce(&Controller) -> CommandResult,
{
    match f(keyboard) {
        Ok(()) => finish(keyboard),
        Err(e) => {
            if let Err(close_err) = finish(keyboard) {
                warn!("{:#}", close_err);
            }
            Err(e)
        }
    }
}

/// Wait for queued commands to reach the device, then close
pub fn finish(keyboard: &Controller) -> CommandResult {
    let settle = keyboard.config().pacing(SETTLE_PACKETS);
    let queued = keyboard.config().pacing(keyboard.config().queue_capacity as u32);
    if !keyboard.drain(settle + queued) {
        warn!("Not every queued command was written before closing");
    }
    keyboard.close().context("Failed to close keyboard")
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use drunkdeer_keyboard::ControllerConfig;
    use drunkdeer_transport::{Transport, TransportDeviceInfo, TransportError, FRAME_SIZE};
    use std::sync::Arc;
    use std::thread;

    /// A device that was unplugged: every write fails
    struct UnpluggedTransport {
        info: TransportDeviceInfo,
    }

    impl Transport for UnpluggedTransport {
        fn write_frame(&self, _frame: &[u8; FRAME_SIZE]) -> Result<(), TransportError> {
            Err(TransportError::Disconnected)
        }

        fn read_frame(
            &self,
            _buf: &mut [u8; FRAME_SIZE],
            _timeout_ms: i32,
        ) -> Result<usize, TransportError> {
            thread::sleep(Duration::from_millis(5));
            Ok(0)
        }

        fn device_info(&self) -> &TransportDeviceInfo {
            &self.info
        }
    }

    fn unplugged_keyboard() -> Controller {
        let transport: Arc<dyn Transport> = Arc::new(UnpluggedTransport {
            info: TransportDeviceInfo {
                vid: 0x352D,
                pid: 0x2383,
                usage_page: 0xFF00,
                usage: 0,
                device_path: "unplugged".into(),
                serial: None,
                product_name: None,
            },
        });
        let config = ControllerConfig::default()
            .with_send_delay(Duration::from_millis(1))
            .with_close_timeout(Duration::from_secs(2));
        Controller::with_config(transport, config).unwrap()
    }

    /// Queue one payload and wait for its write to fail
    fn fail_a_write(kb: &Controller) {
        kb.send_key_tracking(false).unwrap();
        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        while !kb.is_closed() && std::time::Instant::now() < deadline {
            thread::sleep(Duration::from_millis(2));
        }
        assert!(kb.is_closed());
    }

    #[test]
    fn command_error_wins_over_close_error() {
        let kb = unplugged_keyboard();
        let err = run_and_finish(&kb, |kb| {
            fail_a_write(kb);
            Err(anyhow!("Profile model does not match device model"))
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "Profile model does not match device model");
    }

    #[test]
    fn close_error_is_reported_after_success() {
        let kb = unplugged_keyboard();
        let err = run_and_finish(&kb, |kb| {
            fail_a_write(kb);
            Ok(())
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "Failed to close keyboard");
    }
}
