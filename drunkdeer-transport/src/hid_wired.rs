//! HID Wired transport implementation for direct USB connection

use hidapi::{HidApi, HidDevice};
use parking_lot::Mutex;
use tracing::debug;

use crate::error::TransportError;
use crate::protocol::FRAME_SIZE;
use crate::types::{DiscoveredDevice, TransportDeviceInfo};
use crate::Transport;

/// HID transport for wired USB connection
///
/// The vendor interface is opened twice: one handle is used only for
/// output reports, the other only for input reports. A reader blocked in
/// `read_frame` therefore never holds up a pending write.
pub struct HidWiredTransport {
    /// Handle for output reports (commands)
    writer: Mutex<HidDevice>,
    /// Handle for input reports (echoes, identity)
    reader: Mutex<HidDevice>,
    /// Device information
    info: TransportDeviceInfo,
}

impl HidWiredTransport {
    /// Open a discovered device by path
    pub fn open(api: &HidApi, device: &DiscoveredDevice) -> Result<Self, TransportError> {
        let writer = api.open_path(&device.path)?;
        let reader = api.open_path(&device.path)?;
        debug!(
            "Opened {} at {}",
            device.info.label(),
            device.info.device_path
        );

        Ok(Self {
            writer: Mutex::new(writer),
            reader: Mutex::new(reader),
            info: device.info.clone(),
        })
    }
}

impl Transport for HidWiredTransport {
    fn write_frame(&self, frame: &[u8; FRAME_SIZE]) -> Result<(), TransportError> {
        let device = self.writer.lock();
        let written = device.write(frame)?;
        if written == 0 {
            return Err(TransportError::ShortWrite {
                written,
                expected: FRAME_SIZE,
            });
        }
        Ok(())
    }

    fn read_frame(
        &self,
        buf: &mut [u8; FRAME_SIZE],
        timeout_ms: i32,
    ) -> Result<usize, TransportError> {
        let device = self.reader.lock();
        Ok(device.read_timeout(buf, timeout_ms)?)
    }

    fn device_info(&self) -> &TransportDeviceInfo {
        &self.info
    }
}

impl Drop for HidWiredTransport {
    fn drop(&mut self) {
        // HidDevice handles close on drop
        debug!("HidWiredTransport for {} dropped", self.info.label());
    }
}
