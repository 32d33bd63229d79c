//! Transport abstraction layer for DrunkDeer keyboard communication
//!
//! The keyboard speaks a fire-and-forget protocol over a vendor-defined HID
//! interface: the host writes 64-byte output reports and the keyboard answers
//! (or echoes) with 64-byte input reports. This crate only moves frames; all
//! protocol meaning lives in `drunkdeer-keyboard`.

pub mod device_registry;
pub mod error;
pub mod protocol;
pub mod types;

mod discovery;
mod hid_wired;

pub use device_registry::{is_supported, SupportedDevice, SUPPORTED_DEVICES, VENDOR_ID};
pub use error::TransportError;
pub use protocol::{FRAME_SIZE, PAYLOAD_SIZE, REPORT_ID};
pub use types::{DiscoveredDevice, TransportDeviceInfo};

pub use discovery::HidDiscovery;
pub use hid_wired::HidWiredTransport;

/// The core transport trait - a duplex channel of 64-byte frames
///
/// Implementations must tolerate one thread writing while another thread is
/// blocked in `read_frame`.
pub trait Transport: Send + Sync {
    /// Write one full frame (report id already in byte 0)
    fn write_frame(&self, frame: &[u8; FRAME_SIZE]) -> Result<(), TransportError>;

    /// Read one frame, blocking at most `timeout_ms`
    ///
    /// # Returns
    /// Number of bytes read; `0` on timeout
    fn read_frame(
        &self,
        buf: &mut [u8; FRAME_SIZE],
        timeout_ms: i32,
    ) -> Result<usize, TransportError>;

    /// Get device information
    fn device_info(&self) -> &TransportDeviceInfo;
}
