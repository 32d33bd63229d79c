//! Common types for transport layer

use std::ffi::CString;

/// Device identification information
#[derive(Debug, Clone)]
pub struct TransportDeviceInfo {
    /// USB Vendor ID
    pub vid: u16,
    /// USB Product ID
    pub pid: u16,
    /// HID usage page of the opened interface
    pub usage_page: u16,
    /// HID usage of the opened interface
    pub usage: u16,
    /// Device path (lossy UTF-8, for display)
    pub device_path: String,
    /// Serial number if available
    pub serial: Option<String>,
    /// Product name if available
    pub product_name: Option<String>,
}

impl TransportDeviceInfo {
    /// Short label used in log lines
    pub fn label(&self) -> String {
        format!("{:04X}:{:04X}", self.vid, self.pid)
    }
}

/// Discovered device that can be opened
#[derive(Debug, Clone)]
pub struct DiscoveredDevice {
    /// Device information
    pub info: TransportDeviceInfo,
    /// Raw hidapi path used to open the device
    pub path: CString,
}
