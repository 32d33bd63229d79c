//! Device discovery for DrunkDeer keyboards

use std::sync::Arc;

use hidapi::HidApi;
use tracing::{debug, info};

use crate::device_registry::{self, SupportedDevice};
use crate::error::TransportError;
use crate::hid_wired::HidWiredTransport;
use crate::types::{DiscoveredDevice, TransportDeviceInfo};
use crate::Transport;

/// HID device discovery
pub struct HidDiscovery {
    api: HidApi,
    /// Allow-list of interfaces to look for
    known_devices: &'static [SupportedDevice],
}

impl HidDiscovery {
    /// Create a new HID discovery instance (enumerates devices once)
    pub fn new() -> Result<Self, TransportError> {
        let api = HidApi::new()?;
        Ok(Self {
            api,
            known_devices: device_registry::SUPPORTED_DEVICES,
        })
    }

    fn is_known_interface(&self, device_info: &hidapi::DeviceInfo) -> bool {
        self.known_devices.iter().any(|d| {
            d.matches(
                device_info.vendor_id(),
                device_info.product_id(),
                device_info.usage_page(),
                device_info.usage(),
            )
        })
    }

    /// List currently connected keyboards, in enumeration order
    pub fn list_devices(&self) -> Vec<DiscoveredDevice> {
        let mut devices = Vec::new();

        for device_info in self.api.device_list() {
            if !self.is_known_interface(device_info) {
                continue;
            }

            let info = TransportDeviceInfo {
                vid: device_info.vendor_id(),
                pid: device_info.product_id(),
                usage_page: device_info.usage_page(),
                usage: device_info.usage(),
                device_path: device_info.path().to_string_lossy().to_string(),
                serial: device_info.serial_number().map(|s| s.to_string()),
                product_name: device_info.product_string().map(|s| s.to_string()),
            };

            debug!(
                "Found device: VID={:04X} PID={:04X} page={:04X} usage={:04X} path={}",
                info.vid, info.pid, info.usage_page, info.usage, info.device_path
            );

            devices.push(DiscoveredDevice {
                info,
                path: device_info.path().to_owned(),
            });
        }

        devices
    }

    /// Open a specific device
    pub fn open_device(
        &self,
        device: &DiscoveredDevice,
    ) -> Result<Arc<dyn Transport>, TransportError> {
        let transport = HidWiredTransport::open(&self.api, device)?;
        info!(
            "Opened {} ({})",
            device.info.label(),
            device.info.product_name.as_deref().unwrap_or("unknown product")
        );
        Ok(Arc::new(transport))
    }

    /// Open the `index`-th connected keyboard
    pub fn open_index(&self, index: usize) -> Result<Arc<dyn Transport>, TransportError> {
        let devices = self.list_devices();
        if devices.is_empty() {
            return Err(TransportError::DeviceNotFound(
                "No supported device found".into(),
            ));
        }

        let device = devices.get(index).ok_or(TransportError::InvalidIndex {
            index,
            count: devices.len(),
        })?;
        self.open_device(device)
    }
}
