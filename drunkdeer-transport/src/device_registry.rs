//! Device registry - supported keyboards by HID interface
//!
//! A keyboard exposes several HID interfaces; only the vendor-defined one
//! (usage page 0xFF00) carries the configuration protocol, so matching is on
//! the full (vendor, product, usage page, usage) tuple.

/// DrunkDeer vendor ID
pub const VENDOR_ID: u16 = 0x352D;

/// Vendor-defined usage page of the configuration interface
pub const USAGE_PAGE: u16 = 0xFF00;

/// Usage of the configuration interface
pub const USAGE: u16 = 0x00;

/// One entry in the allow-list of supported HID interfaces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupportedDevice {
    pub vendor_id: u16,
    pub product_id: u16,
    pub usage_page: u16,
    pub usage: u16,
}

impl SupportedDevice {
    const fn new(vendor_id: u16, product_id: u16) -> Self {
        Self {
            vendor_id,
            product_id,
            usage_page: USAGE_PAGE,
            usage: USAGE,
        }
    }

    /// Check whether a HID interface matches this entry
    pub fn matches(&self, vid: u16, pid: u16, usage_page: u16, usage: u16) -> bool {
        self.vendor_id == vid
            && self.product_id == pid
            && self.usage_page == usage_page
            && self.usage == usage
    }
}

/// Known keyboard interfaces
pub const SUPPORTED_DEVICES: &[SupportedDevice] = &[
    SupportedDevice::new(VENDOR_ID, 0x2383),
    SupportedDevice::new(VENDOR_ID, 0x2382),
    SupportedDevice::new(VENDOR_ID, 0x2384),
    SupportedDevice::new(VENDOR_ID, 0x2386),
    SupportedDevice::new(0x05AC, 0x024F), // boards enumerating with an Apple VID
];

/// Check if a HID interface belongs to a supported keyboard
#[inline]
pub fn is_supported(vid: u16, pid: u16, usage_page: u16, usage: u16) -> bool {
    SUPPORTED_DEVICES
        .iter()
        .any(|d| d.matches(vid, pid, usage_page, usage))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_devices() {
        assert!(is_supported(0x352D, 0x2383, 0xFF00, 0x00));
        assert!(is_supported(0x352D, 0x2386, 0xFF00, 0x00));
        assert!(is_supported(0x05AC, 0x024F, 0xFF00, 0x00));
    }

    #[test]
    fn test_wrong_interface_not_supported() {
        // Same keyboard, standard keyboard interface
        assert!(!is_supported(0x352D, 0x2383, 0x0001, 0x06));
        // Vendor interface with a different usage
        assert!(!is_supported(0x352D, 0x2383, 0xFF00, 0x01));
    }

    #[test]
    fn test_unknown_product_not_supported() {
        assert!(!is_supported(0x352D, 0x0000, 0xFF00, 0x00));
        assert!(!is_supported(0x3151, 0x5030, 0xFF00, 0x00));
    }
}
