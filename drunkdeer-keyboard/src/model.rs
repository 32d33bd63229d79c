//! Keyboard model detection and device identity

use std::fmt;

/// A keyboard model as reported by the identity response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyboardModel {
    /// Model name used by profiles ("A75", "G65", ...)
    pub name: &'static str,
    /// Numeric model type
    pub kind: u16,
}

impl KeyboardModel {
    pub const A75: Self = Self {
        name: "A75",
        kind: 75,
    };
    /// The Pro shares the A75 profile name; it behaves the same
    pub const A75_PRO: Self = Self {
        name: "A75",
        kind: 750,
    };
    pub const G75: Self = Self {
        name: "G75",
        kind: 754,
    };
    pub const G65: Self = Self {
        name: "G65",
        kind: 65,
    };
    pub const G60: Self = Self {
        name: "G60",
        kind: 60,
    };

    /// Lowest tier, used for signatures not in the table
    pub const DEFAULT: Self = Self::A75;
}

impl fmt::Display for KeyboardModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Model signatures in match order (first match wins)
static SIGNATURES: &[([u8; 3], KeyboardModel)] = &[
    ([0x0b, 0x01, 0x01], KeyboardModel::A75),
    ([0x0b, 0x04, 0x01], KeyboardModel::A75),
    ([0x0b, 0x04, 0x03], KeyboardModel::A75_PRO),
    ([0x0b, 0x04, 0x05], KeyboardModel::G75),
    ([0x0f, 0x01, 0x01], KeyboardModel::G65),
    ([0x0b, 0x02, 0x01], KeyboardModel::G65),
    ([0x0b, 0x03, 0x01], KeyboardModel::G60),
];

/// Resolve a 3-byte model signature
///
/// Unrecognized signatures resolve to [`KeyboardModel::DEFAULT`] so newer
/// hardware revisions still get a usable model.
pub fn detect_model(signature: &[u8]) -> KeyboardModel {
    SIGNATURES
        .iter()
        .find(|(sig, _)| sig.as_slice() == signature)
        .map(|(_, model)| *model)
        .unwrap_or(KeyboardModel::DEFAULT)
}

/// Device identity, set once from the first identity response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceIdentity {
    pub model: KeyboardModel,
    /// Firmware version as displayed by the vendor tools ("0.0" + number)
    pub firmware_version: String,
    pub turbo: bool,
    pub rapid_trigger: bool,
}

impl DeviceIdentity {
    pub fn model_name(&self) -> &'static str {
        self.model.name
    }

    pub fn model_type(&self) -> u16 {
        self.model.kind
    }
}

/// Format a raw firmware version number
pub fn format_firmware_version(raw: u16) -> String {
    format!("0.0{raw}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_signatures() {
        assert_eq!(detect_model(&[0x0b, 0x01, 0x01]), KeyboardModel::A75);
        assert_eq!(detect_model(&[0x0b, 0x01, 0x01]).kind, 75);
        assert_eq!(detect_model(&[0x0b, 0x04, 0x03]).kind, 750);
        assert_eq!(detect_model(&[0x0b, 0x04, 0x05]).name, "G75");
        assert_eq!(detect_model(&[0x0f, 0x01, 0x01]).name, "G65");
        assert_eq!(detect_model(&[0x0b, 0x02, 0x01]).name, "G65");
        assert_eq!(detect_model(&[0x0b, 0x03, 0x01]).kind, 60);
    }

    #[test]
    fn test_unknown_signature_defaults_to_lowest_tier() {
        let model = detect_model(&[0xFF, 0xFF, 0xFF]);
        assert_eq!(model, KeyboardModel::DEFAULT);
        assert_eq!(model.name, "A75");
        assert_eq!(model.kind, 75);
    }

    #[test]
    fn test_short_signature_defaults() {
        assert_eq!(detect_model(&[0x0b, 0x01]), KeyboardModel::DEFAULT);
        assert_eq!(detect_model(&[]), KeyboardModel::DEFAULT);
    }

    #[test]
    fn test_firmware_version_format() {
        assert_eq!(format_firmware_version(113), "0.0113");
    }
}
