//! LED lighting types

/// Speed used by the "lights off" defaults
pub const DEFAULT_SPEED: u8 = 5;

/// Brightness used by the "lights off" defaults
pub const DEFAULT_BRIGHTNESS: u8 = 9;

/// Color byte sent with every mode select (full color wheel)
pub const DEFAULT_COLOR: u8 = 0xFF;

/// LED effect sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LightSequence {
    Off = 0x00,
    Always = 0x02,
    Spectrum = 0x03,
    Breath = 0x04,
    Press = 0x05,
    Stars = 0x06,
    Wave = 0x07,
    Surf = 0x08,
    SurfDown = 0x09,
    Ripple = 0x0A,
    Fish = 0x0B,
    Fountain = 0x0C,
    Traffic = 0x0D,
    Snake = 0x0E,
    SurfRepeat = 0x0F,
    SurfCross = 0x10,
    LaserKey = 0x11,
    FountainRandom = 0x12,
    Custom = 0x13,
}

impl LightSequence {
    /// Get sequence from its wire value
    pub fn from_u8(value: u8) -> Option<Self> {
        Some(match value {
            0x00 => Self::Off,
            0x02 => Self::Always,
            0x03 => Self::Spectrum,
            0x04 => Self::Breath,
            0x05 => Self::Press,
            0x06 => Self::Stars,
            0x07 => Self::Wave,
            0x08 => Self::Surf,
            0x09 => Self::SurfDown,
            0x0A => Self::Ripple,
            0x0B => Self::Fish,
            0x0C => Self::Fountain,
            0x0D => Self::Traffic,
            0x0E => Self::Snake,
            0x0F => Self::SurfRepeat,
            0x10 => Self::SurfCross,
            0x11 => Self::LaserKey,
            0x12 => Self::FountainRandom,
            0x13 => Self::Custom,
            _ => return None,
        })
    }

    /// Wire value
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Human-readable name
    pub fn name(self) -> &'static str {
        match self {
            Self::Off => "Off",
            Self::Always => "Always On",
            Self::Spectrum => "Spectrum",
            Self::Breath => "Breath",
            Self::Press => "Press",
            Self::Stars => "Stars",
            Self::Wave => "Wave",
            Self::Surf => "Surf",
            Self::SurfDown => "Surf Down",
            Self::Ripple => "Ripple",
            Self::Fish => "Fish",
            Self::Fountain => "Fountain",
            Self::Traffic => "Traffic",
            Self::Snake => "Snake",
            Self::SurfRepeat => "Surf Repeat",
            Self::SurfCross => "Surf Cross",
            Self::LaserKey => "Laser Key",
            Self::FountainRandom => "Fountain Random",
            Self::Custom => "Custom",
        }
    }
}

/// Last-known or last-commanded LED mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LightState {
    pub direction: u8,
    pub sequence: u8,
    pub speed: u8,
    pub brightness: u8,
}

impl LightState {
    pub fn new(direction: u8, sequence: u8, speed: u8, brightness: u8) -> Self {
        Self {
            direction,
            sequence,
            speed,
            brightness,
        }
    }

    /// Lights off, as written by a reset to defaults
    pub fn off() -> Self {
        Self::new(
            0,
            LightSequence::Off.as_u8(),
            DEFAULT_SPEED,
            DEFAULT_BRIGHTNESS,
        )
    }

    /// Decoded sequence, if the firmware reported a known one
    pub fn sequence_kind(&self) -> Option<LightSequence> {
        LightSequence::from_u8(self.sequence)
    }

    pub fn is_off(&self) -> bool {
        self.sequence == LightSequence::Off.as_u8()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_from_u8() {
        assert_eq!(LightSequence::from_u8(0x02), Some(LightSequence::Always));
        assert_eq!(LightSequence::from_u8(0x13), Some(LightSequence::Custom));
        // 0x01 is not a sequence
        assert_eq!(LightSequence::from_u8(0x01), None);
        assert_eq!(LightSequence::from_u8(0x14), None);
    }

    #[test]
    fn test_off_state() {
        let off = LightState::off();
        assert!(off.is_off());
        assert_eq!(off.speed, 5);
        assert_eq!(off.brightness, 9);
        assert_eq!(off.sequence_kind(), Some(LightSequence::Off));
    }
}
