//! Outbound report encoders
//!
//! Pure functions producing command payloads (command byte first, no report
//! id). The writer thread adds the report id and pads to a full frame.

use drunkdeer_transport::protocol::{cmd, modify};
use drunkdeer_transport::PAYLOAD_SIZE;

use crate::layout::row_len;
use crate::light::LightState;

/// Default actuation point (2.0 mm)
pub const DEFAULT_ACTUATION: u8 = 0x14;

/// Default rapid trigger stroke sensitivity (firmware default)
pub const DEFAULT_STROKE: u8 = 0x00;

/// Modify-row header: cmd, sub-command, reserved, row
const MODIFY_HEADER_LEN: usize = 4;

/// Per-key value kinds uploaded through modify rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifyKind {
    Actuation,
    Downstroke,
    Upstroke,
}

impl ModifyKind {
    pub const ALL: [ModifyKind; 3] = [Self::Actuation, Self::Downstroke, Self::Upstroke];

    /// Sub-command byte
    pub fn subcommand(self) -> u8 {
        match self {
            Self::Actuation => modify::ACTUATION,
            Self::Downstroke => modify::DOWNSTROKE,
            Self::Upstroke => modify::UPSTROKE,
        }
    }

    /// Value used to pad rows shorter than the firmware expects
    pub fn fill(self) -> u8 {
        match self {
            Self::Actuation => DEFAULT_ACTUATION,
            Self::Downstroke | Self::Upstroke => DEFAULT_STROKE,
        }
    }

    pub fn name(self) -> &'static str {
        modify::name(self.subcommand())
    }
}

/// Identity request
pub fn build_identity_request() -> [u8; 2] {
    [cmd::IDENTITY, 0x02]
}

/// LED mode select
///
/// Format: `[0xAE, 0x01, turbo, direction, sequence, speed, brightness, color]`
pub fn build_light_mode(light: LightState, color: u8, turbo: bool) -> [u8; 8] {
    [
        cmd::LED_MODE_SELECT,
        0x01,
        turbo as u8,
        light.direction,
        light.sequence,
        light.speed,
        light.brightness,
        color,
    ]
}

/// Turbo / rapid trigger switch
pub fn build_rapid_trigger_turbo(rapid_trigger: bool, turbo: bool) -> [u8; PAYLOAD_SIZE] {
    let mut buf = [0u8; PAYLOAD_SIZE];
    buf[..9].copy_from_slice(&[
        cmd::TURBO_RT,
        0x00,
        0x1E,
        0x01,
        0x00,
        0x00,
        0x01,
        turbo as u8,
        rapid_trigger as u8,
    ]);
    buf
}

/// One row of per-key values
///
/// The row always carries exactly [`row_len`] values: shorter input is
/// right-padded with `fill`, longer input is truncated. Bytes past the
/// values stay zero.
pub fn build_modify_row(row: u8, values: &[u8], fill: u8, subcommand: u8) -> [u8; PAYLOAD_SIZE] {
    let mut buf = [0u8; PAYLOAD_SIZE];
    buf[..MODIFY_HEADER_LEN].copy_from_slice(&[cmd::MODIFY_KEY, subcommand, 0x00, row]);

    let count = row_len(row);
    let slots = &mut buf[MODIFY_HEADER_LEN..MODIFY_HEADER_LEN + count];
    let used = values.len().min(count);
    slots[..used].copy_from_slice(&values[..used]);
    slots[used..].fill(fill);
    buf
}

/// [`build_modify_row`] with the sub-command and fill of `kind`
pub fn build_modify_row_for(kind: ModifyKind, row: u8, values: &[u8]) -> [u8; PAYLOAD_SIZE] {
    build_modify_row(row, values, kind.fill(), kind.subcommand())
}

/// Key tracking on/off
pub fn build_key_tracking(enabled: bool) -> [u8; PAYLOAD_SIZE] {
    let mut buf = [0u8; PAYLOAD_SIZE];
    buf[..3].copy_from_slice(&[cmd::MODIFY_KEY, modify::KEY_TRACKING, enabled as u8]);
    buf
}

/// Convert millimetres to the firmware's 0.1 mm units
///
/// Truncates, then clamps to `1..=255`. Zero, negative and NaN map to 1.
pub fn mm_to_byte(mm: f32) -> u8 {
    let tenths = mm * 10.0;
    if tenths.is_nan() || tenths < 1.0 {
        return 1;
    }
    // `as` saturates for out-of-range floats
    (tenths as u32).clamp(1, 255) as u8
}
