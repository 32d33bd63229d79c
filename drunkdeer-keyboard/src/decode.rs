//! Inbound report decoding
//!
//! Offsets are relative to the data that follows the command byte.

use drunkdeer_transport::protocol::{self, cmd};
use tracing::{debug, warn};

use crate::light::LightState;
use crate::model::{detect_model, format_firmware_version, DeviceIdentity};

/// One received report with the report id stripped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundPacket {
    pub cmd: u8,
    pub data: Vec<u8>,
}

impl InboundPacket {
    /// Parse the bytes of one received frame
    ///
    /// Returns `None` for frames with another report id or no command byte.
    pub fn from_frame(frame: &[u8]) -> Option<Self> {
        let (&cmd, data) = protocol::strip_report_id(frame)?.split_first()?;
        Some(Self {
            cmd,
            data: data.to_vec(),
        })
    }
}

/// Decoded meaning of an inbound report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Identity(DeviceIdentity),
    Light(LightState),
    TurboRt { turbo: bool, rapid_trigger: bool },
    /// Echo of a modify-row write
    KeyModify,
    KeyTracking,
    /// Known command that was malformed or rejected
    Ignored,
    Unknown(u8),
}

const IDENTITY_MARKER: u8 = 0x02;
const IDENTITY_MIN_LEN: usize = 16;
const LIGHT_MIN_LEN: usize = 6;
const TURBO_RT_MIN_LEN: usize = 8;

/// Decode one packet
pub fn decode(packet: &InboundPacket) -> Response {
    let data = packet.data.as_slice();
    let decoded = match packet.cmd {
        cmd::IDENTITY => decode_identity(data).map(Response::Identity),
        cmd::LED_MODE_SELECT => decode_light(data).map(Response::Light),
        cmd::TURBO_RT => decode_turbo_rt(data).map(|(turbo, rapid_trigger)| Response::TurboRt {
            turbo,
            rapid_trigger,
        }),
        cmd::MODIFY_KEY => Some(Response::KeyModify),
        cmd::KEY_TRACKING => Some(Response::KeyTracking),
        other => Some(Response::Unknown(other)),
    };
    decoded.unwrap_or(Response::Ignored)
}

/// Decode an identity response
///
/// Returns `None` when the frame is too short or the sentinel byte is set.
pub fn decode_identity(data: &[u8]) -> Option<DeviceIdentity> {
    if data.len() < IDENTITY_MIN_LEN {
        warn!("Identity response too short ({} bytes)", data.len());
        return None;
    }
    if data[0] != IDENTITY_MARKER {
        warn!("Identity response marker {:#04x}, expected 0x02", data[0]);
    }
    if data[1] != 0x00 {
        warn!("Identity response sentinel {:#04x}, ignoring", data[1]);
        return None;
    }

    let signature = &data[3..6];
    let version = u16::from_le_bytes([data[6], data[7]]);
    let model = detect_model(signature);
    debug!(
        "Identity: signature {:02x?} -> {} ({}), firmware {}",
        signature, model.name, model.kind, version
    );

    Some(DeviceIdentity {
        model,
        firmware_version: format_firmware_version(version),
        turbo: data[14] != 0,
        rapid_trigger: data[15] != 0,
    })
}

/// Decode a LED mode echo
pub fn decode_light(data: &[u8]) -> Option<LightState> {
    if data.len() < LIGHT_MIN_LEN {
        warn!("Light mode response too short ({} bytes)", data.len());
        return None;
    }
    Some(LightState::new(data[2], data[3], data[4], data[5]))
}

/// Decode a turbo / rapid trigger echo as `(turbo, rapid_trigger)`
pub fn decode_turbo_rt(data: &[u8]) -> Option<(bool, bool)> {
    if data.len() < TURBO_RT_MIN_LEN {
        warn!("Turbo/RT response too short ({} bytes)", data.len());
        return None;
    }
    Some((data[6] != 0, data[7] != 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::KeyboardModel;
    use crate::report::{build_light_mode, build_rapid_trigger_turbo};
    use drunkdeer_transport::protocol::build_frame;

    fn identity_frame(signature: [u8; 3], version: u16, turbo: u8, rt: u8) -> [u8; 64] {
        let mut payload = [0u8; 17];
        payload[0] = cmd::IDENTITY;
        payload[1] = 0x02;
        payload[4..7].copy_from_slice(&signature);
        payload[7..9].copy_from_slice(&version.to_le_bytes());
        payload[15] = turbo;
        payload[16] = rt;
        build_frame(&payload)
    }

    #[test]
    fn test_from_frame_filters_report_id() {
        let frame = build_frame(&[cmd::TURBO_RT, 1, 2]);
        let packet = InboundPacket::from_frame(&frame).unwrap();
        assert_eq!(packet.cmd, cmd::TURBO_RT);
        assert_eq!(&packet.data[..2], &[1, 2]);
        assert_eq!(packet.data.len(), 62);

        let mut other = frame;
        other[0] = 0x01;
        assert!(InboundPacket::from_frame(&other).is_none());
        assert!(InboundPacket::from_frame(&[0x04]).is_none());
    }

    #[test]
    fn test_identity_decode() {
        let frame = identity_frame([0x0b, 0x04, 0x05], 113, 1, 0);
        let packet = InboundPacket::from_frame(&frame).unwrap();
        let Response::Identity(id) = decode(&packet) else {
            panic!("expected identity");
        };
        assert_eq!(id.model, KeyboardModel::G75);
        assert_eq!(id.model_type(), 754);
        assert_eq!(id.firmware_version, "0.0113");
        assert!(id.turbo);
        assert!(!id.rapid_trigger);
    }

    #[test]
    fn test_identity_version_is_little_endian() {
        let frame = identity_frame([0x0b, 0x01, 0x01], 0x0102, 0, 0);
        let packet = InboundPacket::from_frame(&frame).unwrap();
        let id = decode_identity(&packet.data).unwrap();
        assert_eq!(id.firmware_version, "0.0258");
    }

    #[test]
    fn test_identity_unknown_signature_defaults() {
        let frame = identity_frame([0xFF, 0xFF, 0xFF], 1, 0, 0);
        let packet = InboundPacket::from_frame(&frame).unwrap();
        let id = decode_identity(&packet.data).unwrap();
        assert_eq!(id.model_name(), "A75");
        assert_eq!(id.model_type(), 75);
    }

    #[test]
    fn test_identity_sentinel_rejects() {
        let mut frame = identity_frame([0x0b, 0x01, 0x01], 1, 0, 0);
        frame[3] = 0x01;
        let packet = InboundPacket::from_frame(&frame).unwrap();
        assert_eq!(decode(&packet), Response::Ignored);
    }

    #[test]
    fn test_short_frames_are_ignored() {
        for cmd in [cmd::IDENTITY, cmd::LED_MODE_SELECT, cmd::TURBO_RT] {
            let packet = InboundPacket {
                cmd,
                data: vec![0x02, 0x00, 0x00],
            };
            assert_eq!(decode(&packet), Response::Ignored);
        }
    }

    #[test]
    fn test_light_round_trip() {
        let light = LightState::new(0, 2, 5, 9);
        let frame = build_frame(&build_light_mode(light, 0xFF, false));
        let packet = InboundPacket::from_frame(&frame).unwrap();
        assert_eq!(decode(&packet), Response::Light(light));
    }

    #[test]
    fn test_turbo_rt_round_trip() {
        let frame = build_frame(&build_rapid_trigger_turbo(true, false));
        let packet = InboundPacket::from_frame(&frame).unwrap();
        assert_eq!(
            decode(&packet),
            Response::TurboRt {
                turbo: false,
                rapid_trigger: true
            }
        );
    }

    #[test]
    fn test_other_commands() {
        let packet = InboundPacket {
            cmd: cmd::MODIFY_KEY,
            data: vec![],
        };
        assert_eq!(decode(&packet), Response::KeyModify);
        let packet = InboundPacket {
            cmd: 0x42,
            data: vec![],
        };
        assert_eq!(decode(&packet), Response::Unknown(0x42));
    }
}
