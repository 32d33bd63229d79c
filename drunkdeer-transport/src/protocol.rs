//! Protocol constants and framing for DrunkDeer keyboard communication
//!
//! Every report in both directions is a 64-byte frame:
//!
//! ```text
//! [report_id=0x04] [cmd] [62 bytes of command payload, zero-padded]
//! ```
//!
//! The "payload" handed around by the higher layers is everything after the
//! report id, i.e. the command byte followed by its data (at most 63 bytes).

/// Fixed report id carried in byte 0 of every frame
pub const REPORT_ID: u8 = 0x04;

/// Size of one HID frame including the report id
pub const FRAME_SIZE: usize = 64;

/// Largest payload (command byte + data) that fits in a frame
pub const PAYLOAD_SIZE: usize = FRAME_SIZE - 1;

/// HID protocol commands (byte 1 of the frame)
pub mod cmd {
    /// Identity request / response
    pub const IDENTITY: u8 = 0xA0;
    /// LED mode select (and its echo)
    pub const LED_MODE_SELECT: u8 = 0xAE;
    /// Turbo / rapid trigger switch (and its echo)
    pub const TURBO_RT: u8 = 0xB5;
    /// Per-row key modification, distinguished by a sub-command byte
    pub const MODIFY_KEY: u8 = 0xB6;
    /// Key tracking report
    pub const KEY_TRACKING: u8 = 0xB7;

    /// Get human-readable name for command byte
    pub fn name(cmd: u8) -> &'static str {
        match cmd {
            IDENTITY => "IDENTITY",
            LED_MODE_SELECT => "LED_MODE_SELECT",
            TURBO_RT => "TURBO_RT",
            MODIFY_KEY => "MODIFY_KEY",
            KEY_TRACKING => "KEY_TRACKING",
            _ => "UNKNOWN",
        }
    }
}

/// Sub-commands of `cmd::MODIFY_KEY` (byte 1 of the payload)
pub mod modify {
    /// Actuation point per key
    pub const ACTUATION: u8 = 0x01;
    /// Key tracking on/off
    pub const KEY_TRACKING: u8 = 0x03;
    /// Rapid trigger downstroke sensitivity per key
    pub const DOWNSTROKE: u8 = 0x04;
    /// Rapid trigger upstroke sensitivity per key
    pub const UPSTROKE: u8 = 0x05;

    /// Get human-readable name for modify sub-command
    pub fn name(subcmd: u8) -> &'static str {
        match subcmd {
            ACTUATION => "ACTUATION",
            KEY_TRACKING => "KEY_TRACKING",
            DOWNSTROKE => "DOWNSTROKE",
            UPSTROKE => "UPSTROKE",
            _ => "UNKNOWN",
        }
    }
}

/// HID communication timing constants
pub mod timing {
    /// Delay after every write before the next one (ms); the firmware drops
    /// reports that arrive back-to-back
    pub const DEFAULT_DELAY_MS: u64 = 100;
    /// Blocking read timeout (ms) so the reader observes shutdown
    pub const READ_TIMEOUT_MS: i32 = 100;
    /// Max wait when handing a received frame to the decoder (ms)
    pub const HANDOFF_TIMEOUT_MS: u64 = 100;
    /// Max wait for the I/O threads to exit on close (ms)
    pub const CLOSE_TIMEOUT_MS: u64 = 5000;
    /// Tick used while waiting for the identity response (ms)
    pub const IDENTITY_POLL_MS: u64 = 50;
    /// Capacity of the outbound payload queue
    pub const QUEUE_CAPACITY: usize = 10;
}

/// Build an outbound frame from a payload
///
/// Format: `[report_id=0x04] [payload...] [zero padding]`. Payloads longer
/// than [`PAYLOAD_SIZE`] are truncated.
pub fn build_frame(payload: &[u8]) -> [u8; FRAME_SIZE] {
    let mut frame = [0u8; FRAME_SIZE];
    frame[0] = REPORT_ID;
    let len = payload.len().min(PAYLOAD_SIZE);
    frame[1..1 + len].copy_from_slice(&payload[..len]);
    frame
}

/// Strip the report id from a received frame
///
/// Returns `None` for empty frames and frames carrying a different report id.
pub fn strip_report_id(frame: &[u8]) -> Option<&[u8]> {
    match frame.split_first() {
        Some((&REPORT_ID, rest)) => Some(rest),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_frame_pads_to_full_size() {
        let frame = build_frame(&[cmd::IDENTITY, 0x02]);
        assert_eq!(frame.len(), FRAME_SIZE);
        assert_eq!(&frame[..3], &[REPORT_ID, cmd::IDENTITY, 0x02]);
        assert!(frame[3..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_build_frame_truncates_oversized_payload() {
        let payload = vec![0xEE; 100];
        let frame = build_frame(&payload);
        assert_eq!(frame[0], REPORT_ID);
        assert!(frame[1..].iter().all(|&b| b == 0xEE));
    }

    #[test]
    fn test_strip_report_id() {
        assert_eq!(strip_report_id(&[0x04, 0xA0, 0x02]), Some(&[0xA0, 0x02][..]));
        assert_eq!(strip_report_id(&[0x01, 0xA0]), None);
        assert_eq!(strip_report_id(&[]), None);
    }

    #[test]
    fn test_command_names() {
        assert_eq!(cmd::name(cmd::TURBO_RT), "TURBO_RT");
        assert_eq!(cmd::name(0x00), "UNKNOWN");
        assert_eq!(modify::name(modify::UPSTROKE), "UPSTROKE");
    }
}
