//! Key layout table
//!
//! The firmware addresses keys by a linear index over 6 physical rows of 21
//! slots each. Per-key settings are uploaded in "modify rows" of 59 values,
//! so the 126 indexes split into two full rows and a short third row of 8.
//! Empty names mark slots without a switch.

/// Number of slots in the layout (length of every per-key array)
pub const LAYOUT_LEN: usize = 126;

/// Values carried by a full modify row
pub const KEYS_PER_ROW: usize = 59;

/// Index of the short trailing modify row
pub const SHORT_ROW: u8 = 2;

/// Values carried by the short modify row
pub const SHORT_ROW_KEYS: usize = LAYOUT_LEN - 2 * KEYS_PER_ROW;

/// Number of modify rows covering the layout
pub const ROW_COUNT: usize = 3;

/// Key names indexed by linear position
#[rustfmt::skip]
pub static KEY_LAYOUT: [&str; LAYOUT_LEN] = [
    // Row 0 (0-20)
    "ESC", "", "F1", "F2", "F3", "F4", "F5", "F6", "F7", "F8", "F9", "F10", "F11", "F12",
    "KP7", "KP8", "KP9", "", "", "", "",
    // Row 1 (21-41)
    "TILDE", "1", "2", "3", "4", "5", "6", "7", "8", "9", "0", "MINUS", "PLUS", "BACK",
    "KP4", "KP5", "KP6", "", "", "", "",
    // Row 2 (42-62)
    "TAB", "Q", "W", "E", "R", "T", "Y", "U", "I", "O", "P", "BRKTS_L", "BRKTS_R", "SLASH_K29",
    "KP1", "KP2", "KP3", "", "", "", "",
    // Row 3 (63-83)
    "CAPS", "A", "S", "D", "F", "G", "H", "J", "K", "L", "COLON", "QOTATN", "", "RETURN",
    "", "KP0", "KP_DEL", "", "", "", "",
    // Row 4 (84-104)
    "SHF_L", "EUR_K45", "Z", "X", "C", "V", "B", "N", "M", "COMMA", "PERIOD", "SLASH", "", "SHF_R",
    "ARR_UP", "", "NUMS", "", "", "", "",
    // Row 5 (105-125)
    "CTRL_L", "WIN_L", "ALT_L", "", "", "", "SPACE", "", "", "", "ALT_R", "FN1", "APP", "ARR_L",
    "ARR_DW", "ARR_R", "CTRL_R", "", "", "", "",
];

/// W, A, S, D
pub const WASD_KEYS: [usize; 4] = [44, 64, 65, 66];

/// Number row 1-0
pub const NUMERAL_KEYS: [usize; 10] = [22, 23, 24, 25, 26, 27, 28, 29, 30, 31];

/// Letter keys
pub const CHARACTER_KEYS: [usize; 26] = [
    43, 44, 45, 46, 47, 48, 49, 50, 51, 52, //
    64, 65, 66, 67, 68, 69, 70, 71, 72, //
    86, 87, 88, 89, 90, 91, 92,
];

/// Get key name from linear index
///
/// Returns `None` for out-of-range indexes and unused slots.
pub fn key_name(index: usize) -> Option<&'static str> {
    KEY_LAYOUT
        .get(index)
        .copied()
        .filter(|name| !name.is_empty())
}

/// Look up linear index from key name (case-insensitive)
pub fn key_index(name: &str) -> Option<usize> {
    if name.is_empty() {
        return None;
    }
    KEY_LAYOUT
        .iter()
        .position(|n| n.eq_ignore_ascii_case(name))
}

/// Modify row that carries the value for `index`
pub fn row_of(index: usize) -> Option<u8> {
    (index < LAYOUT_LEN).then(|| (index / KEYS_PER_ROW) as u8)
}

/// Number of key values a modify row carries
pub fn row_len(row: u8) -> usize {
    if row == SHORT_ROW {
        SHORT_ROW_KEYS
    } else {
        KEYS_PER_ROW
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_is_covered_by_rows() {
        let covered: usize = (0..ROW_COUNT as u8).map(row_len).sum();
        assert_eq!(covered, LAYOUT_LEN);
        assert_eq!(SHORT_ROW_KEYS, 8);
    }

    #[test]
    fn test_key_lookup() {
        assert_eq!(key_index("ESC"), Some(0));
        assert_eq!(key_index("w"), Some(44));
        assert_eq!(key_index("CTRL_R"), Some(121));
        assert_eq!(key_index("NOPE"), None);
        assert_eq!(key_index(""), None);
    }

    #[test]
    fn test_key_name() {
        assert_eq!(key_name(0), Some("ESC"));
        assert_eq!(key_name(1), None); // unused slot
        assert_eq!(key_name(LAYOUT_LEN), None);
    }

    #[test]
    fn test_row_of() {
        assert_eq!(row_of(0), Some(0));
        assert_eq!(row_of(58), Some(0));
        assert_eq!(row_of(59), Some(1));
        assert_eq!(row_of(118), Some(2));
        assert_eq!(row_of(125), Some(2));
        assert_eq!(row_of(126), None);
    }

    #[test]
    fn test_key_groups_name_expected_keys() {
        let wasd: Vec<_> = WASD_KEYS.iter().filter_map(|&i| key_name(i)).collect();
        assert_eq!(wasd, ["W", "A", "S", "D"]);
        assert_eq!(key_name(NUMERAL_KEYS[0]), Some("1"));
        assert_eq!(key_name(NUMERAL_KEYS[9]), Some("0"));
        assert!(CHARACTER_KEYS
            .iter()
            .all(|&i| key_name(i).is_some_and(|n| n.len() == 1)));
    }
}
