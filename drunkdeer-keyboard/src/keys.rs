//! Per-key settings mirror

use crate::error::KeyboardError;
use crate::layout::{self, LAYOUT_LEN};
use crate::report::{ModifyKind, DEFAULT_ACTUATION, DEFAULT_STROKE};

/// Last-commanded per-key values, one entry per layout slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerKeyState {
    pub actuations: Vec<u8>,
    pub downstrokes: Vec<u8>,
    pub upstrokes: Vec<u8>,
}

impl Default for PerKeyState {
    fn default() -> Self {
        Self {
            actuations: vec![DEFAULT_ACTUATION; LAYOUT_LEN],
            downstrokes: vec![DEFAULT_STROKE; LAYOUT_LEN],
            upstrokes: vec![DEFAULT_STROKE; LAYOUT_LEN],
        }
    }
}

impl PerKeyState {
    pub fn values(&self, kind: ModifyKind) -> &[u8] {
        match kind {
            ModifyKind::Actuation => &self.actuations,
            ModifyKind::Downstroke => &self.downstrokes,
            ModifyKind::Upstroke => &self.upstrokes,
        }
    }

    /// Replace one array; it must cover the whole layout
    pub fn store(&mut self, kind: ModifyKind, values: &[u8]) -> Result<(), KeyboardError> {
        check_len(values)?;
        let slot = match kind {
            ModifyKind::Actuation => &mut self.actuations,
            ModifyKind::Downstroke => &mut self.downstrokes,
            ModifyKind::Upstroke => &mut self.upstrokes,
        };
        slot.clear();
        slot.extend_from_slice(values);
        Ok(())
    }

    /// Set actuation of named keys, returning how many matched
    pub fn set_actuation_by_names<S: AsRef<str>>(&mut self, names: &[S], value: u8) -> usize {
        let indexes: Vec<usize> = names
            .iter()
            .filter_map(|n| layout::key_index(n.as_ref()))
            .collect();
        self.set_actuation_by_indexes(&indexes, value)
    }

    /// Set actuation of keys by index, returning how many were in range
    pub fn set_actuation_by_indexes(&mut self, indexes: &[usize], value: u8) -> usize {
        let mut count = 0;
        for &i in indexes {
            if let Some(slot) = self.actuations.get_mut(i) {
                *slot = value;
                count += 1;
            }
        }
        count
    }

    pub fn set_all_actuations(&mut self, value: u8) {
        self.actuations.fill(value);
    }
}

/// Validate that a per-key array covers the layout
pub fn check_len(values: &[u8]) -> Result<(), KeyboardError> {
    if values.len() != LAYOUT_LEN {
        return Err(KeyboardError::LengthMismatch {
            expected: LAYOUT_LEN,
            actual: values.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let keys = PerKeyState::default();
        assert_eq!(keys.actuations.len(), LAYOUT_LEN);
        assert!(keys.actuations.iter().all(|&v| v == 0x14));
        assert!(keys.upstrokes.iter().all(|&v| v == 0));
    }

    #[test]
    fn test_store_rejects_wrong_length() {
        let mut keys = PerKeyState::default();
        let err = keys.store(ModifyKind::Downstroke, &[1; 10]).unwrap_err();
        assert!(matches!(
            err,
            KeyboardError::LengthMismatch {
                expected: 126,
                actual: 10
            }
        ));
        assert_eq!(keys, PerKeyState::default());

        keys.store(ModifyKind::Downstroke, &[3; LAYOUT_LEN]).unwrap();
        assert_eq!(keys.values(ModifyKind::Downstroke), &[3; LAYOUT_LEN][..]);
    }

    #[test]
    fn test_modify_by_names_skips_unknown() {
        let mut keys = PerKeyState::default();
        let n = keys.set_actuation_by_names(&["W", "a", "NOPE"], 5);
        assert_eq!(n, 2);
        assert_eq!(keys.actuations[44], 5);
        assert_eq!(keys.actuations[64], 5);
        assert_eq!(keys.actuations[0], 0x14);
    }

    #[test]
    fn test_modify_by_indexes_skips_out_of_range() {
        let mut keys = PerKeyState::default();
        assert_eq!(keys.set_actuation_by_indexes(&[0, 125, 126, 999], 9), 2);
        assert_eq!(keys.actuations[125], 9);
        keys.set_all_actuations(30);
        assert!(keys.actuations.iter().all(|&v| v == 30));
    }
}
