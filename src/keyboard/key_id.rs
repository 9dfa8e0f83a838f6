//! Key identifiers for the scanpad matrix and external buttons

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of keys in the 4x4 matrix
pub const MATRIX_KEYS: u16 = 16;
/// Offset added to a matrix key id for its long-press variant
pub const LONG_PRESS_OFFSET: u16 = 100;
/// Total configurable keys: 16 short-press + 4 buttons + 16 long-press
pub const TOTAL_KEYS: usize = 36;

/// External buttons on the scanpad body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalButton {
    ScanDouble,
    ScanLong,
    PowerSingle,
    PowerDouble,
}

impl ExternalButton {
    pub fn all() -> &'static [ExternalButton] {
        &[
            Self::ScanDouble,
            Self::ScanLong,
            Self::PowerSingle,
            Self::PowerDouble,
        ]
    }

    pub fn key_id(&self) -> KeyId {
        match self {
            Self::ScanDouble => KeyId(16),
            Self::ScanLong => KeyId(17),
            Self::PowerSingle => KeyId(18),
            Self::PowerDouble => KeyId(19),
        }
    }

    /// Short name used in the matrix view
    pub fn name(&self) -> &'static str {
        match self {
            Self::ScanDouble => "Scan Double",
            Self::ScanLong => "Scan Long",
            Self::PowerSingle => "Power Single",
            Self::PowerDouble => "Power Double",
        }
    }

    /// Long description used when configuring the button
    pub fn description(&self) -> &'static str {
        match self {
            Self::ScanDouble => "Scan Trigger Double Press",
            Self::ScanLong => "Scan Trigger Long Press",
            Self::PowerSingle => "Power Button Single Press",
            Self::PowerDouble => "Power Button Double Press",
        }
    }
}

/// What physical input a key id refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    /// Short press on the matrix
    Matrix { row: u8, col: u8 },
    /// One of the external buttons
    Button(ExternalButton),
    /// Long press on the matrix key `base`
    LongPress { base: u16 },
}

/// Identifier of a configurable input.
///
/// Serialized as a plain integer, which JSON object keys carry as strings
/// (`"0"`, `"17"`, `"104"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyId(pub u16);

impl KeyId {
    pub fn new(id: u16) -> Option<Self> {
        let key = Self(id);
        key.is_valid().then_some(key)
    }

    pub fn matrix(row: u8, col: u8) -> Self {
        Self(row as u16 * 4 + col as u16)
    }

    pub fn as_u16(&self) -> u16 {
        self.0
    }

    pub fn is_valid(&self) -> bool {
        self.kind().is_some()
    }

    pub fn kind(&self) -> Option<KeyKind> {
        match self.0 {
            n if n < MATRIX_KEYS => Some(KeyKind::Matrix {
                row: (n / 4) as u8,
                col: (n % 4) as u8,
            }),
            16 => Some(KeyKind::Button(ExternalButton::ScanDouble)),
            17 => Some(KeyKind::Button(ExternalButton::ScanLong)),
            18 => Some(KeyKind::Button(ExternalButton::PowerSingle)),
            19 => Some(KeyKind::Button(ExternalButton::PowerDouble)),
            100..=115 => Some(KeyKind::LongPress {
                base: self.0 - LONG_PRESS_OFFSET,
            }),
            _ => None,
        }
    }

    /// Every valid key id in display order
    pub fn all() -> impl Iterator<Item = KeyId> {
        (0..20).chain(100..116).map(KeyId)
    }

    /// Human readable location of the key
    pub fn describe(&self) -> String {
        match self.kind() {
            Some(KeyKind::Matrix { row, col }) => {
                format!("Matrix position: Row {}, Column {}", row, col)
            }
            Some(KeyKind::Button(button)) => format!("External button: {}", button.description()),
            Some(KeyKind::LongPress { base }) => format!(
                "Long press of matrix key {} (Row {}, Column {})",
                base,
                base / 4,
                base % 4
            ),
            None => format!("Unknown key {}", self.0),
        }
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<ExternalButton> for KeyId {
    fn from(button: ExternalButton) -> Self {
        button.key_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_position() {
        assert_eq!(KeyId(6).kind(), Some(KeyKind::Matrix { row: 1, col: 2 }));
        assert_eq!(KeyId::matrix(3, 3), KeyId(15));
    }

    #[test]
    fn buttons_and_long_press() {
        assert_eq!(
            KeyId(18).kind(),
            Some(KeyKind::Button(ExternalButton::PowerSingle))
        );
        assert_eq!(KeyId(107).kind(), Some(KeyKind::LongPress { base: 7 }));
    }

    #[test]
    fn invalid_ids_rejected() {
        for id in [20, 50, 99, 116, 1000] {
            assert!(KeyId::new(id).is_none(), "{} should be invalid", id);
        }
        assert!(KeyId::new(0).is_some());
        assert!(KeyId::new(115).is_some());
    }

    #[test]
    fn all_covers_every_key() {
        let ids: Vec<KeyId> = KeyId::all().collect();
        assert_eq!(ids.len(), TOTAL_KEYS);
        assert!(ids.iter().all(|k| k.is_valid()));
    }

    #[test]
    fn button_ids_roundtrip() {
        for button in ExternalButton::all() {
            assert_eq!(KeyId::from(*button).kind(), Some(KeyKind::Button(*button)));
        }
    }

    #[test]
    fn describe_long_press() {
        assert_eq!(
            KeyId(105).describe(),
            "Long press of matrix key 5 (Row 1, Column 1)"
        );
    }
}
