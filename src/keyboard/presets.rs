//! Layout presets for the 4x4 matrix
//!
//! Each preset is a fixed table of key ids to single actions. Applying a
//! preset overwrites the keys it names and leaves every other key alone.

use super::action::DEFAULT_DELAY_MS;
use super::keymap::hid;
use super::{Action, KeyConfig, KeyId};

/// A preset slot: either typed text or a HID keycode
#[derive(Debug, Clone, Copy)]
enum Slot {
    Text(&'static str),
    Hid(u8),
}

impl Slot {
    fn to_action(self) -> Action {
        match self {
            Slot::Text(value) => Action::Text {
                value: value.to_string(),
                delay: DEFAULT_DELAY_MS,
            },
            Slot::Hid(keycode) => Action::Hid {
                keycode,
                modifier: 0,
                delay: DEFAULT_DELAY_MS,
            },
        }
    }
}

use Slot::{Hid, Text};

#[rustfmt::skip]
const STANDARD: [Slot; 16] = [
    Text("1"), Text("2"), Text("3"), Text("A"),
    Text("4"), Text("5"), Text("6"), Text("B"),
    Text("7"), Text("8"), Text("9"), Text("C"),
    Hid(hid::LEFT), Text("0"), Hid(hid::RIGHT), Text("D"),
];

#[rustfmt::skip]
const ALPHABETIC: [Slot; 16] = [
    Text("A"), Text("B"), Text("C"), Text("D"),
    Text("E"), Text("F"), Text("G"), Text("H"),
    Text("I"), Text("J"), Text("K"), Text("L"),
    Text("M"), Text("N"), Text("O"), Text("P"),
];

#[rustfmt::skip]
const NUMERIC: [Slot; 10] = [
    Text("0"), Text("1"), Text("2"), Text("3"), Text("4"),
    Text("5"), Text("6"), Text("7"), Text("8"), Text("9"),
];

#[rustfmt::skip]
const NUMPAD: [Slot; 16] = [
    Text("1"), Text("2"), Text("3"), Text("+"),
    Text("4"), Text("5"), Text("6"), Text("-"),
    Text("7"), Text("8"), Text("9"), Text("*"),
    Text("."), Text("0"), Text("="), Hid(hid::ENTER),
];

#[rustfmt::skip]
const FUNCTION_KEYS: [Slot; 12] = [
    Hid(58), Hid(59), Hid(60), Hid(61),
    Hid(62), Hid(63), Hid(64), Hid(65),
    Hid(66), Hid(67), Hid(68), Hid(69),
];

/// Available layout presets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Standard,
    Alphabetic,
    Numeric,
    Numpad,
    FunctionKeys,
}

impl Preset {
    pub fn all() -> &'static [Preset] {
        &[
            Self::Standard,
            Self::Alphabetic,
            Self::Numeric,
            Self::Numpad,
            Self::FunctionKeys,
        ]
    }

    /// Heading printed before the preset is applied
    pub fn title(&self) -> &'static str {
        match self {
            Self::Standard => "🎹 STANDARD LAYOUT",
            Self::Alphabetic => "🔤 ALPHABETIC LAYOUT",
            Self::Numeric => "🔢 NUMERIC LAYOUT",
            Self::Numpad => "🧮 CALCULATOR NUMPAD",
            Self::FunctionKeys => "🔧 FUNCTION KEYS PRESET",
        }
    }

    /// Label in the presets menu
    pub fn menu_label(&self) -> &'static str {
        match self {
            Self::Standard => "🎹 Standard layout (1-9, A-D, arrows)",
            Self::Alphabetic => "🔤 Alphabetic layout (A-P)",
            Self::Numeric => "🔢 Numeric layout (0-9)",
            Self::Numpad => "🧮 Calculator numpad",
            Self::FunctionKeys => "🔧 Function keys (F1-F12)",
        }
    }

    /// Lines describing what the preset will write
    pub fn description(&self) -> &'static [&'static str] {
        match self {
            Self::Standard => &[
                "This will add/replace:",
                "  Row 0: [1] [2] [3] [A]",
                "  Row 1: [4] [5] [6] [B]",
                "  Row 2: [7] [8] [9] [C]",
                "  Row 3: [←] [0] [→] [D]",
            ],
            Self::Alphabetic => &["This will add/replace keys 0-15 with letters A-P"],
            Self::Numeric => &["This will add/replace first 10 keys with numbers 0-9"],
            Self::Numpad => &[
                "This will create a calculator-style layout:",
                "  [1] [2] [3] [+]",
                "  [4] [5] [6] [-]",
                "  [7] [8] [9] [*]",
                "  [.] [0] [=] [↵]",
            ],
            Self::FunctionKeys => &[
                "This will assign F1-F12 to keys 0-11 (top 3 rows)",
                "⚠️  Keys 12-15 will remain unchanged",
            ],
        }
    }

    /// Confirmation question
    pub fn prompt(&self) -> &'static str {
        match self {
            Self::Standard => "Add standard layout?",
            Self::Alphabetic => "Add alphabetic layout?",
            Self::Numeric => "Add numeric layout?",
            Self::Numpad => "Apply numpad preset?",
            Self::FunctionKeys => "Apply function keys preset?",
        }
    }

    /// Message printed once the preset is written
    pub fn applied_message(&self) -> &'static str {
        match self {
            Self::Standard => "Standard layout applied (16 keys)",
            Self::Alphabetic => "Alphabetic layout applied (A-P)",
            Self::Numeric => "Numeric layout applied (0-9)",
            Self::Numpad => "Calculator numpad preset applied",
            Self::FunctionKeys => "Function keys preset applied (F1-F12 on keys 0-11)",
        }
    }

    fn slots(&self) -> &'static [Slot] {
        match self {
            Self::Standard => &STANDARD,
            Self::Alphabetic => &ALPHABETIC,
            Self::Numeric => &NUMERIC,
            Self::Numpad => &NUMPAD,
            Self::FunctionKeys => &FUNCTION_KEYS,
        }
    }

    /// Key assignments written by this preset, starting at key 0
    pub fn layout(&self) -> Vec<(KeyId, Action)> {
        self.slots()
            .iter()
            .enumerate()
            .map(|(i, slot)| (KeyId(i as u16), slot.to_action()))
            .collect()
    }

    /// Write the preset into `config`, returning the number of keys written
    pub fn apply(&self, config: &mut KeyConfig) -> usize {
        let layout = self.layout();
        let count = layout.len();
        for (key, action) in layout {
            config.set(key, vec![action]);
        }
        count
    }
}
