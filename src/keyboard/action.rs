//! Input actions assigned to keys

use crate::error::ActionError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum UTF-8 length of a text action payload
pub const MAX_TEXT_BYTES: usize = 8;
/// Maximum number of actions on a single key
pub const MAX_ACTIONS_PER_KEY: usize = 10;
/// Delay applied when the operator doesn't give one
pub const DEFAULT_DELAY_MS: u16 = 10;
/// Highest valid modifier bitmask (CTRL | SHIFT | ALT | GUI)
pub const MAX_MODIFIER: u8 = 0x0F;

/// Modifier bits for HID actions
pub mod modifier {
    pub const NONE: u8 = 0;
    pub const CTRL: u8 = 1;
    pub const SHIFT: u8 = 2;
    pub const ALT: u8 = 4;
    pub const GUI: u8 = 8;

    /// Names of the set bits, e.g. `["CTRL", "SHIFT"]`
    pub fn names(mask: u8) -> Vec<&'static str> {
        [(CTRL, "CTRL"), (SHIFT, "SHIFT"), (ALT, "ALT"), (GUI, "GUI")]
            .iter()
            .filter(|(bit, _)| mask & bit != 0)
            .map(|(_, name)| *name)
            .collect()
    }
}

/// One atomic input event sent by the device when a key triggers.
///
/// The serialized shape matches the device JSON format:
/// `{"type":"text","value":"A","delay":10}`,
/// `{"type":"hid","keycode":40,"modifier":0,"delay":10}`,
/// `{"type":"consumer","consumer_code":205,"delay":10}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Action {
    Text {
        value: String,
        delay: u16,
    },
    Hid {
        keycode: u8,
        #[serde(default)]
        modifier: u8,
        delay: u16,
    },
    Consumer {
        consumer_code: u16,
        delay: u16,
    },
}

impl Action {
    /// Text action, rejecting empty or oversized payloads
    pub fn text(value: impl Into<String>, delay: u16) -> Result<Self, ActionError> {
        let value = value.into();
        check_text(&value)?;
        Ok(Self::Text { value, delay })
    }

    pub fn hid(keycode: u8, modifier: u8, delay: u16) -> Result<Self, ActionError> {
        if modifier > MAX_MODIFIER {
            return Err(ActionError::InvalidModifier(modifier));
        }
        Ok(Self::Hid {
            keycode,
            modifier,
            delay,
        })
    }

    pub fn consumer(consumer_code: u16, delay: u16) -> Self {
        Self::Consumer {
            consumer_code,
            delay,
        }
    }

    /// Re-check the invariants of an action that didn't come from a constructor
    pub fn validate(&self) -> Result<(), ActionError> {
        match self {
            Self::Text { value, .. } => check_text(value),
            Self::Hid { modifier, .. } if *modifier > MAX_MODIFIER => {
                Err(ActionError::InvalidModifier(*modifier))
            }
            _ => Ok(()),
        }
    }

    /// One-line description used in listings
    pub fn summary(&self) -> String {
        match self {
            Self::Text { value, .. } => format!("Text: '{}'", value),
            Self::Hid {
                keycode, modifier, ..
            } => {
                let mods = modifier::names(*modifier);
                if mods.is_empty() {
                    format!("HID: keycode {}", keycode)
                } else {
                    format!("HID: keycode {} ({})", keycode, mods.join("+"))
                }
            }
            Self::Consumer { consumer_code, .. } => format!("Consumer: code {}", consumer_code),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

fn check_text(value: &str) -> Result<(), ActionError> {
    if value.is_empty() {
        return Err(ActionError::EmptyText);
    }
    if value.len() > MAX_TEXT_BYTES {
        return Err(ActionError::TextTooLong(value.len()));
    }
    Ok(())
}
