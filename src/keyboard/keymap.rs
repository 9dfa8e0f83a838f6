//! HID and consumer code tables and short display glyphs for actions

use super::Action;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Common USB HID keyboard usage codes
pub mod hid {
    pub const A: u8 = 4;
    pub const Z: u8 = 29;
    pub const DIGIT_1: u8 = 30;
    pub const DIGIT_9: u8 = 38;
    pub const DIGIT_0: u8 = 39;
    pub const ENTER: u8 = 40;
    pub const ESCAPE: u8 = 41;
    pub const BACKSPACE: u8 = 42;
    pub const TAB: u8 = 43;
    pub const SPACE: u8 = 44;
    pub const F1: u8 = 58;
    pub const F12: u8 = 69;
    pub const DELETE: u8 = 76;
    pub const RIGHT: u8 = 79;
    pub const LEFT: u8 = 80;
    pub const DOWN: u8 = 81;
    pub const UP: u8 = 82;
}

/// Common USB HID consumer control usage codes
pub mod consumer {
    pub const NEXT: u16 = 181;
    pub const PREVIOUS: u16 = 182;
    pub const STOP: u16 = 183;
    pub const PLAY_PAUSE: u16 = 205;
    pub const MUTE: u16 = 226;
    pub const VOLUME_UP: u16 = 233;
    pub const VOLUME_DOWN: u16 = 234;
}

/// Glyphs for HID keys that don't map to a letter or digit
pub static HID_GLYPHS: LazyLock<HashMap<u8, &'static str>> = LazyLock::new(|| {
    let mut map = HashMap::new();
    map.insert(hid::ENTER, "↵");
    map.insert(hid::BACKSPACE, "⌫");
    map.insert(hid::TAB, "⇥");
    map.insert(hid::SPACE, "␣");
    map.insert(hid::RIGHT, "→");
    map.insert(hid::LEFT, "←");
    map.insert(hid::DOWN, "↓");
    map.insert(hid::UP, "↑");
    map.insert(hid::DELETE, "⌦");
    map.insert(hid::ESCAPE, "⎋");
    map
});

/// Glyphs for media keys
pub static CONSUMER_GLYPHS: LazyLock<HashMap<u16, &'static str>> = LazyLock::new(|| {
    let mut map = HashMap::new();
    map.insert(consumer::PLAY_PAUSE, "⏯");
    map.insert(consumer::VOLUME_UP, "🔊");
    map.insert(consumer::VOLUME_DOWN, "🔉");
    map.insert(consumer::MUTE, "🔇");
    map.insert(consumer::NEXT, "⏭");
    map.insert(consumer::PREVIOUS, "⏮");
    map.insert(consumer::STOP, "⏹");
    map
});

/// Short label for a HID keycode
pub fn hid_glyph(keycode: u8) -> String {
    if let Some(glyph) = HID_GLYPHS.get(&keycode) {
        return glyph.to_string();
    }
    match keycode {
        hid::A..=hid::Z => char::from(b'A' + (keycode - hid::A)).to_string(),
        hid::DIGIT_1..=hid::DIGIT_9 => (keycode - hid::DIGIT_1 + 1).to_string(),
        hid::DIGIT_0 => "0".to_string(),
        _ => format!("K{}", keycode),
    }
}

/// Short label for a consumer control code
pub fn consumer_glyph(code: u16) -> String {
    CONSUMER_GLYPHS
        .get(&code)
        .map(|glyph| glyph.to_string())
        .unwrap_or_else(|| format!("C{}", code))
}

/// Short label for an action, never empty
pub fn action_glyph(action: &Action) -> String {
    match action {
        Action::Text { value, .. } => {
            let len = value.chars().count();
            if len == 0 {
                "\"\"".to_string()
            } else if len <= 3 {
                value.clone()
            } else {
                let head: String = value.chars().take(2).collect();
                format!("{}…", head)
            }
        }
        Action::Hid { keycode, .. } => hid_glyph(*keycode),
        Action::Consumer { consumer_code, .. } => consumer_glyph(*consumer_code),
    }
}
