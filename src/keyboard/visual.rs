//! Text rendering of a keyboard configuration

use super::key_id::{ExternalButton, TOTAL_KEYS};
use super::keymap::action_glyph;
use super::{KeyConfig, KeyId, KeyKind};
use std::fmt::Write;

/// Label shown for keys without actions
pub const PLACEHOLDER: &str = "---";

/// Short label for a key: first action glyph, plus the count when there
/// are several actions. `None` when the key is unconfigured.
pub fn key_label(config: &KeyConfig, key: KeyId) -> Option<String> {
    let actions = config.get(key)?;
    let first = action_glyph(actions.first()?);
    if actions.len() == 1 {
        Some(first)
    } else {
        Some(format!("{}({})", first, actions.len()))
    }
}

/// Renders the 4x4 matrix, external buttons and configured long presses
pub struct MatrixView<'a> {
    config: &'a KeyConfig,
    title: &'a str,
}

impl<'a> MatrixView<'a> {
    pub fn new(config: &'a KeyConfig, title: &'a str) -> Self {
        Self { config, title }
    }

    fn cell(&self, key: KeyId) -> String {
        key_label(self.config, key).unwrap_or_else(|| PLACEHOLDER.to_string())
    }

    pub fn render(&self) -> String {
        let mut out = String::new();

        // `write!` into a String cannot fail
        let _ = writeln!(out, "\n⌨️  {} (4x4):", self.title);
        let _ = writeln!(out, "{}", "=".repeat(40));

        for row in 0..4u8 {
            let mut line = format!("    Row {}: ", row);
            for col in 0..4u8 {
                let _ = write!(line, "[{}] ", self.cell(KeyId::matrix(row, col)));
            }
            let _ = writeln!(out, "{}", line.trim_end());
        }

        let _ = writeln!(out, "\n📱 External Buttons:");
        for button in ExternalButton::all() {
            let key = button.key_id();
            let _ = writeln!(out, "  [{}:{:^12}] {}", key, self.cell(key), button.name());
        }

        let long_presses: Vec<KeyId> = self
            .config
            .iter()
            .map(|(key, _)| *key)
            .filter(|key| matches!(key.kind(), Some(KeyKind::LongPress { .. })))
            .collect();
        if !long_presses.is_empty() {
            let _ = writeln!(out, "\n⏱️  Long Press Keys:");
            for key in long_presses {
                if let Some(KeyKind::LongPress { base }) = key.kind() {
                    let _ = writeln!(
                        out,
                        "  [{}:{:^12}] Long press key {}",
                        key,
                        self.cell(key),
                        base
                    );
                }
            }
        }

        let _ = writeln!(
            out,
            "\n📊 Status: {}/{} keys configured",
            self.config.len(),
            TOTAL_KEYS
        );
        if !self.config.is_empty() {
            let _ = writeln!(out, "📊 Total actions: {}", self.config.total_actions());
        }

        out
    }
}
