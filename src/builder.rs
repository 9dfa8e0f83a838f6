//! Interactive keyboard configuration builder
//!
//! The builder owns one [`KeyConfig`] per session. Nested menus mutate it in
//! place (single keys, presets, clearing) until the operator finishes, which
//! optionally exports the mapping as JSON or QR images, or cancels, which
//! discards every edit.

use crate::config::Config;
use crate::error::UiError;
use crate::export::{json_file_name, qr_file_name, QrArtifact, QrGenerator};
use crate::keyboard::action::{
    modifier, DEFAULT_DELAY_MS, MAX_ACTIONS_PER_KEY, MAX_MODIFIER, MAX_TEXT_BYTES,
};
use crate::keyboard::{Action, ConfigDocument, KeyConfig, KeyId, MatrixView, Preset};
use crate::ui::Console;
use crate::utils::{document_timestamp, file_timestamp};
use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

const ACTION_TYPES: [&str; 4] = ["Text", "HID Key", "Consumer Key", "Finish"];

/// Session-wide builder settings
#[derive(Debug, Clone)]
pub struct BuilderOptions {
    /// Apply presets without asking for confirmation
    pub silent_presets: bool,
    /// Directory receiving JSON and QR exports
    pub output_dir: PathBuf,
}

impl Default for BuilderOptions {
    fn default() -> Self {
        Self {
            silent_presets: false,
            output_dir: PathBuf::from("output"),
        }
    }
}

impl From<&Config> for BuilderOptions {
    fn from(config: &Config) -> Self {
        Self {
            silent_presets: config.builder.silent_presets,
            output_dir: config.paths.output_dir.clone(),
        }
    }
}

/// Keyboard configuration builder with presets, per-key editing and export
pub struct KeyboardConfigBuilder {
    options: BuilderOptions,
    qr_generator: Option<Box<dyn QrGenerator>>,
    qr_unavailable_reported: bool,
}

impl KeyboardConfigBuilder {
    pub fn new(options: BuilderOptions) -> Self {
        Self {
            options,
            qr_generator: None,
            qr_unavailable_reported: false,
        }
    }

    /// Enable QR export through `generator`
    pub fn with_qr_generator(mut self, generator: Box<dyn QrGenerator>) -> Self {
        self.qr_generator = Some(generator);
        self
    }

    pub fn qr_available(&self) -> bool {
        self.qr_generator.is_some()
    }

    // ----------------------------------------------------------------
    // Display
    // ----------------------------------------------------------------

    pub fn display_keyboard_matrix<R: BufRead, W: Write>(
        &self,
        console: &mut Console<R, W>,
        config: &KeyConfig,
        title: &str,
    ) {
        console.line(MatrixView::new(config, title).render().trim_end());
    }

    fn print_actions<R: BufRead, W: Write>(console: &mut Console<R, W>, actions: &[Action]) {
        for (i, action) in actions.iter().enumerate() {
            console.line(format!("  {}. {}", i + 1, action.summary()));
        }
    }

    // ----------------------------------------------------------------
    // Presets
    // ----------------------------------------------------------------

    /// Announce `preset`, confirm unless presets are silent, then write it.
    ///
    /// Returns the number of keys written (0 when declined).
    pub fn apply_preset<R: BufRead, W: Write>(
        &self,
        console: &mut Console<R, W>,
        preset: Preset,
        config: &mut KeyConfig,
    ) -> Result<usize, UiError> {
        console.line("");
        console.heading(preset.title());
        for line in preset.description() {
            console.line(line);
        }

        if !self.options.silent_presets && !console.confirm(preset.prompt())? {
            return Ok(0);
        }

        let written = preset.apply(config);
        log::debug!("preset {:?} wrote {} keys", preset, written);
        console.success(preset.applied_message());
        Ok(written)
    }

    fn layout_presets_menu<R: BufRead, W: Write>(
        &self,
        console: &mut Console<R, W>,
        config: &mut KeyConfig,
    ) -> Result<(), UiError> {
        let presets = Preset::all();
        let clear_choice = presets.len() + 1;

        loop {
            console.line("");
            console.heading("🎨 LAYOUT PRESETS MENU");
            console.line("=".repeat(40));
            for (i, preset) in presets.iter().enumerate() {
                console.line(format!("{}. {}", i + 1, preset.menu_label()));
            }
            console.line(format!("{}. 🗑️  Clear ALL keys first", clear_choice));
            console.line("0. ⬅️  Back to main menu");

            let answer = console.read_line(&format!("\nSelect layout preset (0-{}): ", clear_choice))?;
            match answer.trim().parse::<usize>() {
                Ok(0) => return Ok(()),
                Ok(n) if (1..=presets.len()).contains(&n) => {
                    self.apply_preset(console, presets[n - 1], config)?;
                    return Ok(());
                }
                Ok(n) if n == clear_choice => {
                    if console.confirm("⚠️  Clear ALL keys before applying preset?")? {
                        config.clear();
                        console.success("All keys cleared");
                    }
                }
                _ => console.error("Invalid choice"),
            }
        }
    }

    // ----------------------------------------------------------------
    // Per-key configuration
    // ----------------------------------------------------------------

    fn read_delay<R: BufRead, W: Write>(console: &mut Console<R, W>) -> Result<u16, UiError> {
        let delay = console.get_int_or_default(
            &format!("Delay in ms (0-65535) [{}]: ", DEFAULT_DELAY_MS),
            Some(0),
            Some(i64::from(u16::MAX)),
            i64::from(DEFAULT_DELAY_MS),
        )?;
        Ok(u16::try_from(delay).unwrap_or(DEFAULT_DELAY_MS))
    }

    fn read_text_action<R: BufRead, W: Write>(
        console: &mut Console<R, W>,
    ) -> Result<Option<Action>, UiError> {
        let Some(text) = console.get_text_input(
            &format!("Enter text (max {} UTF-8 bytes): ", MAX_TEXT_BYTES),
            Some(MAX_TEXT_BYTES),
        ) else {
            return Ok(None);
        };
        if text.is_empty() {
            return Ok(None);
        }
        let delay = Self::read_delay(console)?;
        match Action::text(text, delay) {
            Ok(action) => Ok(Some(action)),
            Err(e) => {
                console.error(e);
                Ok(None)
            }
        }
    }

    fn read_hid_action<R: BufRead, W: Write>(
        console: &mut Console<R, W>,
    ) -> Result<Option<Action>, UiError> {
        console.line("\nCommon HID keycodes:");
        console.line("  ENTER=40, TAB=43, SPACE=44, ESC=41");
        console.line("  A=4, B=5, ..., Z=29");
        console.line("  1=30, 2=31, ..., 9=38, 0=39");

        let Some(keycode) = console
            .get_int_input("HID keycode (0-255): ", Some(0), Some(255))
            .and_then(|code| u8::try_from(code).ok())
        else {
            return Ok(None);
        };

        console.line("\nModifiers (can be combined):");
        console.line("  0=None, 1=CTRL, 2=SHIFT, 4=ALT, 8=GUI");
        let mask = console.get_int_or_default(
            &format!("Modifier (0-{}) [{}]: ", MAX_MODIFIER, modifier::NONE),
            Some(0),
            Some(i64::from(MAX_MODIFIER)),
            i64::from(modifier::NONE),
        )?;
        let delay = Self::read_delay(console)?;

        let mask = u8::try_from(mask).unwrap_or(modifier::NONE);
        match Action::hid(keycode, mask, delay) {
            Ok(action) => Ok(Some(action)),
            Err(e) => {
                console.error(e);
                Ok(None)
            }
        }
    }

    fn read_consumer_action<R: BufRead, W: Write>(
        console: &mut Console<R, W>,
    ) -> Result<Option<Action>, UiError> {
        console.line("\nCommon consumer codes:");
        console.line("  Play/Pause=205, Vol+=233, Vol-=234, Mute=226");
        console.line("  Next=181, Prev=182, Stop=183");

        let Some(code) = console
            .get_int_input("Consumer code (0-65535): ", Some(0), Some(65535))
            .and_then(|code| u16::try_from(code).ok())
        else {
            return Ok(None);
        };
        let delay = Self::read_delay(console)?;
        Ok(Some(Action::consumer(code, delay)))
    }

    /// Build the action list for `key` interactively.
    ///
    /// Stops at the action cap, on "Finish" or on an invalid selection.
    /// Returns `None` when no action was entered. Cancelling at any prompt
    /// drops the whole list, including a half-entered action.
    pub fn configure_key_interactive<R: BufRead, W: Write>(
        &self,
        console: &mut Console<R, W>,
        key: KeyId,
    ) -> Result<Option<Vec<Action>>, UiError> {
        console.line("");
        console.heading(format!("🔧 CONFIGURE KEY {}", key));
        console.line("-".repeat(30));
        console.line(key.describe());

        let mut actions = Vec::new();
        while actions.len() < MAX_ACTIONS_PER_KEY {
            console.line(format!(
                "\nAction {}/{} for key {}:",
                actions.len() + 1,
                MAX_ACTIONS_PER_KEY,
                key
            ));
            console.line("\nAction types:");
            for (i, name) in ACTION_TYPES.iter().enumerate() {
                console.line(format!("  {}. {}", i + 1, name));
            }

            let answer = console.read_line(&format!("Select action type (1-{}): ", ACTION_TYPES.len()))?;
            let action = match answer.trim().parse::<usize>() {
                Ok(1) => Self::read_text_action(console)?,
                Ok(2) => Self::read_hid_action(console)?,
                Ok(3) => Self::read_consumer_action(console)?,
                _ => break,
            };
            if let Some(action) = action {
                actions.push(action);
            }
        }

        if actions.is_empty() {
            console.error("No actions configured");
            return Ok(None);
        }

        console.line("");
        console.success(format!(
            "Configured {} action(s) for key {}",
            actions.len(),
            key
        ));
        Self::print_actions(console, &actions);
        Ok(Some(actions))
    }

    fn checked_key_id<R: BufRead, W: Write>(console: &mut Console<R, W>, id: i64) -> Option<KeyId> {
        let key = u16::try_from(id).ok().and_then(KeyId::new);
        if key.is_none() {
            console.error(format!("Invalid key ID {} (valid: 0-19, 100-115)", id));
        }
        key
    }

    fn configure_single_key_menu<R: BufRead, W: Write>(
        &self,
        console: &mut Console<R, W>,
        config: &mut KeyConfig,
    ) -> Result<(), UiError> {
        console.line("");
        console.heading("🔧 CONFIGURE SINGLE KEY");
        console.line("-".repeat(30));
        console.line("Matrix keys: 0-15");
        console.line("External buttons: 16=Scan Double, 17=Scan Long, 18=Power Single, 19=Power Double");
        console.line("Long press: 100-115 (matrix key + 100)");

        let Some(id) = console.get_int_input("Enter key ID (0-115): ", Some(0), Some(115)) else {
            return Ok(());
        };
        let Some(key) = Self::checked_key_id(console, id) else {
            return Ok(());
        };

        if let Some(existing) = config.get(key) {
            console.line(format!("\nCurrent configuration for key {}:", key));
            Self::print_actions(console, existing);
            if !console.confirm("Replace existing configuration?")? {
                return Ok(());
            }
        }

        if let Some(actions) = self.configure_key_interactive(console, key)? {
            config.set(key, actions);
        }
        Ok(())
    }

    // ----------------------------------------------------------------
    // Listing and clearing
    // ----------------------------------------------------------------

    fn view_configuration_details<R: BufRead, W: Write>(
        &self,
        console: &mut Console<R, W>,
        config: &KeyConfig,
    ) {
        if config.is_empty() {
            console.line("");
            console.error("No keys configured");
            console.pause_for_user();
            return;
        }

        console.line("");
        console.heading("📋 DETAILED CONFIGURATION");
        console.line("=".repeat(50));
        for (key, actions) in config {
            let plural = if actions.len() == 1 { "" } else { "s" };
            console.line(format!("\nKey {} ({} action{}):", key, actions.len(), plural));
            Self::print_actions(console, actions);
        }
        console.pause_for_user();
    }

    fn clear_configuration_menu<R: BufRead, W: Write>(
        &self,
        console: &mut Console<R, W>,
        config: &mut KeyConfig,
    ) -> Result<(), UiError> {
        if config.is_empty() {
            console.line("");
            console.error("No keys to clear");
            return Ok(());
        }

        console.line("");
        console.heading("🗑️  CLEAR CONFIGURATION");
        console.line("1. Clear specific key");
        console.line("2. Clear all keys");

        match console.read_line("Select option (1-2): ")?.trim() {
            "1" => {
                let Some(id) = console.get_int_input("Enter key ID to clear (0-115): ", Some(0), Some(115))
                else {
                    return Ok(());
                };
                let Some(key) = Self::checked_key_id(console, id) else {
                    return Ok(());
                };
                match config.remove(key) {
                    Some(_) => console.success(format!("Key {} cleared", key)),
                    None => console.error(format!("Key {} not configured", key)),
                }
            }
            "2" => {
                if console.confirm("Clear ALL keys?")? {
                    config.clear();
                    console.success("All keys cleared");
                }
            }
            _ => console.error("Invalid choice"),
        }
        Ok(())
    }

    // ----------------------------------------------------------------
    // Complete builder
    // ----------------------------------------------------------------

    /// Run the full builder session.
    ///
    /// Starts from a copy of `initial` when given. Returns `Ok(None)` when
    /// the operator discards the session and `Ok(Some(config))` when it is
    /// finished, which may be an empty mapping if the operator confirmed that.
    pub fn run_complete_builder<R: BufRead, W: Write>(
        &mut self,
        console: &mut Console<R, W>,
        initial: Option<&KeyConfig>,
    ) -> Result<Option<KeyConfig>, UiError> {
        console.line("");
        console.heading("🛠️  COMPLETE KEYBOARD BUILDER");
        console.line("=".repeat(60));
        console.line("Configure all 16 matrix keys with multiple actions support");
        console.line("Supports presets, layouts, and individual key configuration");

        let mut config = initial.cloned().unwrap_or_default();

        loop {
            self.display_keyboard_matrix(console, &config, "CURRENT CONFIGURATION");

            console.line("");
            console.heading("📋 CONFIGURATION OPTIONS:");
            console.line("1. 🔧 Configure single key (with multi-actions)");
            console.line("2. 🎨 Apply layout presets (Standard, Numeric, etc.)");
            console.line("3. 📋 View current configuration");
            console.line("4. 🗑️  Clear key configuration");
            console.line("5. ✅ Finish and export");
            console.line("0. ❌ Cancel and discard changes");

            let step = match console.read_line("\nSelect option (0-5): ")?.trim() {
                "0" => {
                    if console.confirm("Discard configuration?")? {
                        log::info!("keyboard builder cancelled");
                        return Ok(None);
                    }
                    Ok(())
                }
                "1" => self.configure_single_key_menu(console, &mut config),
                "2" => self.layout_presets_menu(console, &mut config),
                "3" => {
                    self.view_configuration_details(console, &config);
                    Ok(())
                }
                "4" => self.clear_configuration_menu(console, &mut config),
                "5" => {
                    if config.is_empty() {
                        console.error("No keys configured");
                        if console.confirm("Return empty configuration?")? {
                            return Ok(Some(config));
                        }
                        Ok(())
                    } else {
                        console.line("");
                        console.success(format!(
                            "Configuration completed with {} keys configured",
                            config.len()
                        ));
                        match self.finish_and_export_menu(console, &config) {
                            Ok(true) => return Ok(Some(config)),
                            Ok(false) => Ok(()),
                            Err(e) => Err(e),
                        }
                    }
                }
                _ => {
                    console.error("Invalid choice");
                    Ok(())
                }
            };

            match step {
                Ok(()) => {}
                // Ctrl-C inside a submenu only abandons that submenu
                Err(e) if e.is_interrupted() && !console.is_closed() => {
                    console.display_warning("Operation cancelled");
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Returns true when the session should end, false to keep editing
    fn finish_and_export_menu<R: BufRead, W: Write>(
        &mut self,
        console: &mut Console<R, W>,
        config: &KeyConfig,
    ) -> Result<bool, UiError> {
        loop {
            console.line("");
            console.heading("📤 EXPORT CONFIGURATION");
            console.line("=".repeat(40));
            console.line("1. 💾 Export as JSON file");
            if self.qr_available() {
                console.line("2. 📱 Export as QR codes (full command)");
            } else {
                console.line("2. 📱 Export as QR codes (unavailable, offers JSON instead)");
            }
            console.line("3. 📋 Just return configuration (no export)");
            console.line("0. ⬅️  Back to configuration");

            match console.read_line("\nSelect export option (0-3): ")?.trim() {
                "0" => return Ok(false),
                "1" => {
                    if self.save_json_export(console, config, None) {
                        console.line(format!(
                            "📁 Export location: {}",
                            self.options.output_dir.display()
                        ));
                        console.hint("You can load this file in the JSON browser");
                    }
                    return Ok(true);
                }
                "2" => {
                    console.line("");
                    console.heading("📱 QR Code Export");
                    console.line("=".repeat(30));
                    self.save_qr_export(console, config, None)?;
                    return Ok(true);
                }
                "3" => {
                    console.success("Configuration ready to return");
                    return Ok(true);
                }
                _ => console.error("Invalid choice"),
            }
        }
    }

    // ----------------------------------------------------------------
    // Export
    // ----------------------------------------------------------------

    /// Wrap the live mapping in a configuration document.
    ///
    /// An empty mapping yields the "Empty Configuration" placeholder.
    pub fn export_to_json<'a>(&self, config: &'a KeyConfig) -> ConfigDocument<'a> {
        ConfigDocument::new(config, document_timestamp())
    }

    /// Generate QR command artifacts in scan order.
    ///
    /// Returns an empty list when the mapping is empty, no generator is
    /// installed or generation fails; callers fall back to JSON export.
    pub fn export_to_qr_commands<R: BufRead, W: Write>(
        &mut self,
        console: &mut Console<R, W>,
        config: &KeyConfig,
    ) -> Vec<Box<dyn QrArtifact>> {
        if config.is_empty() {
            console.error("No configuration to export");
            return Vec::new();
        }

        let Some(generator) = self.qr_generator.as_deref() else {
            if !self.qr_unavailable_reported {
                console.error("QR generation not available: no QR generator installed");
                log::warn!("QR export requested without a QR generator");
                self.qr_unavailable_reported = true;
            }
            return Vec::new();
        };

        let document = ConfigDocument::new(config, document_timestamp());
        match generator.generate(&document) {
            Ok(artifacts) => {
                console.success(format!("Generated {} QR command(s)", artifacts.len()));
                artifacts
            }
            Err(e) => {
                log::warn!("QR generation failed: {:#}", e);
                console.error(format!("Error generating QR codes: {:#}", e));
                console.hint("Use JSON export instead for reliable export.");
                Vec::new()
            }
        }
    }

    /// Write the mapping as a JSON document.
    ///
    /// Without `path` the file is named after the current time inside the
    /// output directory. Refuses an empty mapping.
    pub fn save_json_export<R: BufRead, W: Write>(
        &self,
        console: &mut Console<R, W>,
        config: &KeyConfig,
        path: Option<&Path>,
    ) -> bool {
        if config.is_empty() {
            console.error("No configuration to save");
            return false;
        }

        let path = match path {
            Some(path) => path.to_path_buf(),
            None => self.options.output_dir.join(json_file_name(&file_timestamp())),
        };

        match self.export_to_json(config).export_json(&path) {
            Ok(()) => {
                log::info!("saved keyboard configuration to {}", path.display());
                console.success(format!("Configuration saved: {}", path.display()));
                true
            }
            Err(e) => {
                log::warn!("cannot save {}: {}", path.display(), e);
                console.error(format!("Error saving JSON: {}", e));
                false
            }
        }
    }

    /// Write the mapping as QR images into `output_dir` (or the configured
    /// output directory).
    ///
    /// When no artifact can be produced the operator is offered a JSON
    /// export instead.
    pub fn save_qr_export<R: BufRead, W: Write>(
        &mut self,
        console: &mut Console<R, W>,
        config: &KeyConfig,
        output_dir: Option<&Path>,
    ) -> Result<bool, UiError> {
        if config.is_empty() {
            console.error("No configuration to export");
            return Ok(false);
        }

        let artifacts = self.export_to_qr_commands(console, config);
        if artifacts.is_empty() {
            console.hint("QR generation failed, offering JSON export instead...");
            if console.confirm("Save as JSON file instead?")? {
                let dir = output_dir.unwrap_or(self.options.output_dir.as_path());
                let path = dir.join(json_file_name(&file_timestamp()));
                return Ok(self.save_json_export(console, config, Some(&path)));
            }
            return Ok(false);
        }

        let dir = output_dir.unwrap_or(self.options.output_dir.as_path()).to_path_buf();
        if let Err(e) = fs::create_dir_all(&dir) {
            console.error(format!("Error saving QR codes: {}", e));
            return Ok(false);
        }

        let total = artifacts.len();
        let mut saved = 0;
        for (i, artifact) in artifacts.iter().enumerate() {
            let name = qr_file_name(i, total);
            match artifact.save(&dir.join(&name)) {
                Ok(()) => {
                    saved += 1;
                    console.success(format!("Saved: {}", name));
                }
                Err(e) => {
                    log::warn!("cannot save {}: {}", name, e);
                    console.error(format!("Failed to save: {} ({})", name, e));
                }
            }
        }

        if saved == 0 {
            return Ok(false);
        }

        console.display_success(format!("Saved {} QR code(s) to {}", saved, dir.display()));
        if total > 1 {
            console.line("\n📖 Deployment Instructions:");
            console.line("1. Scan QR codes in order");
            console.line("2. Configuration will be applied automatically");
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::io::{self, Cursor};
    use std::rc::Rc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    type TestConsole = Console<Cursor<Vec<u8>>, Vec<u8>>;

    fn console(input: &str) -> TestConsole {
        Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn output(console: TestConsole) -> String {
        String::from_utf8(console.into_output()).unwrap()
    }

    fn builder() -> KeyboardConfigBuilder {
        KeyboardConfigBuilder::new(BuilderOptions::default())
    }

    struct FakeArtifact {
        saved: Rc<RefCell<Vec<PathBuf>>>,
        fail: bool,
    }

    impl QrArtifact for FakeArtifact {
        fn save(&self, path: &Path) -> io::Result<()> {
            if self.fail {
                return Err(io::Error::new(io::ErrorKind::Other, "disk full"));
            }
            self.saved.borrow_mut().push(path.to_path_buf());
            Ok(())
        }
    }

    struct FakeGenerator {
        parts: usize,
        saved: Rc<RefCell<Vec<PathBuf>>>,
    }

    impl QrGenerator for FakeGenerator {
        fn generate(&self, document: &ConfigDocument<'_>) -> anyhow::Result<Vec<Box<dyn QrArtifact>>> {
            anyhow::ensure!(!document.keys.is_empty(), "nothing to encode");
            Ok((0..self.parts)
                .map(|_| {
                    Box::new(FakeArtifact {
                        saved: self.saved.clone(),
                        fail: false,
                    }) as Box<dyn QrArtifact>
                })
                .collect())
        }
    }

    fn temp_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("scanpad_builder_{}_{}", name, std::process::id()))
    }

    #[test]
    fn text_action_with_delay() {
        let b = builder();
        let mut c = console("1\nab\n25\n4\n");
        let actions = b.configure_key_interactive(&mut c, KeyId(5)).unwrap().unwrap();
        assert_eq!(actions, vec![Action::text("ab", 25).unwrap()]);
        let out = output(c);
        assert!(out.contains("Matrix position: Row 1, Column 1"));
        assert!(out.contains("✅ Configured 1 action(s) for key 5"));
    }

    #[test]
    fn oversized_text_is_not_appended() {
        let b = builder();
        let mut c = console("1\n123456789\n4\n");
        let actions = b.configure_key_interactive(&mut c, KeyId(0)).unwrap();
        assert_eq!(actions, None);
        let out = output(c);
        assert!(out.contains("❌ Text too long (max 8 UTF-8 bytes)"));
        assert!(out.contains("❌ No actions configured"));
    }

    #[test]
    fn multibyte_text_counts_bytes() {
        let b = builder();
        // four 2-byte characters fit, five do not
        let mut c = console("1\néééé\n\n1\nééééé\n4\n");
        let actions = b.configure_key_interactive(&mut c, KeyId(1)).unwrap().unwrap();
        assert_eq!(actions.len(), 1);
    }

    #[test]
    fn hid_and_consumer_defaults() {
        let b = builder();
        let mut c = console("2\n40\n\n\n3\n205\n0\n4\n");
        let actions = b.configure_key_interactive(&mut c, KeyId(17)).unwrap().unwrap();
        assert_eq!(
            actions,
            vec![Action::hid(40, 0, 10).unwrap(), Action::consumer(205, 0)]
        );
        assert!(output(c).contains("External button: Scan Trigger Long Press"));
    }

    #[test]
    fn hid_with_modifiers_summary() {
        let b = builder();
        let mut c = console("2\n6\n3\n10\n4\n");
        let actions = b.configure_key_interactive(&mut c, KeyId(2)).unwrap().unwrap();
        assert_eq!(actions[0].summary(), "HID: keycode 6 (CTRL+SHIFT)");
    }

    #[test]
    fn invalid_type_selection_stops() {
        let b = builder();
        let mut c = console("1\nx\n\n9\n1\ny\n");
        let actions = b.configure_key_interactive(&mut c, KeyId(3)).unwrap().unwrap();
        assert_eq!(actions, vec![Action::text("x", 10).unwrap()]);
    }

    #[test]
    fn action_cap_is_ten() {
        let b = builder();
        let script = "3\n1\n\n".repeat(12);
        let mut c = console(&script);
        let actions = b.configure_key_interactive(&mut c, KeyId(4)).unwrap().unwrap();
        assert_eq!(actions.len(), MAX_ACTIONS_PER_KEY);
    }

    #[test]
    fn preset_needs_confirmation_unless_silent() {
        let b = builder();
        let mut config = KeyConfig::new();
        let mut c = console("n\n");
        assert_eq!(b.apply_preset(&mut c, Preset::Standard, &mut config).unwrap(), 0);
        assert!(config.is_empty());

        let silent = KeyboardConfigBuilder::new(BuilderOptions {
            silent_presets: true,
            ..BuilderOptions::default()
        });
        let mut c = console("");
        assert_eq!(
            silent.apply_preset(&mut c, Preset::FunctionKeys, &mut config).unwrap(),
            12
        );
        assert_eq!(config.len(), 12);
        assert!(!output(c).contains("(y/n)"));
    }

    #[test]
    fn cancel_returns_none() {
        let mut b = builder();
        let mut c = console("0\ny\n");
        assert_eq!(b.run_complete_builder(&mut c, None).unwrap(), None);
    }

    #[test]
    fn confirmed_empty_finish_returns_empty() {
        let mut b = builder();
        let mut c = console("5\ny\n");
        assert_eq!(
            b.run_complete_builder(&mut c, None).unwrap(),
            Some(KeyConfig::new())
        );
    }

    #[test]
    fn initial_config_is_copied() {
        let mut initial = KeyConfig::new();
        Preset::Numeric.apply(&mut initial);
        let mut b = builder();
        let mut c = console("4\n2\ny\n5\ny\n");
        let result = b.run_complete_builder(&mut c, Some(&initial)).unwrap();
        assert_eq!(result, Some(KeyConfig::new()));
        assert_eq!(initial.len(), 10);
    }

    #[test]
    fn replace_existing_key_requires_confirmation() {
        let mut initial = KeyConfig::new();
        initial.set(KeyId(0), vec![Action::text("a", 10).unwrap()]);
        let mut b = builder();
        // decline replacement, then finish without export
        let mut c = console("1\n0\nn\n5\n3\n");
        let result = b.run_complete_builder(&mut c, Some(&initial)).unwrap();
        assert_eq!(result, Some(initial));
        assert!(output(c).contains("Current configuration for key 0:"));
    }

    #[test]
    fn invalid_key_id_rejected() {
        let mut b = builder();
        let mut c = console("1\n50\n0\ny\n");
        assert_eq!(b.run_complete_builder(&mut c, None).unwrap(), None);
        assert!(output(c).contains("Invalid key ID 50 (valid: 0-19, 100-115)"));
    }

    #[test]
    fn long_press_key_configured() {
        let mut b = builder();
        let mut c = console("1\n104\n1\nhold\n\n4\n5\n3\n");
        let result = b.run_complete_builder(&mut c, None).unwrap().unwrap();
        assert_eq!(result.get(KeyId(104)).map(<[Action]>::len), Some(1));
        assert!(output(c).contains("Long Press Keys"));
    }

    #[test]
    fn presets_menu_clear_then_apply() {
        let mut initial = KeyConfig::new();
        initial.set(KeyId(18), vec![Action::consumer(226, 10)]);
        let mut b = builder();
        let mut c = console("2\n6\ny\n3\ny\n5\n3\n");
        let result = b.run_complete_builder(&mut c, Some(&initial)).unwrap().unwrap();
        assert_eq!(result.len(), 10);
        assert!(!result.contains(KeyId(18)));
    }

    #[test]
    fn qr_unavailable_reported_once() {
        let mut b = builder();
        let mut config = KeyConfig::new();
        Preset::Numeric.apply(&mut config);
        let mut c = console("");
        assert!(b.export_to_qr_commands(&mut c, &config).is_empty());
        assert!(b.export_to_qr_commands(&mut c, &config).is_empty());
        let out = output(c);
        assert_eq!(out.matches("QR generation not available").count(), 1);
    }

    #[test]
    fn qr_export_names_parts() {
        let saved = Rc::new(RefCell::new(Vec::new()));
        let mut b = builder().with_qr_generator(Box::new(FakeGenerator {
            parts: 3,
            saved: saved.clone(),
        }));
        let mut config = KeyConfig::new();
        Preset::Standard.apply(&mut config);
        let dir = temp_dir("qr_parts");
        let mut c = console("");
        assert!(b.save_qr_export(&mut c, &config, Some(&dir)).unwrap());
        let names: Vec<String> = saved
            .borrow()
            .iter()
            .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect();
        assert_eq!(
            names,
            vec![
                "keyboard_config_part_01_of_03.png",
                "keyboard_config_part_02_of_03.png",
                "keyboard_config_part_03_of_03.png",
            ]
        );
        assert!(output(c).contains("Deployment Instructions"));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn single_qr_artifact_is_full() {
        let saved = Rc::new(RefCell::new(Vec::new()));
        let mut b = builder().with_qr_generator(Box::new(FakeGenerator {
            parts: 1,
            saved: saved.clone(),
        }));
        let mut config = KeyConfig::new();
        Preset::Alphabetic.apply(&mut config);
        let dir = temp_dir("qr_full");
        let mut c = console("");
        assert!(b.save_qr_export(&mut c, &config, Some(&dir)).unwrap());
        assert!(saved.borrow()[0].ends_with("keyboard_config_full.png"));
        assert!(!output(c).contains("Deployment Instructions"));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn failed_artifact_save_is_reported() {
        struct BrokenGenerator;
        impl QrGenerator for BrokenGenerator {
            fn generate(&self, _: &ConfigDocument<'_>) -> anyhow::Result<Vec<Box<dyn QrArtifact>>> {
                Ok(vec![Box::new(FakeArtifact {
                    saved: Rc::new(RefCell::new(Vec::new())),
                    fail: true,
                })])
            }
        }
        let mut b = builder().with_qr_generator(Box::new(BrokenGenerator));
        let mut config = KeyConfig::new();
        Preset::Numpad.apply(&mut config);
        let dir = temp_dir("qr_broken");
        let mut c = console("");
        assert!(!b.save_qr_export(&mut c, &config, Some(&dir)).unwrap());
        assert!(output(c).contains("❌ Failed to save: keyboard_config_full.png (disk full)"));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn json_export_refuses_empty() {
        let b = builder();
        let mut c = console("");
        assert!(!b.save_json_export(&mut c, &KeyConfig::new(), None));
        assert!(output(c).contains("No configuration to save"));
    }

    #[test]
    fn export_document_borrows_live_mapping() {
        let b = builder();
        let mut config = KeyConfig::new();
        Preset::Standard.apply(&mut config);
        let doc = b.export_to_json(&config);
        assert!(std::ptr::eq(doc.keys.as_ref(), &config));
        assert_eq!(doc.metadata.description, "Configuration with 16 keys");
    }

    /// Raises the interrupt flag while the given 1-based line is read,
    /// as a Ctrl-C typed at that prompt would
    struct InterruptAtLine {
        inner: Cursor<Vec<u8>>,
        lines: usize,
        at: usize,
        flag: Arc<AtomicBool>,
    }

    impl io::Read for InterruptAtLine {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            io::Read::read(&mut self.inner, buf)
        }
    }

    impl BufRead for InterruptAtLine {
        fn fill_buf(&mut self) -> io::Result<&[u8]> {
            self.inner.fill_buf()
        }

        fn consume(&mut self, amt: usize) {
            self.inner.consume(amt)
        }

        fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
            let read = self.inner.read_line(buf)?;
            self.lines += 1;
            if self.lines == self.at {
                self.flag.store(true, Ordering::SeqCst);
            }
            Ok(read)
        }
    }

    fn interrupting_console(input: &str, at: usize) -> Console<InterruptAtLine, Vec<u8>> {
        let flag = Arc::new(AtomicBool::new(false));
        let reader = InterruptAtLine {
            inner: Cursor::new(input.as_bytes().to_vec()),
            lines: 0,
            at,
            flag: flag.clone(),
        };
        Console::new(reader, Vec::new()).with_interrupt_flag(flag)
    }

    #[test]
    fn ctrl_c_at_delay_prompt_drops_action() {
        let b = builder();
        // action type, text, then Ctrl-C at the delay prompt
        let mut c = interrupting_console("1\nab\n\n4\n", 3);
        let result = b.configure_key_interactive(&mut c, KeyId(5));
        assert!(matches!(result, Err(UiError::Interrupted)));
    }

    #[test]
    fn ctrl_c_at_modifier_prompt_drops_action() {
        let b = builder();
        let mut c = interrupting_console("2\n40\n\n\n4\n", 3);
        let result = b.configure_key_interactive(&mut c, KeyId(0));
        assert!(matches!(result, Err(UiError::Interrupted)));
    }

    #[test]
    fn ctrl_c_mid_action_keeps_builder_session() {
        let mut b = builder();
        // option 1, key 5, text "ab", Ctrl-C at delay, then finish empty
        let mut c = interrupting_console("1\n5\n1\nab\n\n5\ny\n", 5);
        let result = b.run_complete_builder(&mut c, None).unwrap();
        assert_eq!(result, Some(KeyConfig::new()));
        let out = String::from_utf8(c.into_output()).unwrap();
        assert!(out.contains("⚠️  Operation cancelled"));
        assert!(!out.contains("Configured 1 action(s)"));
    }

    #[test]
    fn clearing_invalid_key_id_is_rejected() {
        let mut initial = KeyConfig::new();
        initial.set(KeyId(0), vec![Action::text("a", 10).unwrap()]);
        let mut b = builder();
        let mut c = console("4\n1\n50\n0\ny\n");
        assert_eq!(b.run_complete_builder(&mut c, Some(&initial)).unwrap(), None);
        let out = output(c);
        assert!(out.contains("❌ Invalid key ID 50 (valid: 0-19, 100-115)"));
        assert!(!out.contains("Key 50 not configured"));
    }

    #[test]
    fn clearing_unconfigured_key_is_reported() {
        let mut initial = KeyConfig::new();
        initial.set(KeyId(0), vec![Action::text("a", 10).unwrap()]);
        let mut b = builder();
        let mut c = console("4\n1\n104\n0\ny\n");
        assert_eq!(b.run_complete_builder(&mut c, Some(&initial)).unwrap(), None);
        assert!(output(c).contains("❌ Key 104 not configured"));
    }

    #[test]
    fn export_menu_labels_qr_availability() {
        let mut initial = KeyConfig::new();
        Preset::Numeric.apply(&mut initial);

        // finish, back out of the export menu, then discard
        let script = "5\n0\n0\ny\n";
        let mut without = builder();
        let mut c = console(script);
        assert_eq!(without.run_complete_builder(&mut c, Some(&initial)).unwrap(), None);
        assert!(output(c).contains("2. 📱 Export as QR codes (unavailable, offers JSON instead)"));

        let mut with = builder().with_qr_generator(Box::new(FakeGenerator {
            parts: 1,
            saved: Rc::new(RefCell::new(Vec::new())),
        }));
        let mut c = console(script);
        assert_eq!(with.run_complete_builder(&mut c, Some(&initial)).unwrap(), None);
        assert!(output(c).contains("2. 📱 Export as QR codes (full command)"));
    }
}
