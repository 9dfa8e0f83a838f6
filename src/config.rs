//! Configuration management for the scanpad examples
//!
//! Provides persistent configuration that is loaded from and saved to a
//! platform-specific config file.
//!
//! ## Config File Locations
//!
//! | Platform | Path |
//! |----------|------|
//! | Linux | `~/.config/scanpad-examples/config.toml` |
//! | macOS | `~/Library/Application Support/scanpad-examples/config.toml` |
//! | Windows | `%APPDATA%\scanpad-examples\config.toml` |
//!
//! ## Example
//!
//! ```no_run
//! use scanpad_examples::Config;
//!
//! // Load existing config or use defaults
//! let mut config = Config::load().unwrap_or_default();
//!
//! // Skip preset confirmations for the whole session
//! config.builder.silent_presets = true;
//!
//! // Save to disk
//! config.save().expect("Failed to save config");
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error type for configuration operations
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to determine config directory
    #[error("Could not determine config directory")]
    NoConfigDir,
    /// IO error reading or writing config file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Failed to parse config file
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Failed to serialize config
    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Returns the path to the config file.
///
/// - Linux: `~/.config/scanpad-examples/config.toml`
/// - macOS: `~/Library/Application Support/scanpad-examples/config.toml`
/// - Windows: `%APPDATA%\scanpad-examples\config.toml`
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    Ok(config_dir.join("scanpad-examples").join("config.toml"))
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Where JSON files are read from and exports are written to
    #[serde(default)]
    pub paths: PathsConfig,
    /// Keyboard builder behaviour
    #[serde(default)]
    pub builder: BuilderConfig,
    /// UI settings
    #[serde(default)]
    pub ui: UiConfig,
}

/// Directory settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Root of the JSON library (`templates/`, `keyboard-configs/`, `device-commands/`)
    pub json_dir: PathBuf,
    /// Destination for JSON and QR exports
    pub output_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            json_dir: PathBuf::from("json"),
            output_dir: PathBuf::from("output"),
        }
    }
}

/// Keyboard builder configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuilderConfig {
    /// Apply layout presets without asking for confirmation
    pub silent_presets: bool,
}

/// UI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Lines shown by the JSON preview before truncating
    pub preview_max_lines: usize,
    /// Clear the terminal before showing the main menu
    pub clear_screen: bool,
    /// Color theme (dark/light)
    pub theme: Theme,
    /// Color status lines
    pub color: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            preview_max_lines: 20,
            clear_screen: false,
            theme: Theme::Dark,
            color: true,
        }
    }
}

/// Color theme options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

impl Config {
    /// Load configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to the default config file.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = config_path()?;
        self.save_to(&path)
    }

    /// Save configuration to a specific path, creating its directory.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }
}
