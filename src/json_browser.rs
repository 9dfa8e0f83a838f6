//! Browse, preview and save JSON files of the examples library
//!
//! The library is a directory with three fixed categories:
//!
//! ```text
//! <json_dir>/
//!   templates/
//!   keyboard-configs/
//!   device-commands/
//! ```
//!
//! Missing category directories simply contribute no files.

use crate::error::BrowserError;
use crate::ui::Console;
use crate::utils::title_case;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Which part of the library a menu shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonCategory {
    Templates,
    Keyboard,
    Device,
    All,
}

impl JsonCategory {
    fn includes(self, other: JsonCategory) -> bool {
        self == JsonCategory::All || self == other
    }
}

impl FromStr for JsonCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "templates" => Ok(Self::Templates),
            "keyboard" => Ok(Self::Keyboard),
            "device" => Ok(Self::Device),
            "all" => Ok(Self::All),
            other => Err(format!("unknown JSON category '{}'", other)),
        }
    }
}

impl fmt::Display for JsonCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Templates => "templates",
            Self::Keyboard => "keyboard",
            Self::Device => "device",
            Self::All => "all",
        };
        f.write_str(name)
    }
}

/// Summary of a JSON file, read without validating the document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonInfo {
    pub name: String,
    pub path: PathBuf,
    /// Declared `type`, or `unknown`
    #[serde(rename = "type")]
    pub doc_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    /// Keys of a keyboard configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keys_count: Option<usize>,
    /// Commands of a device batch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commands_count: Option<usize>,
}

/// Browse and load JSON configurations
#[derive(Debug, Clone)]
pub struct JsonBrowser {
    templates_dir: PathBuf,
    keyboard_configs_dir: PathBuf,
    device_commands_dir: PathBuf,
}

impl JsonBrowser {
    pub fn new(json_dir: impl Into<PathBuf>) -> Self {
        let json_dir = json_dir.into();
        Self {
            templates_dir: json_dir.join("templates"),
            keyboard_configs_dir: json_dir.join("keyboard-configs"),
            device_commands_dir: json_dir.join("device-commands"),
        }
    }

    pub fn keyboard_configs_dir(&self) -> &Path {
        &self.keyboard_configs_dir
    }

    pub fn list_templates(&self) -> Vec<PathBuf> {
        list_json_files(&self.templates_dir)
    }

    pub fn list_keyboard_configs(&self) -> Vec<PathBuf> {
        list_json_files(&self.keyboard_configs_dir)
    }

    pub fn list_device_commands(&self) -> Vec<PathBuf> {
        list_json_files(&self.device_commands_dir)
    }

    /// Labelled files of `category`, templates first, then keyboard
    /// configurations, then device commands
    pub fn files(&self, category: JsonCategory) -> Vec<(&'static str, PathBuf)> {
        let mut files = Vec::new();
        if category.includes(JsonCategory::Templates) {
            files.extend(self.list_templates().into_iter().map(|p| ("📄 Template", p)));
        }
        if category.includes(JsonCategory::Keyboard) {
            files.extend(
                self.list_keyboard_configs()
                    .into_iter()
                    .map(|p| ("⌨️  Keyboard", p)),
            );
        }
        if category.includes(JsonCategory::Device) {
            files.extend(self.list_device_commands().into_iter().map(|p| ("🎮 Device", p)));
        }
        files
    }

    /// Read and parse a JSON file
    pub fn read_json(&self, path: &Path) -> Result<Value, BrowserError> {
        let contents = fs::read_to_string(path).map_err(|source| BrowserError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| BrowserError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse a JSON file, reporting failures instead of returning them
    pub fn load_json<R: BufRead, W: Write>(
        &self,
        console: &mut Console<R, W>,
        path: &Path,
    ) -> Option<Value> {
        match self.read_json(path) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("{}", e);
                console.error(format!("Error loading JSON: {}", e));
                None
            }
        }
    }

    /// Menu over the files of `category`; returns the chosen path.
    ///
    /// With no files the operator is told so and no choice is read.
    pub fn display_json_menu<R: BufRead, W: Write>(
        &self,
        console: &mut Console<R, W>,
        category: JsonCategory,
    ) -> Option<PathBuf> {
        let mut files = self.files(category);
        if files.is_empty() {
            console.error("No JSON files found");
            console.pause_for_user();
            return None;
        }

        let items: Vec<String> = files
            .iter()
            .map(|(label, path)| format!("{}: {}", label, title_case(&file_stem(path))))
            .collect();
        console.display_menu("Available JSON Files", &items, true);

        match console.get_menu_choice(items.len(), true) {
            Some(choice) if choice > 0 => Some(files.swap_remove(choice - 1).1),
            _ => None,
        }
    }

    /// Print a pretty-printed copy of the file, cut after `max_lines`
    pub fn preview_json<R: BufRead, W: Write>(
        &self,
        console: &mut Console<R, W>,
        path: &Path,
        max_lines: usize,
    ) {
        let Some(data) = self.load_json(console, path) else {
            return;
        };
        let text = match serde_json::to_string_pretty(&data) {
            Ok(text) => text,
            Err(e) => {
                console.error(format!("Error formatting JSON: {}", e));
                return;
            }
        };

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        console.line(format!("\n📄 Preview of {}:", name));
        console.line("-".repeat(50));

        let lines: Vec<&str> = text.lines().collect();
        if lines.len() > max_lines {
            for line in &lines[..max_lines] {
                console.line(line);
            }
            console.line(format!("... ({} more lines)", lines.len() - max_lines));
        } else {
            console.line(&text);
        }

        console.line("-".repeat(50));
    }

    /// Name, type, metadata and a type-specific count for a JSON file
    pub fn get_json_info<R: BufRead, W: Write>(
        &self,
        console: &mut Console<R, W>,
        path: &Path,
    ) -> Option<JsonInfo> {
        let data = self.load_json(console, path)?;
        Some(summarize(path, &data))
    }

    /// Write `data` as 2-space indented UTF-8 JSON, creating parent directories
    pub fn write_json<T: Serialize + ?Sized>(&self, data: &T, path: &Path) -> Result<(), BrowserError> {
        let text = serde_json::to_string_pretty(data).map_err(BrowserError::Serialize)?;
        let write = |path: &Path| -> std::io::Result<()> {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, format!("{}\n", text))
        };
        write(path).map_err(|source| BrowserError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save `data` to `path`, reporting the outcome on the console
    pub fn save_json<R, W, T>(&self, console: &mut Console<R, W>, data: &T, path: &Path) -> bool
    where
        R: BufRead,
        W: Write,
        T: Serialize + ?Sized,
    {
        match self.write_json(data, path) {
            Ok(()) => {
                log::info!("saved {}", path.display());
                console.success(format!("Saved to {}", path.display()));
                true
            }
            Err(e) => {
                log::warn!("{}", e);
                console.error(format!("Error saving JSON: {}", e));
                false
            }
        }
    }
}

fn list_json_files(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut files: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    files
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn element_count(value: &Value) -> Option<usize> {
    match value {
        Value::Object(map) => Some(map.len()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}

fn summarize(path: &Path, data: &Value) -> JsonInfo {
    let doc_type = data
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string();

    let keys_count = if doc_type == "keyboard_configuration" {
        data.get("keys")
            .or_else(|| data.get("matrix_keys"))
            .and_then(element_count)
    } else {
        None
    };
    let commands_count = if doc_type == "device_batch" {
        data.get("commands").and_then(element_count)
    } else {
        None
    };

    JsonInfo {
        name: file_stem(path),
        path: path.to_path_buf(),
        doc_type,
        metadata: data.get("metadata").cloned(),
        keys_count,
        commands_count,
    }
}
