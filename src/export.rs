//! Configuration export: JSON documents and QR command artifacts
//!
//! QR encoding itself lives in the device SDK. This module only defines the
//! capability the builder consumes and the file naming shared by exports.

use crate::keyboard::ConfigDocument;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

/// Single scannable image produced by a QR generator
pub trait QrArtifact {
    /// Write the image to `path`
    fn save(&self, path: &Path) -> io::Result<()>;
}

/// Turns a configuration document into QR command artifacts.
///
/// Artifacts are returned in scan order; the device applies them one after
/// another.
pub trait QrGenerator {
    fn generate(&self, document: &ConfigDocument<'_>) -> anyhow::Result<Vec<Box<dyn QrArtifact>>>;
}

/// `keyboard_config_<timestamp>.json`
pub fn json_file_name(timestamp: &str) -> String {
    format!("keyboard_config_{}.json", timestamp)
}

/// File name of artifact `index` (0-based) out of `total`
pub fn qr_file_name(index: usize, total: usize) -> String {
    if total == 1 {
        "keyboard_config_full.png".to_string()
    } else {
        format!("keyboard_config_part_{:02}_of_{:02}.png", index + 1, total)
    }
}

impl ConfigDocument<'_> {
    /// Export document to a JSON file, creating missing parent directories
    pub fn export_json(&self, path: &Path) -> io::Result<()> {
        let json = self
            .to_json()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        file.write_all(b"\n")?;
        Ok(())
    }

    /// Export document to a JSON string (2-space indent, UTF-8 kept literal)
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::{Action, KeyConfig, KeyId};

    #[test]
    fn artifact_names() {
        assert_eq!(qr_file_name(0, 1), "keyboard_config_full.png");
        assert_eq!(qr_file_name(0, 3), "keyboard_config_part_01_of_03.png");
        assert_eq!(qr_file_name(2, 3), "keyboard_config_part_03_of_03.png");
        assert_eq!(qr_file_name(9, 12), "keyboard_config_part_10_of_12.png");
    }

    #[test]
    fn json_name_uses_timestamp() {
        assert_eq!(
            json_file_name("20240501_140322"),
            "keyboard_config_20240501_140322.json"
        );
    }

    #[test]
    fn json_keeps_non_ascii_and_two_space_indent() {
        let mut keys = KeyConfig::new();
        keys.set(KeyId(3), vec![Action::text("€", 10).unwrap()]);
        let doc = ConfigDocument::new(&keys, "now".into());
        let json = doc.to_json().unwrap();
        assert!(json.contains("\"value\": \"€\""));
        assert!(json.contains("\n  \"type\": \"keyboard_configuration\""));
    }

    #[test]
    fn export_creates_directories() {
        let dir = std::env::temp_dir()
            .join(format!("scanpad_export_test_{}", std::process::id()))
            .join("nested");
        let path = dir.join("out.json");
        let keys = KeyConfig::new();
        ConfigDocument::new(&keys, "now".into())
            .export_json(&path)
            .unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("Empty Configuration"));
        let _ = std::fs::remove_dir_all(dir.parent().unwrap());
    }
}
