//! Keyboard configuration mapping and the exported document envelope

use super::action::MAX_ACTIONS_PER_KEY;
use super::{Action, KeyId};
use crate::error::KeyConfigError;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::btree_map;
use std::collections::BTreeMap;

/// Mapping from key id to the ordered list of actions it triggers.
///
/// Keys missing from the map are unconfigured. A present key always holds
/// at least one action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyConfig(BTreeMap<KeyId, Vec<Action>>);

impl KeyConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign actions to a key, replacing what was there.
    ///
    /// An empty list removes the key so the non-empty invariant holds.
    pub fn set(&mut self, key: KeyId, actions: Vec<Action>) -> Option<Vec<Action>> {
        if actions.is_empty() {
            return self.0.remove(&key);
        }
        self.0.insert(key, actions)
    }

    pub fn get(&self, key: KeyId) -> Option<&[Action]> {
        self.0.get(&key).map(Vec::as_slice)
    }

    pub fn contains(&self, key: KeyId) -> bool {
        self.0.contains_key(&key)
    }

    pub fn remove(&mut self, key: KeyId) -> Option<Vec<Action>> {
        self.0.remove(&key)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Number of configured keys
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of actions across all keys
    pub fn total_actions(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    /// Configured keys in ascending numeric order
    pub fn iter(&self) -> btree_map::Iter<'_, KeyId, Vec<Action>> {
        self.0.iter()
    }

    /// Check every key and action against the device limits
    pub fn validate(&self) -> Result<(), KeyConfigError> {
        for (key, actions) in &self.0 {
            if !key.is_valid() {
                return Err(KeyConfigError::InvalidKeyId(key.as_u16()));
            }
            if actions.is_empty() {
                return Err(KeyConfigError::EmptyActions(key.as_u16()));
            }
            if actions.len() > MAX_ACTIONS_PER_KEY {
                return Err(KeyConfigError::TooManyActions {
                    key: key.as_u16(),
                    count: actions.len(),
                });
            }
            for (index, action) in actions.iter().enumerate() {
                action
                    .validate()
                    .map_err(|source| KeyConfigError::InvalidAction {
                        key: key.as_u16(),
                        index: index + 1,
                        source,
                    })?;
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a KeyConfig {
    type Item = (&'a KeyId, &'a Vec<Action>);
    type IntoIter = btree_map::Iter<'a, KeyId, Vec<Action>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(KeyId, Vec<Action>)> for KeyConfig {
    fn from_iter<I: IntoIterator<Item = (KeyId, Vec<Action>)>>(iter: I) -> Self {
        let mut config = KeyConfig::new();
        for (key, actions) in iter {
            config.set(key, actions);
        }
        config
    }
}

/// Document type tag written in the `type` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    KeyboardConfiguration,
}

/// Descriptive metadata of a configuration document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub name: String,
    pub description: String,
    pub version: String,
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub use_case: String,
}

/// Complete keyboard configuration document.
///
/// `keys` borrows the builder's live mapping on export and owns it when a
/// document is loaded from disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigDocument<'a> {
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    pub metadata: DocumentMetadata,
    pub keys: Cow<'a, KeyConfig>,
}

impl<'a> ConfigDocument<'a> {
    /// Wrap a mapping in the document envelope, stamped with `created`
    pub fn new(keys: &'a KeyConfig, created: String) -> Self {
        let metadata = if keys.is_empty() {
            DocumentMetadata {
                name: "Empty Configuration".to_string(),
                description: "No keys configured".to_string(),
                version: "1.0".to_string(),
                created,
                use_case: "custom".to_string(),
            }
        } else {
            DocumentMetadata {
                name: "Keyboard Configuration".to_string(),
                description: format!("Configuration with {} keys", keys.len()),
                version: "1.0".to_string(),
                created,
                use_case: "custom".to_string(),
            }
        };
        Self {
            doc_type: DocumentType::KeyboardConfiguration,
            metadata,
            keys: Cow::Borrowed(keys),
        }
    }

    /// Parse and validate a document read from disk
    pub fn from_value(value: serde_json::Value) -> anyhow::Result<ConfigDocument<'static>> {
        let document: ConfigDocument<'static> = serde_json::from_value(value)?;
        document.keys.validate()?;
        Ok(document)
    }

    pub fn into_keys(self) -> KeyConfig {
        self.keys.into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> KeyConfig {
        let mut config = KeyConfig::new();
        config.set(KeyId(0), vec![Action::text("1", 10).unwrap()]);
        config.set(
            KeyId(17),
            vec![
                Action::hid(40, 0, 10).unwrap(),
                Action::consumer(205, 20),
            ],
        );
        config.set(KeyId(104), vec![Action::text("long", 10).unwrap()]);
        config
    }

    #[test]
    fn empty_list_removes_key() {
        let mut config = sample();
        config.set(KeyId(0), Vec::new());
        assert!(!config.contains(KeyId(0)));
        assert_eq!(config.len(), 2);
    }

    #[test]
    fn counts() {
        let config = sample();
        assert_eq!(config.len(), 3);
        assert_eq!(config.total_actions(), 4);
    }

    #[test]
    fn keys_serialize_as_string_ids_in_numeric_order() {
        let config = sample();
        let text = serde_json::to_string(&config).unwrap();
        let zero = text.find("\"0\"").unwrap();
        let seventeen = text.find("\"17\"").unwrap();
        let long = text.find("\"104\"").unwrap();
        assert!(zero < seventeen && seventeen < long);
    }

    #[test]
    fn document_envelope() {
        let config = sample();
        let doc = ConfigDocument::new(&config, "2024-01-01 12:00:00".into());
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["type"], "keyboard_configuration");
        assert_eq!(value["metadata"]["description"], "Configuration with 3 keys");
        assert_eq!(value["metadata"]["created"], "2024-01-01 12:00:00");
        assert_eq!(value["keys"]["17"][1]["consumer_code"], 205);
    }

    #[test]
    fn empty_document_placeholder() {
        let config = KeyConfig::new();
        let doc = ConfigDocument::new(&config, "now".into());
        assert_eq!(doc.metadata.name, "Empty Configuration");
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["keys"], json!({}));
    }

    #[test]
    fn document_roundtrip_keeps_mapping() {
        let config = sample();
        let doc = ConfigDocument::new(&config, "now".into());
        let value = serde_json::to_value(&doc).unwrap();
        let loaded = ConfigDocument::from_value(value).unwrap();
        assert_eq!(loaded.into_keys(), config);
    }

    #[test]
    fn loading_rejects_invalid_key() {
        let value = json!({
            "type": "keyboard_configuration",
            "metadata": {"name": "x", "description": "", "version": "1.0"},
            "keys": {"42": [{"type": "text", "value": "a", "delay": 10}]}
        });
        let err = ConfigDocument::from_value(value).unwrap_err();
        assert!(err.to_string().contains("invalid key id 42"));
    }

    #[test]
    fn loading_rejects_other_document_types() {
        let value = json!({
            "type": "device_batch",
            "metadata": {"name": "x", "description": "", "version": "1.0"},
            "keys": {}
        });
        assert!(ConfigDocument::from_value(value).is_err());
    }

    #[test]
    fn validate_flags_too_many_actions() {
        let mut config = KeyConfig::new();
        config.set(KeyId(1), vec![Action::consumer(1, 0); 11]);
        assert_eq!(
            config.validate(),
            Err(KeyConfigError::TooManyActions { key: 1, count: 11 })
        );
    }
}
