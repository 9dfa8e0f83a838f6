//! Keyboard configuration model: key ids, actions, presets and rendering

pub mod action;
pub mod config;
pub mod key_id;
pub mod keymap;
mod presets;
pub mod visual;

pub use action::Action;
pub use config::{ConfigDocument, DocumentMetadata, DocumentType, KeyConfig};
pub use key_id::{ExternalButton, KeyId, KeyKind};
pub use keymap::action_glyph;
pub use presets::Preset;
pub use visual::{key_label, MatrixView};
