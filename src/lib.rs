//! Scanpad Examples - interactive helpers for scanpad device examples
//!
//! Terminal menus and prompts, a JSON library browser, and a keyboard
//! configuration builder that exports key mappings as JSON documents or QR
//! command images for device provisioning.

pub mod builder;
pub mod config;
pub mod error;
pub mod export;
pub mod json_browser;
pub mod keyboard;
pub mod ui;
pub mod utils;

pub use builder::{BuilderOptions, KeyboardConfigBuilder};
pub use config::Config;
pub use json_browser::{JsonBrowser, JsonCategory};
