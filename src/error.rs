//! Error types shared across the crate

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while talking to the operator
#[derive(Debug, Error)]
pub enum UiError {
    /// Operator pressed Ctrl-C or closed the input stream
    #[error("operation cancelled")]
    Interrupted,
    /// Terminal read or write failed
    #[error("terminal I/O error: {0}")]
    Io(#[from] io::Error),
}

impl UiError {
    pub fn is_interrupted(&self) -> bool {
        matches!(self, UiError::Interrupted)
    }
}

/// Validation failures for a single action
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ActionError {
    #[error("text is empty")]
    EmptyText,
    #[error("text too long ({0} bytes, max 8 UTF-8 bytes)")]
    TextTooLong(usize),
    #[error("modifier {0} out of range (0-15)")]
    InvalidModifier(u8),
}

/// Validation failures for a whole keyboard configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyConfigError {
    #[error("invalid key id {0}")]
    InvalidKeyId(u16),
    #[error("key {0} has no actions")]
    EmptyActions(u16),
    #[error("key {key} has {count} actions (max 10)")]
    TooManyActions { key: u16, count: usize },
    #[error("key {key}, action {index}: {source}")]
    InvalidAction {
        key: u16,
        index: usize,
        #[source]
        source: ActionError,
    },
}

/// Failures reading or writing JSON files
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid JSON in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("cannot serialize JSON: {0}")]
    Serialize(#[source] serde_json::Error),
}
