//! Shared utility functions

use chrono::Local;

/// Timestamp written into exported documents, e.g. `2024-05-01 14:03:22`
pub fn document_timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Timestamp used in generated file names, e.g. `20240501_140322`
pub fn file_timestamp() -> String {
    Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Turn a file stem into a menu label: `usb_hid_test` -> `Usb Hid Test`.
///
/// Letters following a non-letter are upper-cased, all others lower-cased.
pub fn title_case(stem: &str) -> String {
    let mut out = String::with_capacity(stem.len());
    let mut at_word_start = true;
    for ch in stem.replace('_', " ").chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}
