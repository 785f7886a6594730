//! Single-value envelope.
//!
//! Value-level encryption wraps the plaintext in a `value: <plaintext>`
//! document so the file-oriented tool can encrypt it.

use serde::{Deserialize, Serialize};

use crate::core::constants::VALUE_FIELD;
use crate::error::Result;

#[derive(Serialize, Deserialize)]
struct ValueDoc {
    value: String,
}

/// Serialize a plaintext value into its one-field document.
pub fn wrap(plaintext: &str) -> Result<String> {
    Ok(serde_yaml::to_string(&ValueDoc {
        value: plaintext.to_string(),
    })?)
}

/// Pull the plaintext back out of a decrypted one-field document.
///
/// Structured parsing first; if the tool output is not well-formed, fall back
/// to scanning for the `value:` line.
pub fn extract(decrypted: &str) -> Option<String> {
    if let Ok(doc) = serde_yaml::from_str::<ValueDoc>(decrypted) {
        return Some(doc.value);
    }
    if let Ok(doc) = serde_json::from_str::<ValueDoc>(decrypted) {
        return Some(doc.value);
    }
    scan(decrypted)
}

fn scan(text: &str) -> Option<String> {
    let marker = format!("{}:", VALUE_FIELD);
    text.lines()
        .find_map(|line| line.trim_start().strip_prefix(marker.as_str()))
        .map(|rest| unquote(rest.trim()))
}

fn unquote(raw: &str) -> String {
    for quote in ['"', '\''] {
        if raw.len() >= 2 && raw.starts_with(quote) && raw.ends_with(quote) {
            return raw[1..raw.len() - 1].to_string();
        }
    }
    raw.to_string()
}
