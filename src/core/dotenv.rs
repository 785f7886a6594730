//! Dotenv import.
//!
//! Line-oriented `KEY=value` files. Blank lines, `#` comments and lines
//! without `=` are ignored; the first `=` splits key from value and both
//! sides are trimmed. Values are taken literally, quotes included.

use std::path::Path;

use crate::error::Result;

/// Parse dotenv content into ordered key/value pairs.
pub fn parse(contents: &str) -> Vec<(String, String)> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .collect()
}

/// Read and parse a dotenv file.
///
/// # Errors
///
/// Returns error if the file cannot be read.
pub fn load(path: impl AsRef<Path>) -> Result<Vec<(String, String)>> {
    let contents = std::fs::read_to_string(path)?;
    Ok(parse(&contents))
}
