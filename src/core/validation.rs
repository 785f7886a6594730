//! Input validation.
//!
//! Validates entry keys, loadout names, and the raw text of edited documents.

use std::collections::HashMap;

use crate::error::{LoadoutError, Result, ValidationError};

/// Validate an entry key.
///
/// Entry keys must be valid environment variable names:
/// - Only A-Z, a-z, 0-9, and underscore
/// - Cannot start with a digit
/// - Cannot be empty
///
/// # Errors
///
/// Returns `ValidationError` if the key is invalid.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(ValidationError::EmptyKey.into());
    }

    if key.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidKey {
            key: key.to_string(),
            reason: "cannot start with a digit".to_string(),
        }
        .into());
    }

    for (i, ch) in key.chars().enumerate() {
        if !ch.is_ascii_alphanumeric() && ch != '_' {
            return Err(ValidationError::InvalidKey {
                key: key.to_string(),
                reason: format!(
                    "invalid character '{}' at position {}. Only letters, digits, and underscore are allowed",
                    ch,
                    i + 1
                ),
            }
            .into());
        }
    }

    Ok(())
}

/// Validate a loadout name.
///
/// Names become file names, so they cannot be empty, contain path
/// separators, or start with a dot.
pub fn validate_name(name: &str) -> Result<()> {
    let bad = name.trim().is_empty()
        || name.starts_with('.')
        || name.contains('/')
        || name.contains('\\')
        || name.contains('\0');
    if bad {
        return Err(LoadoutError::InvalidName(name.to_string()).into());
    }
    Ok(())
}

/// Reject an edited document whose `entries` section repeats a key.
///
/// A plain parse keeps the last duplicate and silently drops the others, so
/// this runs on the raw text first. Only lines at the indentation of the
/// first child of the top-level `entries:` line are considered keys.
///
/// # Errors
///
/// Returns `ValidationError::DuplicateKey` with the 1-based line number of
/// the second occurrence.
pub fn check_duplicate_entries(text: &str) -> Result<()> {
    let mut seen: HashMap<String, usize> = HashMap::new();

    for entry in entry_lines(text) {
        if seen.insert(entry.key.clone(), entry.line).is_some() {
            return Err(ValidationError::DuplicateKey {
                key: entry.key,
                line: entry.line,
            }
            .into());
        }
    }

    Ok(())
}

/// Reject unquoted entry values that would not be stored as written.
///
/// YAML reads `1.10` as the float `1.1` and `0x1F` as the integer `31`.
/// Entries keep scalars in their canonical text form, so such spellings
/// must be quoted to survive.
///
/// # Errors
///
/// Returns `ValidationError::LossyScalar` for the first offending entry.
pub fn check_entry_scalars(text: &str) -> Result<()> {
    for entry in entry_lines(text) {
        let Some(stored) = canonical_scalar(entry.value) else {
            continue;
        };
        if stored != entry.value {
            return Err(ValidationError::LossyScalar {
                key: entry.key,
                line: entry.line,
                written: entry.value.to_string(),
                stored,
            }
            .into());
        }
    }
    Ok(())
}

/// A direct child of the top-level `entries` mapping.
struct EntryLine<'a> {
    line: usize,
    key: String,
    value: &'a str,
}

fn entry_lines(text: &str) -> Vec<EntryLine<'_>> {
    let mut entries = Vec::new();
    let mut in_entries = false;
    let mut child_indent: Option<usize> = None;

    for (idx, line) in text.lines().enumerate() {
        let content = line.trim_start();
        if content.is_empty() || content.starts_with('#') {
            continue;
        }

        let indent = line.len() - content.len();
        if indent == 0 {
            in_entries = mapping_entry(content)
                .is_some_and(|(key, value)| key == "entries" && value.is_empty());
            child_indent = None;
            continue;
        }
        if !in_entries {
            continue;
        }

        if *child_indent.get_or_insert(indent) != indent {
            continue;
        }

        if let Some((key, value)) = mapping_entry(content) {
            entries.push(EntryLine {
                line: idx + 1,
                key,
                value,
            });
        }
    }

    entries
}

/// Key and comment-free value of a `key: value` line, handling quoted keys.
fn mapping_entry(content: &str) -> Option<(String, &str)> {
    for quote in ['"', '\''] {
        if let Some(rest) = content.strip_prefix(quote) {
            let end = rest.find(quote)?;
            let value = rest[end + 1..].trim_start().strip_prefix(':')?;
            return Some((rest[..end].to_string(), strip_comment(value)));
        }
    }

    let content = content.trim_end();
    let (key, value) = match content.find(": ") {
        Some(end) => (&content[..end], &content[end + 2..]),
        None => (content.strip_suffix(':')?, ""),
    };
    Some((key.trim_end().to_string(), strip_comment(value)))
}

/// Drop a trailing `# comment`. Quoted values are returned whole.
fn strip_comment(value: &str) -> &str {
    let value = value.trim();
    if value.starts_with(['"', '\'']) {
        return value;
    }
    if value.starts_with('#') {
        return "";
    }
    match value.find(" #") {
        Some(end) => value[..end].trim_end(),
        None => value,
    }
}

/// The text a plain null, number or boolean is stored as, `None` for
/// anything else.
fn canonical_scalar(value: &str) -> Option<String> {
    if value.is_empty() || value.starts_with(['"', '\'', '|', '>', '&', '*', '!', '[', '{']) {
        return None;
    }

    match serde_yaml::from_str::<serde_yaml::Value>(value).ok()? {
        serde_yaml::Value::Null => Some(String::new()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        serde_yaml::Value::Number(n) => n
            .as_i64()
            .map(|i| i.to_string())
            .or_else(|| n.as_u64().map(|u| u.to_string()))
            .or_else(|| n.as_f64().map(|f| f.to_string())),
        _ => None,
    }
}
