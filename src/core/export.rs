//! Export resolution.
//!
//! Turns a loadout into `export KEY=VALUE` statements for a shell to `eval`.
//!
//! Each non-empty value is one of:
//! - a list reference: contains `$KEY` / `${KEY}` for its own key, e.g.
//!   `PATH=/opt/bin:$PATH`. The segments are merged into the live value,
//!   existing segments first, without duplicates.
//! - value-encrypted: decrypted through the cipher. Failures skip the entry
//!   and never abort the rest of the export.
//! - plain: other `$VAR` / `${VAR}` references are expanded from the
//!   resolver's environment; unknown ones are left as written.
//!
//! Entries are processed in key order. Every exported value is written back
//! into the resolver's environment so later entries see it, the way a shell
//! sourcing the lines in order would.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use tracing::{debug, error, warn};

use crate::core::cipher::Cipher;
use crate::core::constants::LIST_SEPARATOR;
use crate::core::domain::{is_value_encrypted, Loadout};
use crate::error::{CipherError, Error};

/// Kind of an entry value at export time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    ListReference,
    Encrypted,
    Plain,
}

/// Classify an entry value.
pub fn classify(key: &str, value: &str) -> ValueKind {
    if is_value_encrypted(value) {
        ValueKind::Encrypted
    } else if strip_self_reference(key, value).is_some() {
        ValueKind::ListReference
    } else {
        ValueKind::Plain
    }
}

/// Why an entry was left out of an export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Skip {
    /// The encryption tool is not installed.
    ToolMissing,
    /// Current keys cannot decrypt the value.
    KeyRotation,
    /// Any other decryption failure.
    DecryptFailed(String),
}

/// Result of resolving one loadout.
#[derive(Debug, Default)]
pub struct Resolution {
    /// Resolved `(key, value)` pairs in export order.
    pub exports: Vec<(String, String)>,
    /// Entries left out, with the reason.
    pub skipped: Vec<(String, Skip)>,
}

impl Resolution {
    /// Shell statements, one per export.
    pub fn lines(&self) -> Vec<String> {
        self.exports
            .iter()
            .map(|(k, v)| format!("export {}={}", k, shell_quote(v)))
            .collect()
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Resolves loadouts against a snapshot of the environment.
pub struct Resolver<'a> {
    cipher: &'a dyn Cipher,
    env: BTreeMap<String, String>,
}

impl<'a> Resolver<'a> {
    pub fn new(cipher: &'a dyn Cipher, env: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            cipher,
            env: env.into_iter().collect(),
        }
    }

    /// Resolver over the current process environment.
    pub fn from_process_env(cipher: &'a dyn Cipher) -> Self {
        Self::new(cipher, std::env::vars())
    }

    /// The environment as updated by the exports resolved so far.
    pub fn env(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    /// Resolve every entry of `loadout` and refresh its `loaded_at`.
    ///
    /// Persisting the refreshed timestamp is up to the caller.
    pub fn resolve(&mut self, loadout: &mut Loadout) -> Resolution {
        let mut resolution = Resolution::default();

        for (key, value) in loadout.entries() {
            if value.is_empty() {
                continue;
            }

            let resolved = match classify(key, value) {
                ValueKind::ListReference => Ok(self.merge_list(key, value)),
                ValueKind::Plain => Ok(expand(value, &self.env)),
                ValueKind::Encrypted => self.decrypt(key, value),
            };

            match resolved {
                Ok(resolved) => {
                    self.env.insert(key.clone(), resolved.clone());
                    resolution.exports.push((key.clone(), resolved));
                }
                Err(skip) => resolution.skipped.push((key.clone(), skip)),
            }
        }

        loadout.mark_loaded();
        debug!(
            exported = resolution.exports.len(),
            skipped = resolution.skipped.len(),
            "loadout resolved"
        );
        resolution
    }

    fn merge_list(&self, key: &str, value: &str) -> String {
        let addition = strip_self_reference(key, value).unwrap_or_default();
        let addition = expand(&addition, &self.env);
        let existing = self.env.get(key).map(String::as_str).unwrap_or_default();
        merge_segments(existing, &addition)
    }

    fn decrypt(&self, key: &str, value: &str) -> Result<String, Skip> {
        match self.cipher.decrypt_value(value) {
            Ok(plaintext) => Ok(plaintext.to_string()),
            Err(Error::Cipher(CipherError::ToolNotFound(tool))) => {
                debug!(key, tool = %tool, "encryption tool missing, skipping entry");
                Err(Skip::ToolMissing)
            }
            Err(Error::Cipher(CipherError::KeyRotation { .. })) => {
                warn!(
                    key,
                    "cannot decrypt with current keys, skipping; re-encrypt with: sops updatekeys <file>"
                );
                Err(Skip::KeyRotation)
            }
            Err(e) => {
                error!(key, error = %e, "decryption failed, skipping");
                Err(Skip::DecryptFailed(e.to_string()))
            }
        }
    }
}

/// Remove `$KEY` / `${KEY}` references to `key` from `value`.
///
/// Returns `None` when `value` does not reference `key`.
fn strip_self_reference(key: &str, value: &str) -> Option<String> {
    let braced = format!("${{{}}}", key);
    let bare = format!("${}", key);

    let mut out = String::with_capacity(value.len());
    let mut found = false;
    let mut rest = value;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if tail.starts_with(&braced) {
            found = true;
            rest = &tail[braced.len()..];
        } else if tail.starts_with(&bare) && !tail[bare.len()..].starts_with(is_name_char) {
            found = true;
            rest = &tail[bare.len()..];
        } else {
            out.push('$');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);

    found.then_some(out)
}

/// Concatenate two separator lists: existing segments first, each segment
/// once, empty segments dropped.
pub fn merge_segments(existing: &str, addition: &str) -> String {
    let mut seen = HashSet::new();
    let merged: Vec<&str> = existing
        .split(LIST_SEPARATOR)
        .chain(addition.split(LIST_SEPARATOR))
        .filter(|s| !s.is_empty() && seen.insert(*s))
        .collect();
    merged.join(LIST_SEPARATOR)
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Expand `$VAR` and `${VAR}` from `env`; unknown variables stay as written.
pub fn expand(value: &str, env: &BTreeMap<String, String>) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos + 1..];

        let (name, consumed) = if let Some(inner) = tail.strip_prefix('{') {
            match inner.find('}') {
                Some(end) => (&inner[..end], end + 2),
                None => ("", 0),
            }
        } else {
            let end = tail.find(|c: char| !is_name_char(c)).unwrap_or(tail.len());
            (&tail[..end], end)
        };

        let valid = !name.is_empty() && !name.starts_with(|c: char| c.is_ascii_digit());
        match env.get(name).filter(|_| valid) {
            Some(v) => {
                out.push_str(v);
                rest = &tail[consumed..];
            }
            None => {
                out.push('$');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Quote a value for POSIX shells, leaving simple values bare.
pub fn shell_quote(value: &str) -> String {
    let safe = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_-./:@%+,=".contains(c));
    if safe {
        value.to_string()
    } else {
        format!("'{}'", value.replace('\'', r"'\''"))
    }
}
