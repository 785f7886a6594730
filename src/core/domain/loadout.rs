//! Loadout type.
//!
//! A named collection of environment entries plus a small metadata envelope.
//! Fields are only mutated through the methods below so `updated_at` stays
//! honest.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Local, SubsecRound};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};

use super::tags;
use crate::core::constants::VALUE_PREFIX;
use crate::error::{Result, ValidationError};

/// Timestamp with local timezone, second resolution.
pub type Timestamp = DateTime<Local>;

/// Current time truncated to whole seconds.
pub fn now() -> Timestamp {
    Local::now().trunc_subsecs(0)
}

/// Metadata envelope of a loadout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default = "now")]
    created_at: Timestamp,
    #[serde(default = "now")]
    loaded_at: Timestamp,
    #[serde(default = "now")]
    updated_at: Timestamp,
    /// Export automatically on shell login.
    #[serde(default)]
    login: bool,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    description: String,
}

/// A named set of environment entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loadout {
    metadata: Metadata,
    #[serde(default, deserialize_with = "lenient_entries")]
    entries: BTreeMap<String, String>,
}

impl Loadout {
    /// Create an empty loadout with all timestamps set to now.
    pub fn new() -> Self {
        let ts = now();
        Self {
            metadata: Metadata {
                created_at: ts,
                loaded_at: ts,
                updated_at: ts,
                login: false,
                tags: Vec::new(),
                description: String::new(),
            },
            entries: BTreeMap::new(),
        }
    }

    /// Create a fresh loadout seeded from a template.
    ///
    /// Entries, tags, description and login flag are copied; timestamps are
    /// new.
    pub fn from_template(template: &Loadout) -> Self {
        let mut loadout = Self::new();
        loadout.entries = template.entries.clone();
        loadout.metadata.tags = template.metadata.tags.clone();
        loadout.metadata.description = template.metadata.description.clone();
        loadout.metadata.login = template.metadata.login;
        loadout
    }

    pub fn entries(&self) -> &BTreeMap<String, String> {
        &self.entries
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn created_at(&self) -> Timestamp {
        self.metadata.created_at
    }

    pub fn loaded_at(&self) -> Timestamp {
        self.metadata.loaded_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.metadata.updated_at
    }

    pub fn login(&self) -> bool {
        self.metadata.login
    }

    pub fn tags(&self) -> &[String] {
        &self.metadata.tags
    }

    pub fn description(&self) -> &str {
        &self.metadata.description
    }

    /// Whether any entry carries value-level encryption.
    pub fn has_value_encrypted(&self) -> bool {
        self.entries.values().any(|v| is_value_encrypted(v))
    }

    /// Keys of value-encrypted entries.
    pub fn value_encrypted_keys(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, v)| is_value_encrypted(v))
            .map(|(k, _)| k.clone())
            .collect()
    }

    /// Insert or overwrite an entry.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyKey` if `key` is empty.
    pub fn set_entry(&mut self, key: &str, value: &str) -> Result<()> {
        if key.is_empty() {
            return Err(ValidationError::EmptyKey.into());
        }
        self.entries.insert(key.to_string(), value.to_string());
        self.touch();
        Ok(())
    }

    /// Remove an entry, returning its value if it existed.
    pub fn remove_entry(&mut self, key: &str) -> Option<String> {
        let removed = self.entries.remove(key);
        if removed.is_some() {
            self.touch();
        }
        removed
    }

    /// Add tags to the existing set.
    pub fn merge_tags(&mut self, new: &[String]) {
        self.metadata.tags = tags::merge(&self.metadata.tags, new);
        self.touch();
    }

    /// Replace the tag set.
    pub fn replace_tags(&mut self, new: &[String]) {
        self.metadata.tags = tags::dedupe(new.iter().cloned());
        self.touch();
    }

    /// Remove tags from the set.
    pub fn remove_tags(&mut self, remove: &[String]) {
        self.metadata.tags = tags::remove(&self.metadata.tags, remove);
        self.touch();
    }

    pub fn set_description(&mut self, description: &str) {
        self.metadata.description = description.to_string();
        self.touch();
    }

    pub fn set_login(&mut self, login: bool) {
        self.metadata.login = login;
        self.touch();
    }

    /// Refresh `updated_at`.
    pub fn touch(&mut self) {
        self.metadata.updated_at = now();
    }

    /// Refresh `loaded_at`. Called after an export.
    pub fn mark_loaded(&mut self) {
        self.metadata.loaded_at = now();
    }

    /// Deep comparison of metadata and entries.
    ///
    /// Tags compare as sets so a pure reordering is not a change.
    pub fn structural_eq(&self, other: &Loadout) -> bool {
        let (a, b) = (&self.metadata, &other.metadata);
        a.created_at == b.created_at
            && a.loaded_at == b.loaded_at
            && a.updated_at == b.updated_at
            && a.login == b.login
            && a.description == b.description
            && tags::same_set(&a.tags, &b.tags)
            && self.entries == other.entries
    }

    /// Overwrite a value without refreshing `updated_at`.
    ///
    /// Used when swapping between ciphertext and plaintext forms of the same
    /// entry, which is not a user mutation.
    pub(crate) fn replace_value(&mut self, key: &str, value: String) {
        if let Some(slot) = self.entries.get_mut(key) {
            *slot = value;
        }
    }

    /// Carry over timestamps the editor must not change.
    pub(crate) fn restore_timestamps(&mut self, created_at: Timestamp, loaded_at: Timestamp) {
        self.metadata.created_at = created_at;
        self.metadata.loaded_at = loaded_at;
    }

    /// Reject documents carrying an empty entry key.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.entries.contains_key("") {
            return Err(ValidationError::EmptyKey.into());
        }
        Ok(())
    }
}

impl Default for Loadout {
    fn default() -> Self {
        Self::new()
    }
}

/// Hand-edited files write `PORT: 8080` and `DEBUG: true`; entries accept
/// any scalar and store its canonical text form, so `0x1F` becomes `31`.
/// The edit path rejects such spellings before they get here.
fn lenient_entries<'de, D>(deserializer: D) -> std::result::Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<Scalar, Scalar>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(k, v)| (k.0, v.0))
        .collect())
}

#[derive(PartialEq, Eq, PartialOrd, Ord)]
struct Scalar(String);

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(ScalarVisitor)
    }
}

struct ScalarVisitor;

impl<'de> Visitor<'de> for ScalarVisitor {
    type Value = Scalar;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a string, number, boolean or null")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Scalar, E> {
        Ok(Scalar(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<Scalar, E> {
        Ok(Scalar(v))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<Scalar, E> {
        Ok(Scalar(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Scalar, E> {
        Ok(Scalar(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Scalar, E> {
        Ok(Scalar(v.to_string()))
    }

    fn visit_i128<E: de::Error>(self, v: i128) -> std::result::Result<Scalar, E> {
        Ok(Scalar(v.to_string()))
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> std::result::Result<Scalar, E> {
        Ok(Scalar(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Scalar, E> {
        Ok(Scalar(v.to_string()))
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<Scalar, E> {
        Ok(Scalar(String::new()))
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<Scalar, E> {
        Ok(Scalar(String::new()))
    }
}

/// Whether a stored value carries the value-encryption prefix.
pub fn is_value_encrypted(value: &str) -> bool {
    value.starts_with(VALUE_PREFIX)
}
