//! Loadout document codec.
//!
//! Decoding is an ordered chain: first unwrap an opaque payload if some
//! format finds one, then parse the body with each format in turn. Adding a
//! format means adding a `Format` variant and listing it in `FORMATS`.

use serde::de::DeserializeOwned;

use crate::core::constants::PAYLOAD_KEY;
use crate::core::domain::Loadout;
use crate::error::Result;

/// A serialization format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Json,
}

/// Formats tried in order. The first one is also the write format.
pub const FORMATS: &[Format] = &[Format::Yaml, Format::Json];

impl Format {
    pub fn name(self) -> &'static str {
        match self {
            Format::Yaml => "yaml",
            Format::Json => "json",
        }
    }

    fn parse<T: DeserializeOwned>(self, bytes: &[u8]) -> std::result::Result<T, String> {
        match self {
            Format::Yaml => serde_yaml::from_slice(bytes).map_err(|e| e.to_string()),
            Format::Json => serde_json::from_slice(bytes).map_err(|e| e.to_string()),
        }
    }

    /// Body of a top-level payload key, if this format finds one.
    ///
    /// A string payload is the serialized document itself; a nested
    /// structure is re-serialized as YAML.
    fn unwrap_payload(self, bytes: &[u8]) -> Option<Vec<u8>> {
        match self {
            Format::Yaml => {
                let value: serde_yaml::Value = self.parse(bytes).ok()?;
                match value.get(PAYLOAD_KEY)? {
                    serde_yaml::Value::String(s) => Some(s.clone().into_bytes()),
                    nested => serde_yaml::to_string(nested).ok().map(String::into_bytes),
                }
            }
            Format::Json => {
                let value: serde_json::Value = self.parse(bytes).ok()?;
                match value.get(PAYLOAD_KEY)? {
                    serde_json::Value::String(s) => Some(s.clone().into_bytes()),
                    nested => serde_yaml::to_string(nested).ok().map(String::into_bytes),
                }
            }
        }
    }
}

/// Serialize a loadout in the primary format.
pub fn encode(loadout: &Loadout) -> Result<Vec<u8>> {
    Ok(serde_yaml::to_string(loadout)?.into_bytes())
}

/// Decode a loadout, unwrapping an opaque payload first.
///
/// Returns every format's complaint when nothing parses.
pub fn decode(bytes: &[u8]) -> std::result::Result<Loadout, String> {
    let unwrapped = FORMATS.iter().find_map(|f| f.unwrap_payload(bytes));
    let body = unwrapped.as_deref().unwrap_or(bytes);

    let mut failures = Vec::new();
    for format in FORMATS {
        match format.parse::<Loadout>(body) {
            Ok(loadout) => return Ok(loadout),
            Err(e) => failures.push(format!("{}: {}", format.name(), e)),
        }
    }
    Err(failures.join("; "))
}
