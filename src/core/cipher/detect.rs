//! Encrypted-document detection.
//!
//! A document counts as file-level ciphertext when its top-level mapping has
//! the sops metadata key or the opaque payload key. Detection is advisory and
//! never fails: calling a plaintext file encrypted is worse than the reverse.

use std::path::Path;

use tracing::trace;

use crate::core::constants::{METADATA_KEY, PAYLOAD_KEY};

/// Top-level mapping keys of a document, trying YAML then JSON.
fn top_level_keys(bytes: &[u8]) -> Option<Vec<String>> {
    if let Ok(serde_yaml::Value::Mapping(map)) = serde_yaml::from_slice::<serde_yaml::Value>(bytes)
    {
        return Some(
            map.keys()
                .filter_map(|k| k.as_str().map(str::to_string))
                .collect(),
        );
    }

    if let Ok(serde_json::Value::Object(map)) = serde_json::from_slice::<serde_json::Value>(bytes)
    {
        return Some(map.keys().cloned().collect());
    }

    None
}

/// Whether raw document bytes look like file-level ciphertext.
pub fn is_encrypted_bytes(bytes: &[u8]) -> bool {
    top_level_keys(bytes)
        .map(|keys| keys.iter().any(|k| k == METADATA_KEY || k == PAYLOAD_KEY))
        .unwrap_or(false)
}

/// Whether the file at `path` looks like file-level ciphertext.
///
/// Missing, unreadable or unparseable files are plaintext.
pub fn is_encrypted_path(path: &Path) -> bool {
    match std::fs::read(path) {
        Ok(bytes) => {
            let encrypted = is_encrypted_bytes(&bytes);
            trace!(path = %path.display(), encrypted, "detected encryption mode");
            encrypted
        }
        Err(_) => false,
    }
}
