//! Encryption gateway.
//!
//! Loadout never does cryptography itself. An external tool (sops by
//! default) encrypts and decrypts whole files; single values are wrapped in a
//! one-field document and pushed through the same file operations.
//!
//! ## Adding a New Backend
//!
//! 1. Implement `encrypt_file` and `decrypt_file` of the `Cipher` trait
//! 2. Map tool failures onto `CipherError` (see `classify`)
//! 3. Re-export from this module
//!
//! Detection and value-level encryption come for free from the default
//! methods.

use std::path::Path;

use tracing::trace;
use zeroize::Zeroizing;

use crate::core::constants::VALUE_PREFIX;
use crate::core::store::fs;
use crate::error::{CipherError, Result};

pub mod classify;
pub mod detect;
pub mod envelope;
mod sops;

pub use sops::Sops;

/// Encryption backend.
///
/// Every call may block for the lifetime of the tool subprocess. Each value
/// operation owns its own scratch file, so implementations without shared
/// mutable state are safe to call from several threads at once.
pub trait Cipher: Send + Sync {
    /// Backend name for display.
    fn name(&self) -> &'static str;

    /// Encrypt the file at `path`, returning the ciphertext document.
    ///
    /// # Errors
    ///
    /// `CipherError::ToolNotFound` if the tool is not installed,
    /// `CipherError::Failed` (or a classified sub-case) on a non-zero exit.
    fn encrypt_file(&self, path: &Path) -> Result<Vec<u8>>;

    /// Decrypt the file at `path`, returning the plaintext document.
    ///
    /// # Errors
    ///
    /// Same as `encrypt_file`; `CipherError::KeyRotation` and
    /// `CipherError::NotEncrypted` are split out of ordinary failures.
    fn decrypt_file(&self, path: &Path) -> Result<Vec<u8>>;

    /// Whether the file at `path` is a file-level ciphertext document.
    ///
    /// Never fails: missing or malformed files are reported as plaintext.
    fn is_encrypted(&self, path: &Path) -> bool {
        detect::is_encrypted_path(path)
    }

    /// Encrypt one value into its prefixed inline form.
    fn encrypt_value(&self, plaintext: &str) -> Result<String> {
        let doc = Zeroizing::new(envelope::wrap(plaintext)?);
        let scratch = fs::scratch(doc.as_bytes())?;
        let ciphertext = self.encrypt_file(scratch.path())?;
        let ciphertext = String::from_utf8(ciphertext).map_err(|_| CipherError::Utf8)?;

        trace!(ciphertext_len = ciphertext.len(), "encrypted value");
        Ok(format!("{}{}", VALUE_PREFIX, ciphertext))
    }

    /// Decrypt an inline value. The prefix is optional.
    fn decrypt_value(&self, value: &str) -> Result<Zeroizing<String>> {
        let ciphertext = value.strip_prefix(VALUE_PREFIX).unwrap_or(value);
        let scratch = fs::scratch(ciphertext.as_bytes())?;
        let plaintext = self.decrypt_file(scratch.path())?;
        let plaintext =
            Zeroizing::new(String::from_utf8(plaintext).map_err(|_| CipherError::Utf8)?);

        let value = envelope::extract(&plaintext).ok_or_else(|| CipherError::Failed {
            stderr: "decrypted value document has no 'value' field".to_string(),
            code: None,
        })?;
        trace!(plaintext_len = value.len(), "decrypted value");
        Ok(Zeroizing::new(value))
    }
}
