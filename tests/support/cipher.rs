//! In-memory cipher for flows that need the encryption gateway.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use loadout::core::cipher::Cipher;
use loadout::error::{CipherError, Result};

/// How the fake answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    /// Encrypt and decrypt succeed.
    Working,
    /// Every call fails as if sops were not installed.
    Missing,
    /// Encryption works, decryption fails as if keys were rotated.
    Rotated,
}

/// Call counters shared with the test after the cipher moves into a store.
#[derive(Debug, Default)]
pub struct Calls {
    pub encrypt: AtomicUsize,
    pub decrypt: AtomicUsize,
}

impl Calls {
    pub fn encrypts(&self) -> usize {
        self.encrypt.load(Ordering::SeqCst)
    }

    pub fn decrypts(&self) -> usize {
        self.decrypt.load(Ordering::SeqCst)
    }
}

/// Wraps documents under a `sops` metadata key, like the real tool's shape.
pub struct FakeCipher {
    behavior: Behavior,
    calls: Arc<Calls>,
}

impl FakeCipher {
    pub fn new() -> Self {
        Self::with(Behavior::Working)
    }

    pub fn with(behavior: Behavior) -> Self {
        Self {
            behavior,
            calls: Arc::new(Calls::default()),
        }
    }

    /// Handle on the call counters.
    pub fn calls(&self) -> Arc<Calls> {
        Arc::clone(&self.calls)
    }
}

impl Cipher for FakeCipher {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn encrypt_file(&self, path: &Path) -> Result<Vec<u8>> {
        self.calls.encrypt.fetch_add(1, Ordering::SeqCst);
        if self.behavior == Behavior::Missing {
            return Err(CipherError::ToolNotFound("sops".to_string()).into());
        }
        let plaintext = std::fs::read_to_string(path)?;
        let doc = serde_json::json!({
            "sealed": plaintext,
            "sops": { "version": "fake" },
        });
        Ok(serde_yaml::to_string(&doc)?.into_bytes())
    }

    fn decrypt_file(&self, path: &Path) -> Result<Vec<u8>> {
        self.calls.decrypt.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            Behavior::Missing => Err(CipherError::ToolNotFound("sops".to_string()).into()),
            Behavior::Rotated => Err(CipherError::KeyRotation {
                stderr: "Failed to get the data key required to decrypt the SOPS file".to_string(),
            }
            .into()),
            Behavior::Working => {
                let doc: serde_yaml::Value = serde_yaml::from_slice(&std::fs::read(path)?)?;
                match doc.get("sealed").and_then(|v| v.as_str()) {
                    Some(plaintext) => Ok(plaintext.as_bytes().to_vec()),
                    None => Err(CipherError::NotEncrypted {
                        stderr: "sops metadata not found".to_string(),
                    }
                    .into()),
                }
            }
        }
    }
}
