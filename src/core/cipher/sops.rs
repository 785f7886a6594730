//! sops cipher backend.
//!
//! Runs the `sops` CLI as a subprocess. Keys, recipients and creation rules
//! are entirely sops' business (`.sops.yaml`, `SOPS_AGE_KEY_FILE`, KMS
//! credentials and so on).
//!
//! ## Requirements
//!
//! - `sops` must be installed and on `PATH` (or configured in `config.toml`)
//! - A creation rule or key flags must be available for encryption

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, trace};

use super::{classify::classify, Cipher};
use crate::core::config::SopsSettings;
use crate::core::constants::SOPS_BINARY;
use crate::error::{CipherError, Result};

/// sops backend using the sops CLI.
#[derive(Debug, Clone)]
pub struct Sops {
    binary: String,
    args: Vec<String>,
}

impl Sops {
    /// Backend using `binary` with extra arguments placed before the path.
    pub fn new(binary: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            binary: binary.into(),
            args,
        }
    }

    /// Backend configured from the `[sops]` table of `config.toml`.
    pub fn from_settings(settings: &SopsSettings) -> Self {
        Self::new(
            settings
                .binary
                .clone()
                .unwrap_or_else(|| SOPS_BINARY.to_string()),
            settings.args.clone(),
        )
    }

    /// Resolve the binary on the search path.
    fn locate(&self) -> Result<PathBuf> {
        which::which(&self.binary)
            .map_err(|_| CipherError::ToolNotFound(self.binary.clone()).into())
    }

    fn run(&self, mode: &str, path: &Path) -> Result<Vec<u8>> {
        let binary = self.locate()?;
        debug!(binary = %binary.display(), mode, path = %path.display(), "running sops");

        let output = Command::new(&binary)
            .arg(mode)
            .args(&self.args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => CipherError::ToolNotFound(self.binary.clone()),
                _ => CipherError::Spawn(e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            trace!(code = ?output.status.code(), "sops failed");
            return Err(classify(&stderr, output.status.code()).into());
        }

        trace!(output_len = output.stdout.len(), mode, "sops succeeded");
        Ok(output.stdout)
    }
}

impl Default for Sops {
    fn default() -> Self {
        Self::new(SOPS_BINARY, Vec::new())
    }
}

impl Cipher for Sops {
    fn name(&self) -> &'static str {
        "sops"
    }

    fn encrypt_file(&self, path: &Path) -> Result<Vec<u8>> {
        self.run("--encrypt", path)
    }

    fn decrypt_file(&self, path: &Path) -> Result<Vec<u8>> {
        self.run("--decrypt", path)
    }
}
