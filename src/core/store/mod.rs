//! Loadout persistence.
//!
//! One file per loadout, `<name>.yaml`, under the base directory. Reads
//! decrypt transparently when the file is file-level ciphertext; writes
//! encrypt through a scratch file when asked to.
//!
//! There is no cross-process locking: two processes editing the same loadout
//! race and the last writer wins.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::core::cipher::{Cipher, Sops};
use crate::core::config::Settings;
use crate::core::constants::LOADOUT_EXT;
use crate::core::domain::Loadout;
use crate::core::dotenv;
use crate::core::validation::{validate_key, validate_name};
use crate::error::{CipherError, Error, LoadoutError, Result};

pub mod codec;
pub mod fs;

/// Protection requested for a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Protection {
    /// Store values as plaintext.
    #[default]
    Plain,
    /// Encrypt the new value(s) individually.
    Value,
    /// Encrypt the whole file.
    File,
}

/// Why the effective write mode differs from the requested one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeNotice {
    /// The file was already file-encrypted; value-level encryption was
    /// skipped and the file stays encrypted.
    FileEncryptionKept,
    /// Value-encrypted entries now also sit under file encryption.
    MixedUpgraded,
}

/// Effective write mode after reconciling the stored file with the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteMode {
    /// Encrypt the whole file on write.
    pub file_encrypted: bool,
    /// Encrypt new values individually.
    pub value_encrypted: bool,
    pub notice: Option<ModeNotice>,
}

impl WriteMode {
    /// Reconcile the requested protection with what is on disk.
    ///
    /// A file-encrypted loadout stays file-encrypted. Requesting file
    /// encryption over value-encrypted entries is allowed and reported.
    pub fn resolve(stored_file_encrypted: bool, had_value_encrypted: bool, requested: Protection) -> Self {
        if stored_file_encrypted {
            return Self {
                file_encrypted: true,
                value_encrypted: false,
                notice: (requested == Protection::Value).then_some(ModeNotice::FileEncryptionKept),
            };
        }

        match requested {
            Protection::File => Self {
                file_encrypted: true,
                value_encrypted: false,
                notice: had_value_encrypted.then_some(ModeNotice::MixedUpgraded),
            },
            Protection::Value => Self {
                file_encrypted: false,
                value_encrypted: true,
                notice: None,
            },
            Protection::Plain => Self {
                file_encrypted: false,
                value_encrypted: false,
                notice: None,
            },
        }
    }
}

/// Loadout storage rooted at a base directory.
pub struct Store {
    dir: PathBuf,
    cipher: Box<dyn Cipher>,
}

impl Store {
    /// Store in `dir` using `cipher` for encryption.
    pub fn new(dir: impl Into<PathBuf>, cipher: impl Cipher + 'static) -> Self {
        Self {
            dir: dir.into(),
            cipher: Box::new(cipher),
        }
    }

    /// Store in `dir` using sops as configured in `settings`.
    pub fn open(dir: impl Into<PathBuf>, settings: &Settings) -> Self {
        Self::new(dir, Sops::from_settings(&settings.sops))
    }

    pub fn cipher(&self) -> &dyn Cipher {
        self.cipher.as_ref()
    }

    /// Backing file of a loadout.
    pub fn path(&self, name: &str) -> Result<PathBuf> {
        validate_name(name)?;
        Ok(self.dir.join(format!("{}.{}", name, LOADOUT_EXT)))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path(name).map(|p| p.is_file()).unwrap_or(false)
    }

    fn existing_path(&self, name: &str) -> Result<PathBuf> {
        let path = self.path(name)?;
        if !path.is_file() {
            return Err(LoadoutError::NotFound(name.to_string()).into());
        }
        Ok(path)
    }

    /// Names of all stored loadouts, sorted.
    pub fn list(&self) -> Result<Vec<String>> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if !path.is_file() || path.extension().map_or(true, |e| e != LOADOUT_EXT) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if validate_name(stem).is_ok() {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    /// Whether the stored file is file-level ciphertext.
    pub fn is_file_encrypted(&self, name: &str) -> bool {
        self.path(name)
            .map(|p| self.cipher.is_encrypted(&p))
            .unwrap_or(false)
    }

    /// Read a loadout, decrypting the file if needed.
    ///
    /// # Errors
    ///
    /// - `LoadoutError::NotFound` if the file does not exist
    /// - `CipherError::ToolNotFound` / `CipherError::KeyRotation` when the
    ///   file cannot be decrypted (both carry a remediation hint)
    /// - `LoadoutError::Unparseable` when no format parses the content
    pub fn read(&self, name: &str) -> Result<Loadout> {
        let path = self.existing_path(name)?;

        let raw = if self.cipher.is_encrypted(&path) {
            debug!(name, "decrypting loadout");
            match self.cipher.decrypt_file(&path) {
                Ok(plaintext) => plaintext,
                Err(Error::Cipher(CipherError::NotEncrypted { stderr })) => {
                    warn!(name, %stderr, "file only looks encrypted, reading as plaintext");
                    std::fs::read(&path)?
                }
                Err(e) => return Err(e),
            }
        } else {
            std::fs::read(&path)?
        };

        let loadout = codec::decode(&raw).map_err(|reason| LoadoutError::Unparseable {
            name: name.to_string(),
            reason,
        })?;
        loadout.validate()?;

        debug!(name, entries = loadout.len(), "loadout read");
        Ok(loadout)
    }

    /// Write a loadout, optionally encrypting the whole file.
    ///
    /// With file encryption the plaintext only ever touches a scratch file
    /// that is removed whether or not encryption and the final write succeed.
    pub fn write(&self, name: &str, loadout: &Loadout, file_encryption: bool) -> Result<()> {
        let path = self.path(name)?;
        fs::ensure_private_dir(&self.dir)?;

        let doc = codec::encode(loadout)?;
        if file_encryption {
            let scratch = fs::scratch(&doc)?;
            let ciphertext = self.cipher.encrypt_file(scratch.path())?;
            fs::write_private(&path, &ciphertext)?;
        } else {
            fs::write_private(&path, &doc)?;
        }

        debug!(name, file_encryption, entries = loadout.len(), "loadout written");
        Ok(())
    }

    /// Create a new loadout, optionally seeded from a template.
    ///
    /// # Errors
    ///
    /// Returns `LoadoutError::AlreadyExists` if the name is taken.
    pub fn create(&self, name: &str, template: Option<&Loadout>, file_encryption: bool) -> Result<Loadout> {
        if self.exists(name) {
            return Err(LoadoutError::AlreadyExists(name.to_string()).into());
        }
        let loadout = template.map(Loadout::from_template).unwrap_or_default();
        self.write(name, &loadout, file_encryption)?;
        Ok(loadout)
    }

    /// Read an existing loadout or start an empty one.
    fn read_or_new(&self, name: &str) -> Result<Loadout> {
        if self.exists(name) {
            self.read(name)
        } else {
            Ok(Loadout::new())
        }
    }

    /// Set one entry, creating the loadout if needed.
    ///
    /// The write mode is re-derived from the stored file (see
    /// `WriteMode::resolve`); the returned mode tells the caller what
    /// actually happened.
    pub fn add_entry(
        &self,
        name: &str,
        key: &str,
        value: &str,
        tags: &[String],
        protection: Protection,
    ) -> Result<WriteMode> {
        validate_key(key)?;

        let stored_file_encrypted = self.is_file_encrypted(name);
        let mut loadout = self.read_or_new(name)?;
        let mode = WriteMode::resolve(
            stored_file_encrypted,
            loadout.has_value_encrypted(),
            protection,
        );
        log_notice(name, mode.notice);

        let stored_value = if mode.value_encrypted {
            self.cipher.encrypt_value(value)?
        } else {
            value.to_string()
        };

        loadout.set_entry(key, &stored_value)?;
        if !tags.is_empty() {
            loadout.merge_tags(tags);
        }

        self.write(name, &loadout, mode.file_encrypted)?;
        Ok(mode)
    }

    /// Import a dotenv file into a loadout, creating it if needed.
    ///
    /// Imported keys overwrite existing entries. Returns the imported keys.
    pub fn import(&self, name: &str, path: &Path, protection: Protection) -> Result<(Vec<String>, WriteMode)> {
        let pairs = dotenv::load(path)?;
        for (key, _) in &pairs {
            validate_key(key)?;
        }

        let stored_file_encrypted = self.is_file_encrypted(name);
        let mut loadout = self.read_or_new(name)?;
        let mode = WriteMode::resolve(
            stored_file_encrypted,
            loadout.has_value_encrypted(),
            protection,
        );
        log_notice(name, mode.notice);

        let mut imported = Vec::with_capacity(pairs.len());
        for (key, value) in pairs {
            let stored_value = if mode.value_encrypted && !value.is_empty() {
                self.cipher.encrypt_value(&value)?
            } else {
                value
            };
            loadout.set_entry(&key, &stored_value)?;
            imported.push(key);
        }

        self.write(name, &loadout, mode.file_encrypted)?;
        debug!(name, count = imported.len(), "dotenv imported");
        Ok((imported, mode))
    }

    /// Remove one entry, keeping the stored encryption mode.
    ///
    /// Returns whether the key existed.
    pub fn remove_entry(&self, name: &str, key: &str) -> Result<bool> {
        let removed = self.update(name, |loadout| loadout.remove_entry(key).is_some())?;
        Ok(removed)
    }

    /// Read-modify-write, keeping the stored encryption mode.
    pub fn update<T>(&self, name: &str, f: impl FnOnce(&mut Loadout) -> T) -> Result<T> {
        let file_encrypted = self.is_file_encrypted(name);
        let mut loadout = self.read(name)?;
        let result = f(&mut loadout);
        self.write(name, &loadout, file_encrypted)?;
        Ok(result)
    }

    /// Persist a loadout whose `loaded_at` was refreshed by an export.
    pub fn mark_loaded(&self, name: &str, loadout: &Loadout) -> Result<()> {
        let file_encrypted = self.is_file_encrypted(name);
        self.write(name, loadout, file_encrypted)
    }

    /// Names of loadouts flagged for export on login.
    ///
    /// Loadouts that cannot be read are skipped with a warning.
    pub fn login_loadouts(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for name in self.list()? {
            match self.read(&name) {
                Ok(loadout) if loadout.login() => names.push(name),
                Ok(_) => {}
                Err(e) => warn!(name, error = %e, "skipping unreadable loadout"),
            }
        }
        Ok(names)
    }

    /// Rename a loadout.
    ///
    /// # Errors
    ///
    /// `LoadoutError::NotFound` if `old` does not exist and
    /// `LoadoutError::AlreadyExists` if `new` does. Existing loadouts are
    /// never overwritten.
    pub fn rename(&self, old: &str, new: &str) -> Result<()> {
        let from = self.existing_path(old)?;
        let to = self.path(new)?;
        if to.exists() {
            return Err(LoadoutError::AlreadyExists(new.to_string()).into());
        }
        std::fs::rename(&from, &to)?;
        debug!(old, new, "loadout renamed");
        Ok(())
    }

    /// Delete a loadout's backing file.
    pub fn remove(&self, name: &str) -> Result<()> {
        let path = self.existing_path(name)?;
        std::fs::remove_file(&path)?;
        debug!(name, "loadout removed");
        Ok(())
    }
}

fn log_notice(name: &str, notice: Option<ModeNotice>) {
    match notice {
        Some(ModeNotice::FileEncryptionKept) => warn!(
            name,
            "loadout is file-encrypted; value stored under file encryption instead of value encryption"
        ),
        Some(ModeNotice::MixedUpgraded) => warn!(
            name,
            "loadout has value-encrypted entries; upgrading to file encryption"
        ),
        None => {}
    }
}
