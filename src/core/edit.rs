//! Interactive edit reconciliation.
//!
//! One pass per invocation:
//!
//! ```text
//! Reading -> Decrypting -> Editing -> Validating --ok--> Comparing -> NoOp
//!                             ^           |                    \
//!                             +--retry----+                     ReEncrypting -> Writing
//!                                         |
//!                                       abort -> Aborted
//! ```
//!
//! The editor and the retry prompt are injected so the loop can be driven
//! without a terminal.

use std::collections::BTreeMap;
use std::path::Path;
use std::process::Command;

use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::core::cipher::Cipher;
use crate::core::domain::{is_value_encrypted, Loadout};
use crate::core::store::{codec, fs, Store};
use crate::core::validation::{check_duplicate_entries, check_entry_scalars};
use crate::error::{EditError, Error, LoadoutError, Result};

/// Something that lets a human change a file in place.
pub trait Editor {
    /// Edit the file at `path`, blocking until done.
    fn edit(&self, path: &Path) -> Result<()>;
}

/// Asks whether to go back to the editor after an invalid edit.
pub trait Prompt {
    /// `true` to keep editing, `false` to discard all changes.
    fn keep_editing(&self, problem: &Error) -> Result<bool>;
}

/// How an edit session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// Nothing changed; nothing written.
    Unchanged,
    /// Changes written back.
    Saved,
}

/// External editor process, e.g. `$EDITOR`.
///
/// The command is split on whitespace, so `code --wait` works. The process
/// inherits the terminal; its exit code is ignored because whether the edit
/// counts is decided by parsing the result.
pub struct ExternalEditor {
    command: String,
}

impl ExternalEditor {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl Editor for ExternalEditor {
    fn edit(&self, path: &Path) -> Result<()> {
        let mut parts = self.command.split_whitespace();
        let program = parts.next().ok_or(EditError::NoEditor)?;

        debug!(editor = %self.command, path = %path.display(), "launching editor");
        let status = Command::new(program)
            .args(parts)
            .arg(path)
            .status()
            .map_err(|e| EditError::EditorFailed {
                editor: self.command.clone(),
                reason: e.to_string(),
            })?;

        if !status.success() {
            debug!(code = ?status.code(), "editor exited with non-zero status");
        }
        Ok(())
    }
}

/// Edit a stored loadout.
///
/// Value-encrypted entries are shown decrypted and re-encrypted on save; the
/// file keeps the encryption mode it had before the edit. `created_at` and
/// `loaded_at` cannot be changed by the editor.
///
/// # Errors
///
/// `EditError::Aborted` when the operator gives up on an invalid edit; the
/// stored loadout is untouched. Read, write and encryption errors propagate.
pub fn edit(store: &Store, name: &str, editor: &dyn Editor, prompt: &dyn Prompt) -> Result<EditOutcome> {
    if !store.exists(name) {
        return Err(LoadoutError::NotFound(name.to_string()).into());
    }
    let file_encrypted = store.is_file_encrypted(name);
    let mut original = store.read(name)?;

    let decrypted = decrypt_for_edit(store.cipher(), &mut original);
    let (created_at, loaded_at) = (original.created_at(), original.loaded_at());

    let scratch = fs::scratch(&codec::encode(&original)?)?;
    let mut edited = loop {
        editor.edit(scratch.path())?;

        match parse_edited(scratch.path()) {
            Ok(loadout) => break loadout,
            Err(problem) => {
                warn!(name, error = %problem, "edited loadout is invalid");
                if !prompt.keep_editing(&problem)? {
                    return Err(EditError::Aborted.into());
                }
            }
        }
    };

    edited.restore_timestamps(created_at, loaded_at);
    if edited.structural_eq(&original) {
        debug!(name, "no changes");
        return Ok(EditOutcome::Unchanged);
    }

    edited.touch();
    reencrypt(store.cipher(), &mut edited, &decrypted)?;
    store.write(name, &edited, file_encrypted)?;

    debug!(name, file_encrypted, "edit saved");
    Ok(EditOutcome::Saved)
}

/// Decrypt value-encrypted entries in place.
///
/// Returns every key that was encrypted with its plaintext, or `None` when
/// it failed to decrypt; those keep their ciphertext so they survive the
/// round trip.
fn decrypt_for_edit(
    cipher: &dyn Cipher,
    loadout: &mut Loadout,
) -> BTreeMap<String, Option<Zeroizing<String>>> {
    let mut decrypted = BTreeMap::new();

    for key in loadout.value_encrypted_keys() {
        let Some(ciphertext) = loadout.get(&key).map(str::to_string) else {
            continue;
        };
        let plaintext = match cipher.decrypt_value(&ciphertext) {
            Ok(plaintext) => {
                loadout.replace_value(&key, plaintext.to_string());
                Some(plaintext)
            }
            Err(e) => {
                warn!(key = %key, error = %e, "cannot decrypt entry, leaving it encrypted");
                None
            }
        };
        decrypted.insert(key, plaintext);
    }

    decrypted
}

/// Validate and parse the edited scratch file.
fn parse_edited(path: &Path) -> Result<Loadout> {
    let text = std::fs::read_to_string(path)?;
    check_duplicate_entries(&text)?;
    check_entry_scalars(&text)?;

    let loadout = codec::decode(text.as_bytes()).map_err(|reason| LoadoutError::Unparseable {
        name: path.display().to_string(),
        reason,
    })?;
    loadout.validate()?;
    Ok(loadout)
}

/// Re-encrypt entries that were encrypted before the edit.
///
/// A decrypted plaintext is always encrypted again, even when it happens to
/// start with the prefix. Other prefixed values (left encrypted after a
/// failed decrypt, or ciphertext pasted in) are kept as they are. Deleted
/// keys are skipped.
fn reencrypt(
    cipher: &dyn Cipher,
    loadout: &mut Loadout,
    decrypted: &BTreeMap<String, Option<Zeroizing<String>>>,
) -> Result<()> {
    for (key, plaintext) in decrypted {
        let Some(value) = loadout.get(key) else {
            continue;
        };
        let is_plaintext = plaintext.as_ref().is_some_and(|p| p.as_str() == value);
        if is_value_encrypted(value) && !is_plaintext {
            continue;
        }
        let ciphertext = cipher.encrypt_value(value)?;
        loadout.replace_value(key, ciphertext);
    }
    Ok(())
}
