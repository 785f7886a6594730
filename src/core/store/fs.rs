//! Filesystem helpers.
//!
//! Owner-only file writes and scratch files for subprocess interchange.
//! Scratch files are `NamedTempFile`s: they are removed when dropped, on
//! every exit path.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::core::constants::LOADOUT_EXT;
use crate::error::Result;

/// Create a scratch file holding `contents`.
///
/// The `.yaml` suffix lets the encryption tool infer the document type.
pub fn scratch(contents: &[u8]) -> Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix(".loadout-")
        .suffix(&format!(".{}", LOADOUT_EXT))
        .rand_bytes(12)
        .tempfile()?;
    file.write_all(contents)?;
    file.flush()?;
    Ok(file)
}

/// Create `dir` (and parents) readable by the owner only.
pub fn ensure_private_dir(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(dir)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(dir, fs::Permissions::from_mode(0o700))?;
    }

    Ok(())
}

/// Atomically replace `path` with `contents`, mode 0600.
///
/// The data is staged in a sibling temp file and renamed into place, so a
/// failed write never leaves a truncated loadout behind.
pub fn write_private(path: &Path, contents: &[u8]) -> Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let mut staged = NamedTempFile::new_in(parent)?;
    staged.write_all(contents)?;
    staged.flush()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(staged.path(), fs::Permissions::from_mode(0o600))?;
    }

    staged.persist(path).map_err(|e| e.error)?;
    Ok(())
}
