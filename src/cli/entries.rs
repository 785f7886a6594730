//! Entry commands: set, unset, import.

use std::path::Path;

use tracing::info;

use crate::cli::{output, Context};
use crate::core::domain::tags;
use crate::core::store::{ModeNotice, Protection, WriteMode};
use crate::error::Result;

/// Set one entry.
pub fn set(
    ctx: &Context,
    name: &str,
    key: &str,
    value: &str,
    protection: Protection,
    tag_list: Option<&str>,
) -> Result<()> {
    info!("Setting {} in {}", key, name);

    let new_tags = tag_list.map(tags::split).unwrap_or_default();
    let mode = ctx.store.add_entry(name, key, value, &new_tags, protection)?;

    report_mode(mode);
    output::success(&format!(
        "set {} in {}{}",
        output::key(key),
        output::name(name),
        describe_mode(mode)
    ));
    Ok(())
}

/// Remove one entry.
pub fn unset(ctx: &Context, name: &str, key: &str) -> Result<()> {
    if ctx.store.remove_entry(name, key)? {
        output::success(&format!(
            "removed {} from {}",
            output::key(key),
            output::name(name)
        ));
    } else {
        output::warn(&format!(
            "{} has no entry {}",
            output::name(name),
            output::key(key)
        ));
    }
    Ok(())
}

/// Import a dotenv file.
pub fn import(ctx: &Context, name: &str, path: &Path, protection: Protection) -> Result<()> {
    info!("Importing {} into {}", path.display(), name);

    let (keys, mode) = ctx.store.import(name, path, protection)?;

    report_mode(mode);
    output::success(&format!(
        "imported {} entries into {}{}",
        keys.len(),
        output::name(name),
        describe_mode(mode)
    ));
    for key in &keys {
        output::list_item(key);
    }
    Ok(())
}

fn report_mode(mode: WriteMode) {
    match mode.notice {
        Some(ModeNotice::FileEncryptionKept) => {
            output::hint("loadout is file-encrypted; the value is protected by file encryption")
        }
        Some(ModeNotice::MixedUpgraded) => {
            output::hint("value-encrypted entries are now also under file encryption")
        }
        None => {}
    }
}

fn describe_mode(mode: WriteMode) -> &'static str {
    if mode.file_encrypted {
        " (file encrypted)"
    } else if mode.value_encrypted {
        " (value encrypted)"
    } else {
        ""
    }
}
