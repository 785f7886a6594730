//! Loadout-level commands: new, list, show, rename, rm, tags, description,
//! login flag.

use std::io::{self, IsTerminal};

use dialoguer::Confirm;
use serde::Serialize;
use tracing::info;

use crate::cli::{output, Context};
use crate::core::domain::{tags, Loadout};
use crate::core::export::{classify, ValueKind};
use crate::core::template::TemplateCatalog;
use crate::error::{LoadoutError, Result};

/// Create a loadout.
pub fn new(
    ctx: &Context,
    name: &str,
    template: Option<&str>,
    tag_list: Option<&str>,
    description: Option<&str>,
    encrypt_file: bool,
) -> Result<()> {
    info!("Creating loadout: {}", name);

    let catalog;
    let seed = match template {
        Some(t) => {
            catalog = TemplateCatalog::load(&ctx.base)?;
            Some(catalog.get(t)?)
        }
        None => None,
    };

    let mut loadout = ctx.store.create(name, seed, encrypt_file)?;

    if tag_list.is_some() || description.is_some() {
        if let Some(list) = tag_list {
            loadout.merge_tags(&tags::split(list));
        }
        if let Some(d) = description {
            loadout.set_description(d);
        }
        ctx.store.write(name, &loadout, encrypt_file)?;
    }

    output::success(&format!("created {}", output::name(name)));
    Ok(())
}

#[derive(Serialize)]
struct Summary {
    name: String,
    entries: usize,
    tags: Vec<String>,
    login: bool,
    description: String,
    file_encrypted: bool,
}

/// List loadouts, or templates.
pub fn list(ctx: &Context, tag: Option<&str>, templates: bool, json: bool) -> Result<()> {
    if templates {
        let catalog = TemplateCatalog::load(&ctx.base)?;
        let names: Vec<&str> = catalog.names().collect();
        if json {
            println!("{}", serde_json::to_string_pretty(&names)?);
        } else if names.is_empty() {
            output::dimmed("no templates");
        } else {
            for name in names {
                output::list_item(name);
            }
        }
        return Ok(());
    }

    let mut summaries = Vec::new();
    for name in ctx.store.list()? {
        let loadout = match ctx.store.read(&name) {
            Ok(l) => l,
            Err(e) => {
                output::warn(&format!("{}: {}", output::name(&name), e));
                continue;
            }
        };
        if tag.is_some_and(|t| !loadout.tags().iter().any(|x| x == t)) {
            continue;
        }
        summaries.push(Summary {
            file_encrypted: ctx.store.is_file_encrypted(&name),
            entries: loadout.len(),
            tags: loadout.tags().to_vec(),
            login: loadout.login(),
            description: loadout.description().to_string(),
            name,
        });
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    if summaries.is_empty() {
        output::dimmed("no loadouts");
        return Ok(());
    }

    for s in &summaries {
        let mut line = format!("{} ({} entries)", s.name, s.entries);
        if !s.tags.is_empty() {
            line.push_str(&format!(" [{}]", s.tags.join(", ")));
        }
        if s.login {
            line.push_str(" login");
        }
        if s.file_encrypted {
            line.push_str(" encrypted");
        }
        if !s.description.is_empty() {
            line.push_str(&format!(" - {}", s.description));
        }
        println!("{}", line);
    }
    Ok(())
}

/// Show metadata and entries.
///
/// Value-encrypted entries are masked unless `decrypt` is set; a value
/// that cannot be decrypted is shown masked with a warning.
pub fn show(ctx: &Context, name: &str, decrypt: bool) -> Result<()> {
    let loadout = ctx.store.read(name)?;

    output::header(name);
    print_metadata(ctx, name, &loadout);

    if loadout.is_empty() {
        output::dimmed("  (no entries)");
        return Ok(());
    }

    println!();
    for (key, value) in loadout.entries() {
        let shown = match classify(key, value) {
            ValueKind::Encrypted if decrypt => match ctx.store.cipher().decrypt_value(value) {
                Ok(plaintext) => plaintext.to_string(),
                Err(e) => {
                    output::warn(&format!("{}: {}", output::key(key), e));
                    "<encrypted>".to_string()
                }
            },
            ValueKind::Encrypted => "<encrypted>".to_string(),
            _ => value.clone(),
        };
        println!("  {}={}", key, shown);
    }
    Ok(())
}

fn print_metadata(ctx: &Context, name: &str, loadout: &Loadout) {
    let fmt = "%Y-%m-%d %H:%M:%S";
    if !loadout.description().is_empty() {
        output::kv("description:", loadout.description());
    }
    if !loadout.tags().is_empty() {
        output::kv("tags:       ", loadout.tags().join(", "));
    }
    output::kv("login:      ", if loadout.login() { "on" } else { "off" });
    if ctx.store.is_file_encrypted(name) {
        output::kv("encryption: ", "file");
    } else if loadout.has_value_encrypted() {
        output::kv("encryption: ", "values");
    }
    output::kv("created:    ", loadout.created_at().format(fmt));
    output::kv("updated:    ", loadout.updated_at().format(fmt));
    output::kv("loaded:     ", loadout.loaded_at().format(fmt));
}

/// Rename a loadout.
pub fn rename(ctx: &Context, old: &str, new: &str) -> Result<()> {
    ctx.store.rename(old, new)?;
    output::success(&format!(
        "renamed {} to {}",
        output::name(old),
        output::name(new)
    ));
    Ok(())
}

/// Delete a loadout, asking first on a terminal.
pub fn rm(ctx: &Context, name: &str, force: bool) -> Result<()> {
    if !ctx.store.exists(name) {
        return Err(LoadoutError::NotFound(name.to_string()).into());
    }

    if !force && io::stdin().is_terminal() {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete {}?", output::name(name)))
            .default(false)
            .interact()?;
        if !confirmed {
            output::dimmed("cancelled");
            return Ok(());
        }
    }

    ctx.store.remove(name)?;
    output::success(&format!("removed {}", output::name(name)));
    Ok(())
}

/// Add tags.
pub fn tag_add(ctx: &Context, name: &str, list: &str) -> Result<()> {
    let new = tags::split(list);
    let all = ctx.store.update(name, |l| {
        l.merge_tags(&new);
        l.tags().to_vec()
    })?;
    output::success(&format!("{} tags: {}", output::name(name), all.join(", ")));
    Ok(())
}

/// Remove tags.
pub fn tag_rm(ctx: &Context, name: &str, list: &str) -> Result<()> {
    let remove = tags::split(list);
    let all = ctx.store.update(name, |l| {
        l.remove_tags(&remove);
        l.tags().to_vec()
    })?;
    output::success(&format!("{} tags: {}", output::name(name), all.join(", ")));
    Ok(())
}

/// Replace tags.
pub fn tag_set(ctx: &Context, name: &str, list: &str) -> Result<()> {
    let new = tags::split(list);
    let all = ctx.store.update(name, |l| {
        l.replace_tags(&new);
        l.tags().to_vec()
    })?;
    output::success(&format!("{} tags: {}", output::name(name), all.join(", ")));
    Ok(())
}

/// Set the description.
pub fn describe(ctx: &Context, name: &str, description: &str) -> Result<()> {
    ctx.store.update(name, |l| l.set_description(description))?;
    output::success(&format!("updated {}", output::name(name)));
    Ok(())
}

/// Toggle export on login.
pub fn login(ctx: &Context, name: &str, on: bool) -> Result<()> {
    ctx.store.update(name, |l| l.set_login(on))?;
    let state = if on { "on" } else { "off" };
    output::success(&format!("{} login {}", output::name(name), state));
    Ok(())
}
