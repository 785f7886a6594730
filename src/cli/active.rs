//! Active command.

use std::collections::BTreeMap;

use crate::cli::{output, Context};
use crate::core::active;
use crate::error::Result;

/// Print entries of `names` (or every loadout) that are live in the
/// current environment.
pub fn execute(ctx: &Context, names: Vec<String>) -> Result<()> {
    let names = if names.is_empty() {
        ctx.store.list()?
    } else {
        names
    };

    let env: BTreeMap<String, String> = std::env::vars().collect();
    let lines = active::scan(&ctx.store, &names, &env);

    if lines.is_empty() {
        output::dimmed("no active entries");
    }
    for line in lines {
        println!("{}", line);
    }
    Ok(())
}
