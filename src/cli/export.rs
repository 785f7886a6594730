//! Export command.
//!
//! Prints `export KEY=VALUE` lines on stdout for `eval`. Everything else
//! goes to stderr.

use tracing::debug;

use crate::cli::{output, Context};
use crate::core::export::Resolver;
use crate::error::Result;

/// Export one loadout.
pub fn one(ctx: &Context, name: &str, touch: bool) -> Result<()> {
    let mut resolver = Resolver::from_process_env(ctx.store.cipher());
    export(ctx, &mut resolver, name, touch)
}

/// Export every login loadout, in name order, through one resolver so
/// later loadouts see earlier exports.
pub fn login(ctx: &Context, touch: bool) -> Result<()> {
    let names = ctx.store.login_loadouts()?;
    debug!(count = names.len(), "exporting login loadouts");

    let mut resolver = Resolver::from_process_env(ctx.store.cipher());
    for name in &names {
        if let Err(e) = export(ctx, &mut resolver, name, touch) {
            output::warn(&format!("{}: {}", output::name(name), e));
        }
    }
    Ok(())
}

fn export(ctx: &Context, resolver: &mut Resolver<'_>, name: &str, touch: bool) -> Result<()> {
    let mut loadout = ctx.store.read(name)?;
    let resolution = resolver.resolve(&mut loadout);

    output::raw(&resolution.to_string());

    if touch {
        ctx.store.mark_loaded(name, &loadout)?;
    }
    if !resolution.skipped.is_empty() {
        debug!(name, skipped = resolution.skipped.len(), "entries skipped");
    }
    Ok(())
}
