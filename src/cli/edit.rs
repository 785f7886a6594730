//! Edit command.
//!
//! Opens the loadout in the configured editor; invalid edits offer to
//! reopen the editor.

use std::io::{self, IsTerminal};

use dialoguer::Confirm;

use crate::cli::{output, Context};
use crate::core::edit::{self, EditOutcome, ExternalEditor, Prompt};
use crate::error::{Error, Result};

/// Asks on the terminal whether to keep editing.
///
/// Without a terminal there is nobody to ask, so the edit is abandoned.
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn keep_editing(&self, _problem: &Error) -> Result<bool> {
        if !io::stdin().is_terminal() {
            return Ok(false);
        }
        let again = Confirm::new()
            .with_prompt("Edit again?")
            .default(true)
            .interact()?;
        Ok(again)
    }
}

/// Edit a loadout interactively.
pub fn execute(ctx: &Context, name: &str) -> Result<()> {
    let editor = ExternalEditor::new(ctx.settings.editor());

    match edit::edit(&ctx.store, name, &editor, &TerminalPrompt)? {
        EditOutcome::Unchanged => output::dimmed("no changes"),
        EditOutcome::Saved => output::success(&format!("saved {}", output::name(name))),
    }
    Ok(())
}
