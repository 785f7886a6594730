//! Command-line interface.

pub mod active;
pub mod completions;
pub mod edit;
pub mod entries;
pub mod export;
pub mod loadouts;
pub mod output;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};

use crate::core::config::{self, Settings};
use crate::core::constants::DIR_ENV;
use crate::core::store::{Protection, Store};
use crate::error::Result;

/// Loadout - named sets of environment variables, optionally encrypted.
#[derive(Parser)]
#[command(
    name = "loadout",
    about = "Named sets of environment variables, encrypted with sops",
    version,
    after_help = "Load with: eval \"$(loadout export NAME)\""
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Directory holding loadouts (default: $XDG_DATA_HOME/loadout or ~/.loadout)
    #[arg(long, global = true, env = DIR_ENV)]
    pub dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Create a loadout
    New {
        /// Loadout name
        name: String,
        /// Seed entries and metadata from a template
        #[arg(short, long)]
        template: Option<String>,
        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
        /// Short description
        #[arg(short, long)]
        description: Option<String>,
        /// Encrypt the whole file
        #[arg(long)]
        encrypt_file: bool,
    },

    /// List loadouts
    List {
        /// Only loadouts carrying this tag
        #[arg(long)]
        tag: Option<String>,
        /// List templates instead
        #[arg(long)]
        templates: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a loadout's metadata and entries
    Show {
        /// Loadout name
        name: String,
        /// Show decrypted values instead of masking them
        #[arg(long)]
        decrypt: bool,
    },

    /// Set an entry, creating the loadout if needed
    Set {
        /// Loadout name
        name: String,
        /// Entry key (e.g., AWS_PROFILE)
        key: String,
        /// Entry value
        value: String,
        #[command(flatten)]
        encryption: EncryptionArgs,
        /// Comma-separated tags to add
        #[arg(long)]
        tags: Option<String>,
    },

    /// Remove an entry
    Unset {
        /// Loadout name
        name: String,
        /// Entry key
        key: String,
    },

    /// Edit a loadout in $EDITOR
    Edit {
        /// Loadout name
        name: String,
    },

    /// Print shell export statements
    Export {
        /// Loadout name
        #[arg(required_unless_present = "login", conflicts_with = "login")]
        name: Option<String>,
        /// Export every loadout flagged for login
        #[arg(long)]
        login: bool,
        /// Do not record the export time
        #[arg(long)]
        no_touch: bool,
    },

    /// Import entries from a .env file
    Import {
        /// Loadout name
        name: String,
        /// Path to .env file
        path: PathBuf,
        #[command(flatten)]
        encryption: EncryptionArgs,
    },

    /// Rename a loadout
    Rename {
        /// Current name
        old: String,
        /// New name
        new: String,
    },

    /// Delete a loadout
    Rm {
        /// Loadout name
        name: String,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },

    /// Manage tags
    Tag {
        #[command(subcommand)]
        action: TagAction,
    },

    /// Set a loadout's description
    Describe {
        /// Loadout name
        name: String,
        /// New description
        description: String,
    },

    /// Toggle export on login
    Login {
        /// Loadout name
        name: String,
        #[arg(value_enum)]
        state: Toggle,
    },

    /// Show entries that are live in the current environment
    Active {
        /// Loadouts to check (default: all)
        names: Vec<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Tag subcommands.
#[derive(Subcommand)]
pub enum TagAction {
    /// Add tags
    Add {
        /// Loadout name
        name: String,
        /// Comma-separated tags
        tags: String,
    },

    /// Remove tags
    Rm {
        /// Loadout name
        name: String,
        /// Comma-separated tags
        tags: String,
    },

    /// Replace all tags
    Set {
        /// Loadout name
        name: String,
        /// Comma-separated tags (empty clears)
        tags: String,
    },
}

/// Encryption flags shared by `set` and `import`.
#[derive(clap::Args, Clone, Copy, Debug, Default)]
pub struct EncryptionArgs {
    /// Encrypt the value(s) individually
    #[arg(short = 'e', long, conflicts_with = "encrypt_file")]
    pub encrypt: bool,
    /// Encrypt the whole file
    #[arg(long)]
    pub encrypt_file: bool,
}

impl EncryptionArgs {
    pub fn protection(self) -> Protection {
        if self.encrypt_file {
            Protection::File
        } else if self.encrypt {
            Protection::Value
        } else {
            Protection::Plain
        }
    }
}

/// On/off switch.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Toggle {
    On,
    Off,
}

/// Supported shells for completions.
#[derive(ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Resolved base directory, settings and store for one invocation.
pub struct Context {
    pub base: PathBuf,
    pub settings: Settings,
    pub store: Store,
}

impl Context {
    /// Resolve the base directory and open the store.
    pub fn open(dir: Option<&Path>) -> Result<Self> {
        let base = config::base_dir(dir)?;
        let settings = Settings::load(&base)?;
        let store = Store::open(&base, &settings);
        Ok(Self {
            base,
            settings,
            store,
        })
    }
}

/// Execute a command.
pub fn execute(command: Command, dir: Option<PathBuf>) -> Result<()> {
    use Command::*;

    if let Completions { shell } = command {
        return completions::execute(shell);
    }

    let ctx = Context::open(dir.as_deref())?;

    match command {
        New {
            name,
            template,
            tags,
            description,
            encrypt_file,
        } => loadouts::new(
            &ctx,
            &name,
            template.as_deref(),
            tags.as_deref(),
            description.as_deref(),
            encrypt_file,
        ),
        List {
            tag,
            templates,
            json,
        } => loadouts::list(&ctx, tag.as_deref(), templates, json),
        Show { name, decrypt } => loadouts::show(&ctx, &name, decrypt),
        Set {
            name,
            key,
            value,
            encryption,
            tags,
        } => entries::set(
            &ctx,
            &name,
            &key,
            &value,
            encryption.protection(),
            tags.as_deref(),
        ),
        Unset { name, key } => entries::unset(&ctx, &name, &key),
        Edit { name } => edit::execute(&ctx, &name),
        Export {
            name,
            login,
            no_touch,
        } => match name {
            Some(name) if !login => export::one(&ctx, &name, !no_touch),
            _ => export::login(&ctx, !no_touch),
        },
        Import {
            name,
            path,
            encryption,
        } => entries::import(&ctx, &name, &path, encryption.protection()),
        Rename { old, new } => loadouts::rename(&ctx, &old, &new),
        Rm { name, force } => loadouts::rm(&ctx, &name, force),
        Tag { action } => match action {
            TagAction::Add { name, tags } => loadouts::tag_add(&ctx, &name, &tags),
            TagAction::Rm { name, tags } => loadouts::tag_rm(&ctx, &name, &tags),
            TagAction::Set { name, tags } => loadouts::tag_set(&ctx, &name, &tags),
        },
        Describe { name, description } => loadouts::describe(&ctx, &name, &description),
        Login { name, state } => loadouts::login(&ctx, &name, state == Toggle::On),
        Active { names } => active::execute(&ctx, names),
        Completions { .. } => Ok(()),
    }
}
