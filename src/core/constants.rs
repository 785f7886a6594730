//! Constants used throughout loadout.
//!
//! Centralizes magic strings and configuration values.

/// File extension for stored loadouts.
pub const LOADOUT_EXT: &str = "yaml";

/// Subdirectory of the base directory holding templates.
pub const TEMPLATE_DIR: &str = "templates";

/// Optional settings file inside the base directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Directory name used under `$XDG_DATA_HOME`.
pub const APP_DIR: &str = "loadout";

/// Directory name used under `$HOME` when no XDG data dir is set.
pub const HOME_DIR: &str = ".loadout";

/// Environment variable overriding the base directory.
pub const DIR_ENV: &str = "LOADOUT_DIR";

/// Literal prefix marking a value-encrypted entry.
pub const VALUE_PREFIX: &str = "SOPS:";

/// Field name of the single-field document wrapped by value encryption.
pub const VALUE_FIELD: &str = "value";

/// Top-level key sops writes its cryptographic metadata under.
pub const METADATA_KEY: &str = "sops";

/// Top-level key carrying an opaque (binary/dotenv) payload.
pub const PAYLOAD_KEY: &str = "data";

/// Default encryption tool binary.
pub const SOPS_BINARY: &str = "sops";

/// Editor used when neither `$EDITOR` nor config names one.
pub const DEFAULT_EDITOR: &str = "vi";

/// Separator for PATH-like list variables.
pub const LIST_SEPARATOR: &str = ":";
