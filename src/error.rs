//! Error types.
//!
//! Errors are grouped by the layer that raises them so the CLI can match on
//! the remediable cases and print a hint under the message.

use thiserror::Error;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Loadout(#[from] LoadoutError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error(transparent)]
    Edit(#[from] EditError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
}

/// Loadout storage errors.
#[derive(Error, Debug)]
pub enum LoadoutError {
    #[error("loadout not found: {0}")]
    NotFound(String),

    #[error("loadout already exists: {0}")]
    AlreadyExists(String),

    #[error("invalid loadout name '{0}': must be non-empty, without path separators or a leading dot")]
    InvalidName(String),

    #[error("cannot parse loadout '{name}': {reason}")]
    Unparseable { name: String, reason: String },

    #[error("template not found: {0}")]
    TemplateNotFound(String),
}

/// Input validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("entry key cannot be empty")]
    EmptyKey,

    #[error("invalid entry key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    #[error("duplicate entry key '{key}' on line {line}")]
    DuplicateKey { key: String, line: usize },

    #[error("entry '{key}' on line {line}: '{written}' would be stored as '{stored}'; quote it to keep it as written")]
    LossyScalar {
        key: String,
        line: usize,
        written: String,
        stored: String,
    },
}

/// Encryption tool errors.
#[derive(Error, Debug)]
pub enum CipherError {
    #[error("encryption tool not found: {0}")]
    ToolNotFound(String),

    #[error("encryption tool failed (exit code {code:?}): {stderr}")]
    Failed { stderr: String, code: Option<i32> },

    #[error("current keys cannot decrypt this data: {stderr}")]
    KeyRotation { stderr: String },

    #[error("input is not actually encrypted: {stderr}")]
    NotEncrypted { stderr: String },

    #[error("failed to run encryption tool: {0}")]
    Spawn(std::io::Error),

    #[error("encryption tool produced invalid UTF-8")]
    Utf8,
}

/// Interactive edit errors.
#[derive(Error, Debug)]
pub enum EditError {
    #[error("edit aborted, no changes saved")]
    Aborted,

    #[error("editor '{editor}' failed: {reason}")]
    EditorFailed { editor: String, reason: String },

    #[error("no editor configured")]
    NoEditor,
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("unable to determine home directory")]
    NoHomeDir,

    #[error("failed to parse config.toml: {0}")]
    Parse(#[from] toml::de::Error),
}

impl Error {
    /// Suggested next action for remediable errors.
    pub fn hint(&self) -> Option<String> {
        match self {
            Error::Cipher(CipherError::ToolNotFound(tool)) => Some(format!(
                "install {} (https://github.com/getsops/sops) or set [sops] binary in config.toml",
                tool
            )),
            Error::Cipher(CipherError::KeyRotation { .. }) => Some(
                "re-encrypt with current keys: sops updatekeys <file>, or sops --rotate --in-place <file>"
                    .to_string(),
            ),
            Error::Loadout(LoadoutError::NotFound(name)) => {
                Some(format!("run: loadout new {}", name))
            }
            Error::Loadout(LoadoutError::AlreadyExists(_)) => {
                Some("choose another name or remove the existing loadout first".to_string())
            }
            Error::Edit(EditError::NoEditor) => Some("set $EDITOR".to_string()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
