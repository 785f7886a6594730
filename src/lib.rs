//! Loadout - named sets of environment variables, encrypted with sops.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── loadouts      # new, list, show, rename, rm, tags, login
//! │   ├── entries       # set, unset, import
//! │   ├── edit          # Interactive edit in $EDITOR
//! │   ├── export        # Shell export statements
//! │   ├── active        # Entries live in the current shell
//! │   └── completions   # Shell completions
//! └── core/             # Core library components
//!     ├── config        # Base directory and config.toml
//!     ├── domain/       # Loadout, metadata, tag sets
//!     ├── cipher/       # Encryption gateway
//!     │   ├── mod       # Cipher trait, value-level encryption
//!     │   └── sops      # sops subprocess backend
//!     ├── store/        # Persistence
//!     │   ├── codec     # YAML/JSON decode chain
//!     │   └── fs        # Owner-only writes, scratch files
//!     ├── edit          # Edit reconciliation
//!     ├── export        # Export resolution
//!     ├── active        # Parallel active-entry scan
//!     └── template      # Template catalog
//! ```
//!
//! # Features
//!
//! - Whole-file or per-value encryption through sops
//! - Edit decrypted, save re-encrypted, with validation and retry
//! - PATH-style list merging on export
//! - Tags, descriptions, templates and login loadouts

pub mod cli;
pub mod core;
pub mod error;
