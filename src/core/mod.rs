//! Core library components.
//!
//! Storage, encryption, edit reconciliation and export resolution. Nothing
//! in here prints; user-facing warnings go through `tracing`.

pub mod active;
pub mod cipher;
pub mod config;
pub mod constants;
pub mod domain;
pub mod dotenv;
pub mod edit;
pub mod export;
pub mod store;
pub mod template;
pub mod validation;
