//! Test support utilities for loadout integration tests.
//!
//! Provides isolated environments, a fake cipher and helper commands.

#![allow(dead_code)]

pub mod assertions;
pub mod cipher;
pub mod commands;
pub mod fixtures;
pub mod skip;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use cipher::*;
#[allow(unused_imports)]
pub use fixtures::*;

use std::path::{Path, PathBuf};

use loadout::core::domain::Loadout;
use loadout::core::store::Store;
use tempfile::TempDir;

/// Test environment with isolated temp directories.
///
/// `dir` is the loadout base directory, `home` the fake home. Child
/// processes get both through env vars, so tests can run in parallel.
pub struct Test {
    /// Loadout base directory
    pub dir: TempDir,
    /// Temporary home directory
    pub home: TempDir,
}

impl Test {
    /// Create a new empty test environment.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let home = TempDir::new().expect("failed to create temp home");

        Self { dir, home }
    }

    /// Environment whose config points sops at a fake script.
    pub fn with_fake_sops() -> Self {
        let t = Self::new();
        let script = t.home.path().join("fake-sops");
        write_executable(&script, FAKE_SOPS);
        t.write_config(&format!("[sops]\nbinary = \"{}\"\n", script.display()));
        t
    }

    /// Environment whose config points sops at a missing binary.
    pub fn without_sops() -> Self {
        let t = Self::new();
        t.write_config("[sops]\nbinary = \"/nonexistent/sops\"\n");
        t
    }

    /// Write `config.toml` into the base directory.
    pub fn write_config(&self, contents: &str) {
        std::fs::write(self.dir.path().join("config.toml"), contents)
            .expect("failed to write config");
    }

    /// Path of a loadout's backing file.
    pub fn loadout_path(&self, name: &str) -> PathBuf {
        self.dir.path().join(format!("{}.yaml", name))
    }

    /// Raw text of a stored loadout.
    pub fn read_raw(&self, name: &str) -> String {
        std::fs::read_to_string(self.loadout_path(name)).expect("failed to read loadout")
    }

    /// Write a plaintext loadout with `entries` directly to disk.
    pub fn seed(&self, name: &str, entries: &[(&str, &str)]) {
        let store = Store::new(self.dir.path(), FakeCipher::new());
        let mut loadout = Loadout::new();
        for (k, v) in entries {
            loadout.set_entry(k, v).expect("invalid seed entry");
        }
        store.write(name, &loadout, false).expect("failed to seed loadout");
    }
}

/// Store over a fresh temp dir with a working fake cipher.
pub fn fake_store() -> (TempDir, Store) {
    let dir = TempDir::new().expect("failed to create temp dir");
    let store = Store::new(dir.path(), FakeCipher::new());
    (dir, store)
}

fn write_executable(path: &Path, contents: &str) {
    std::fs::write(path, contents).expect("failed to write script");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
            .expect("failed to chmod script");
    }
}
