//! Command helper methods for Test.

use super::Test;
use assert_cmd::Command;
use std::process::Output;

impl Test {
    /// Create a loadout command with an isolated environment.
    ///
    /// Returns a Command configured with:
    /// - LOADOUT_DIR set to the test base directory
    /// - HOME set to the temporary home directory
    /// - colors and inherited log filters disabled
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("loadout").expect("failed to find loadout binary");
        cmd.env("LOADOUT_DIR", self.dir.path());
        cmd.env("HOME", self.home.path());
        cmd.env("NO_COLOR", "1");
        cmd.env_remove("LOADOUT_LOG");
        cmd.env_remove("XDG_DATA_HOME");
        cmd.current_dir(self.home.path());
        cmd
    }

    /// Run `loadout <args>`.
    pub fn run(&self, args: &[&str]) -> Output {
        self.cmd()
            .args(args)
            .output()
            .expect("failed to run loadout")
    }

    /// Shortcut for `loadout new`.
    pub fn new_loadout(&self, name: &str) -> Output {
        self.run(&["new", name])
    }

    /// Shortcut for `loadout set`.
    pub fn set(&self, name: &str, key: &str, value: &str) -> Output {
        self.run(&["set", name, key, value])
    }

    /// Shortcut for `loadout show`.
    pub fn show(&self, name: &str) -> Output {
        self.run(&["show", name])
    }

    /// Shortcut for `loadout export` with a controlled environment.
    pub fn export_with_env(&self, name: &str, env: &[(&str, &str)]) -> Output {
        let mut cmd = self.cmd();
        cmd.args(["export", name]);
        for (k, v) in env {
            cmd.env(k, v);
        }
        cmd.output().expect("failed to run loadout export")
    }

    /// Shortcut for `loadout edit` with `EDITOR` set.
    pub fn edit_with(&self, name: &str, editor: &str) -> Output {
        self.cmd()
            .args(["edit", name])
            .env("EDITOR", editor)
            .output()
            .expect("failed to run loadout edit")
    }
}
