//! Error rendering tests.

use crate::support::*;
use predicates::prelude::*;

#[test]
fn test_missing_sops_hint() {
    let t = Test::without_sops();

    let output = t.run(&["set", "dev", "TOKEN", "secret", "--encrypt"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "encryption tool not found");
    assert_stderr_contains(&output, "install /nonexistent/sops");
    assert!(!t.loadout_path("dev").exists());
}

#[test]
fn test_invalid_name() {
    let t = Test::new();
    let output = t.new_loadout("../escape");
    assert_failure(&output);
    assert_stderr_contains(&output, "invalid loadout name");
}

#[test]
fn test_malformed_config() {
    let t = Test::new();
    t.write_config("editor = [unclosed\n");
    let output = t.run(&["list"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "failed to parse config.toml");
}

#[test]
fn test_unparseable_loadout() {
    let t = Test::new();
    std::fs::write(t.loadout_path("bad"), "- a\n- b\n").unwrap();
    let output = t.show("bad");
    assert_failure(&output);
    assert_stderr_contains(&output, "cannot parse loadout 'bad'");
}

#[test]
fn test_completions() {
    let t = Test::new();
    t.cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef loadout"));
}
