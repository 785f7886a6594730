//! Tests for `loadout export` and `loadout active`.

use crate::support::*;

#[test]
fn test_export_path_reference() {
    let t = Test::new();
    t.seed("tools", &[("PATH", "/c:$PATH")]);

    let output = t.export_with_env("tools", &[("PATH", "/a:/b")]);
    assert_success(&output);
    assert_eq!(stdout(&output), "export PATH=/a:/b:/c\n");
}

#[test]
fn test_export_stdout_is_only_statements() {
    let t = Test::new();
    t.seed("dev", STANDARD_ENTRIES);

    let output = t.cmd().args(["export", "dev", "--verbose"]).output().unwrap();
    assert_success(&output);
    let out = stdout(&output);
    assert!(out.lines().all(|l| l.starts_with("export ")), "stdout: {}", out);
    assert_eq!(out.lines().count(), 3);
    assert_stdout_contains(&output, "export DATABASE_URL=postgres://localhost/mydb");
}

#[test]
fn test_export_updates_loaded_at_unless_no_touch() {
    let t = Test::new();
    t.seed("dev", &[("A", "1")]);
    let before = t.read_raw("dev");

    std::thread::sleep(std::time::Duration::from_millis(1100));
    assert_success(&t.run(&["export", "dev", "--no-touch"]));
    assert_eq!(t.read_raw("dev"), before);

    assert_success(&t.run(&["export", "dev"]));
    assert_ne!(t.read_raw("dev"), before);
}

#[test]
fn test_export_login_loadouts() {
    let t = Test::new();
    t.seed("a", &[("A_VAR", "1")]);
    t.seed("b", &[("B_VAR", "${A_VAR}2")]);
    t.seed("c", &[("C_VAR", "3")]);
    assert_success(&t.run(&["login", "a", "on"]));
    assert_success(&t.run(&["login", "b", "on"]));

    let output = t.run(&["export", "--login"]);
    assert_success(&output);
    assert_eq!(stdout(&output), "export A_VAR=1\nexport B_VAR=12\n");
}

#[test]
fn test_export_missing_loadout() {
    let t = Test::new();
    let output = t.run(&["export", "nope"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "loadout new nope");
    assert!(stdout(&output).is_empty());
}

#[test]
fn test_active() {
    let t = Test::new();
    t.seed("dev", &[("LOADOUT_TEST_A", "on"), ("LOADOUT_TEST_B", "x")]);

    let output = t
        .cmd()
        .arg("active")
        .env("LOADOUT_TEST_A", "on")
        .env("LOADOUT_TEST_B", "different")
        .output()
        .unwrap();
    assert_success(&output);
    assert_eq!(stdout(&output), "dev: LOADOUT_TEST_A=on\n");
}
