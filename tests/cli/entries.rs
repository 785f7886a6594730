//! Tests for `loadout set/unset/import`.

use crate::support::*;

#[test]
fn test_set_creates_and_overwrites() {
    let t = Test::new();

    let output = t.set("dev", "AWS_PROFILE", "dev");
    assert_success(&output);
    assert_stderr_contains(&output, "set AWS_PROFILE in dev");

    assert_success(&t.set("dev", "AWS_PROFILE", "prod"));
    let output = t.show("dev");
    assert_stdout_contains(&output, "AWS_PROFILE=prod");
    assert!(!stdout(&output).contains("AWS_PROFILE=dev"));
}

#[test]
fn test_set_with_tags() {
    let t = Test::new();
    assert_success(&t.run(&["set", "dev", "A", "1", "--tags", "x,y"]));
    assert_stdout_contains(&t.show("dev"), "x, y");
}

#[test]
fn test_invalid_keys_rejected() {
    let t = Test::new();

    let output = t.set("dev", "123BAD", "value");
    assert_failure(&output);
    assert_stderr_contains(&output, "cannot start with a digit");

    let output = t.set("dev", "BAD-KEY", "value");
    assert_failure(&output);

    let output = t.set("dev", "", "value");
    assert_failure(&output);
    assert_stderr_contains(&output, "cannot be empty");
    assert!(!t.loadout_path("dev").exists());
}

#[test]
fn test_unset() {
    let t = Test::new();
    t.seed("dev", STANDARD_ENTRIES);

    let output = t.run(&["unset", "dev", "AWS_REGION"]);
    assert_success(&output);
    assert!(!stdout(&t.show("dev")).contains("AWS_REGION"));

    let output = t.run(&["unset", "dev", "AWS_REGION"]);
    assert_success(&output);
    assert_stderr_contains(&output, "has no entry");
}

#[test]
fn test_import() {
    let t = Test::new();
    let env = t.home.path().join("sample.env");
    std::fs::write(&env, SAMPLE_ENV).unwrap();

    let output = t.run(&["import", "dev", env.to_str().unwrap()]);
    assert_success(&output);
    assert_stderr_contains(&output, "imported 3 entries into dev");

    let output = t.show("dev");
    assert_stdout_contains(&output, "KEY1=value1");
    assert_stdout_contains(&output, "KEY2=a=b");
}

#[test]
fn test_import_missing_file() {
    let t = Test::new();
    let output = t.run(&["import", "dev", "/nonexistent/.env"]);
    assert_failure(&output);
}
