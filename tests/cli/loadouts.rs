//! Tests for `loadout new/list/show/rename/rm/tag/describe/login`.

use crate::support::*;

#[test]
fn test_new_and_show() {
    let t = Test::new();

    let output = t.run(&["new", "dev", "--tags", "aws,dev", "-d", "dev account"]);
    assert_success(&output);
    assert_stderr_contains(&output, "created dev");
    assert!(t.loadout_path("dev").exists());

    let output = t.show("dev");
    assert_success(&output);
    assert_stdout_contains(&output, "dev account");
    assert_stdout_contains(&output, "aws, dev");
    assert_stdout_contains(&output, "(no entries)");
}

#[test]
fn test_new_twice_fails() {
    let t = Test::new();
    assert_success(&t.new_loadout("dev"));

    let output = t.new_loadout("dev");
    assert_failure(&output);
    assert_stderr_contains(&output, "already exists");
}

#[test]
fn test_new_from_template() {
    let t = Test::new();
    let templates = t.dir.path().join("templates");
    std::fs::create_dir(&templates).unwrap();
    std::fs::write(
        templates.join("aws.yaml"),
        "metadata:\n  description: aws profile\nentries:\n  AWS_PROFILE: default\n",
    )
    .unwrap();

    let output = t.run(&["list", "--templates"]);
    assert_success(&output);
    assert_stdout_contains(&output, "aws");

    assert_success(&t.run(&["new", "dev", "--template", "aws"]));
    let output = t.show("dev");
    assert_stdout_contains(&output, "AWS_PROFILE=default");
    assert_stdout_contains(&output, "aws profile");

    let output = t.run(&["new", "prod", "--template", "gcp"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "template not found: gcp");
}

#[test]
fn test_list_with_tag_filter_and_json() {
    let t = Test::new();
    t.seed("dev", STANDARD_ENTRIES);
    t.seed("prod", &[("AWS_PROFILE", "prod")]);
    assert_success(&t.run(&["tag", "add", "prod", "aws,live"]));

    let output = t.run(&["list"]);
    assert_success(&output);
    assert_stdout_contains(&output, "dev (3 entries)");
    assert_stdout_contains(&output, "prod (1 entries) [aws, live]");

    let output = t.run(&["list", "--tag", "live"]);
    assert!(!stdout(&output).contains("dev"));
    assert_stdout_contains(&output, "prod");

    let output = t.run(&["list", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 2);
    assert_eq!(parsed[0]["name"], "dev");
    assert_eq!(parsed[0]["entries"], 3);
}

#[test]
fn test_list_empty() {
    let t = Test::new();
    let output = t.run(&["list"]);
    assert_success(&output);
    assert_stdout_contains(&output, "no loadouts");
}

#[test]
fn test_tags_describe_login() {
    let t = Test::new();
    t.seed("dev", &[("A", "1")]);

    assert_success(&t.run(&["tag", "add", "dev", "a,b"]));
    assert_success(&t.run(&["tag", "rm", "dev", "a"]));
    assert_success(&t.run(&["describe", "dev", "the dev box"]));
    assert_success(&t.run(&["login", "dev", "on"]));

    let output = t.show("dev");
    assert_stdout_contains(&output, "the dev box");
    assert!(stdout(&output)
        .lines()
        .any(|l| l.trim_start().starts_with("login:") && l.trim_end().ends_with("on")));
    assert!(!stdout(&output).contains("a, b"));

    assert_success(&t.run(&["tag", "set", "dev", ""]));
    let raw = t.read_raw("dev");
    assert!(raw.contains("tags: []"), "tags not cleared: {}", raw);
}

#[test]
fn test_rename() {
    let t = Test::new();
    t.seed("old", &[("A", "1")]);
    t.seed("taken", &[]);

    let output = t.run(&["rename", "old", "taken"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "already exists");

    assert_success(&t.run(&["rename", "old", "new"]));
    assert!(!t.loadout_path("old").exists());
    assert_stdout_contains(&t.show("new"), "A=1");
}

#[test]
fn test_rm() {
    let t = Test::new();
    t.seed("dev", &[]);

    assert_success(&t.run(&["rm", "dev", "--force"]));
    assert!(!t.loadout_path("dev").exists());

    let output = t.run(&["rm", "dev", "--force"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "loadout not found: dev");
}
