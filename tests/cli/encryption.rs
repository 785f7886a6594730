//! Encryption flows through a stand-in sops script.

use crate::support::*;

#[test]
fn test_value_encryption_roundtrip() {
    let t = Test::with_fake_sops();

    let output = t.run(&["set", "dev", "TOKEN", "s3cret", "--encrypt"]);
    assert_success(&output);
    assert_stderr_contains(&output, "(value encrypted)");

    let raw = t.read_raw("dev");
    assert!(raw.contains("SOPS:"));

    let output = t.show("dev");
    assert_stdout_contains(&output, "TOKEN=<encrypted>");

    let output = t.run(&["show", "dev", "--decrypt"]);
    assert_stdout_contains(&output, "TOKEN=s3cret");

    let output = t.run(&["export", "dev"]);
    assert_success(&output);
    assert_eq!(stdout(&output), "export TOKEN=s3cret\n");
}

#[test]
fn test_file_encryption_is_sticky() {
    let t = Test::with_fake_sops();

    assert_success(&t.run(&["set", "dev", "A", "1", "--encrypt-file"]));
    assert!(t.read_raw("dev").starts_with("sops:"));

    let output = t.run(&["set", "dev", "B", "2", "--encrypt"]);
    assert_success(&output);
    assert_stderr_contains(&output, "file-encrypted");
    assert!(t.read_raw("dev").starts_with("sops:"));

    let output = t.run(&["export", "dev"]);
    assert_eq!(stdout(&output), "export A=1\nexport B=2\n");
}

#[test]
fn test_edit_keeps_value_encryption() {
    let t = Test::with_fake_sops();
    assert_success(&t.run(&["set", "dev", "TOKEN", "s3cret", "--encrypt"]));
    assert_success(&t.run(&["set", "dev", "PLAIN", "x"]));

    let output = t.edit_with("dev", "sed -i /PLAIN/s/x$/y/");
    assert_success(&output);
    assert_stderr_contains(&output, "saved dev");

    let raw = t.read_raw("dev");
    assert!(raw.contains("SOPS:"));
    assert!(!raw.contains("SOPS:SOPS:"));
    assert_stdout_contains(&t.run(&["export", "dev"]), "export TOKEN=s3cret");
    assert_stdout_contains(&t.show("dev"), "PLAIN=y");
}

#[test]
fn test_export_without_sops_skips_encrypted() {
    let t = Test::with_fake_sops();
    assert_success(&t.run(&["set", "dev", "TOKEN", "s3cret", "--encrypt"]));
    assert_success(&t.run(&["set", "dev", "REGION", "eu"]));

    t.write_config("[sops]\nbinary = \"/nonexistent/sops\"\n");
    let output = t.run(&["export", "dev"]);
    assert_success(&output);
    assert_eq!(stdout(&output), "export REGION=eu\n");
}

#[test]
fn test_real_sops_roundtrip() {
    crate::skip_without_sops!();
    let t = Test::new();

    assert_success(&t.run(&["set", "dev", "TOKEN", "s3cret", "--encrypt-file"]));
    assert!(t.read_raw("dev").contains("sops"));
    assert_eq!(stdout(&t.run(&["export", "dev"])), "export TOKEN=s3cret\n");
}
