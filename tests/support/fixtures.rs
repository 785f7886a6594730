//! Test fixtures and constants.

/// Entries used across tests.
pub const STANDARD_ENTRIES: &[(&str, &str)] = &[
    ("AWS_PROFILE", "dev"),
    ("AWS_REGION", "eu-west-1"),
    ("DATABASE_URL", "postgres://localhost/mydb"),
];

/// Sample .env file content for import tests.
pub const SAMPLE_ENV: &str = "KEY1=value1\n# comment\nKEY2=a=b\n\nKEY3=  spaced  \n";

/// Sample .env with a key that is not a valid variable name.
pub const SAMPLE_ENV_INVALID: &str = "GOOD=1\nBAD-KEY=2\n";

/// Stand-in for sops: "encrypts" by moving the document under a block
/// scalar next to a `sops` metadata key, and "decrypts" by reversing that.
/// Plaintext stays readable; only the document shape matters here.
pub const FAKE_SOPS: &str = r#"#!/bin/sh
mode="$1"
for arg; do file="$arg"; done
case "$mode" in
  --encrypt)
    printf 'sops:\n    version: fake\nfake_payload: |-\n'
    sed 's/^/    /' "$file"
    ;;
  --decrypt)
    if ! grep -q '^fake_payload: |-$' "$file"; then
      echo "sops metadata not found" >&2
      exit 1
    fi
    sed -n '/^fake_payload: |-$/,$p' "$file" | sed '1d' | sed 's/^    //'
    ;;
  *)
    echo "unsupported mode $mode" >&2
    exit 2
    ;;
esac
"#;
