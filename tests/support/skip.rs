/// Skip a test if the real sops binary is not installed or no age key is
/// configured for it.
#[macro_export]
macro_rules! skip_without_sops {
    () => {
        if which::which("sops").is_err() {
            eprintln!("SKIPPED: sops not installed");
            return;
        }
        if std::env::var("SOPS_AGE_KEY_FILE").is_err() || std::env::var("SOPS_AGE_RECIPIENTS").is_err() {
            eprintln!("SKIPPED: SOPS_AGE_KEY_FILE and SOPS_AGE_RECIPIENTS must be set");
            return;
        }
    };
}
