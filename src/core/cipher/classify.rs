//! Tool failure classification.
//!
//! sops reports every failure with a non-zero exit, so the recoverable cases
//! are told apart by their stderr text.

use crate::error::CipherError;

/// stderr fragments meaning the current keys cannot open the data key.
const KEY_ROTATION_MARKERS: &[&str] = &[
    "failed to get the data key",
    "0 successful groups required",
    "no key could decrypt",
    "could not decrypt data key",
    "error getting data key",
];

/// stderr fragments meaning the input was never encrypted.
const NOT_ENCRYPTED_MARKERS: &[&str] = &["sops metadata not found", "metadata not found"];

/// Map a failed tool run onto a `CipherError`.
pub fn classify(stderr: &str, code: Option<i32>) -> CipherError {
    let lowered = stderr.to_lowercase();
    let stderr = stderr.trim().to_string();

    if KEY_ROTATION_MARKERS.iter().any(|m| lowered.contains(m)) {
        return CipherError::KeyRotation { stderr };
    }
    if NOT_ENCRYPTED_MARKERS.iter().any(|m| lowered.contains(m)) {
        return CipherError::NotEncrypted { stderr };
    }
    CipherError::Failed { stderr, code }
}
