//! Active entry scan.
//!
//! Finds which entries of which loadouts are live in the current
//! environment. One worker thread per loadout reads, decrypts and filters
//! its own copy; workers send finished lines over a channel and the caller
//! drains it once every worker is done. Output follows channel order, not
//! submission order.

use std::collections::BTreeMap;
use std::sync::mpsc;
use std::thread;

use tracing::{debug, warn};

use crate::core::domain::Loadout;
use crate::core::export::{classify, expand, merge_segments, ValueKind};
use crate::core::store::Store;

/// Scan `names` in parallel and return one line per active entry.
///
/// Lines look like `name: KEY=value`; decrypted values are masked.
/// Unreadable loadouts are skipped with a warning.
pub fn scan(store: &Store, names: &[String], env: &BTreeMap<String, String>) -> Vec<String> {
    let (tx, rx) = mpsc::channel::<String>();

    thread::scope(|scope| {
        for name in names {
            let tx = tx.clone();
            scope.spawn(move || match store.read(name) {
                Ok(loadout) => {
                    for line in active_lines(store, name, &loadout, env) {
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                }
                Err(e) => warn!(name = %name, error = %e, "skipping unreadable loadout"),
            });
        }
    });
    drop(tx);

    let lines: Vec<String> = rx.into_iter().collect();
    debug!(loadouts = names.len(), active = lines.len(), "active scan done");
    lines
}

fn active_lines(
    store: &Store,
    name: &str,
    loadout: &Loadout,
    env: &BTreeMap<String, String>,
) -> Vec<String> {
    let mut lines = Vec::new();

    for (key, value) in loadout.entries() {
        let Some(live) = env.get(key) else {
            continue;
        };

        let (active, shown) = match classify(key, value) {
            ValueKind::ListReference => {
                let merged = merge_segments(live, &expand(value, env));
                (merged == merge_segments(live, ""), value.clone())
            }
            ValueKind::Plain => (&expand(value, env) == live, value.clone()),
            ValueKind::Encrypted => match store.cipher().decrypt_value(value) {
                Ok(plaintext) => (plaintext.as_str() == live, "********".to_string()),
                Err(e) => {
                    debug!(key = %key, error = %e, "cannot decrypt entry for active scan");
                    (false, String::new())
                }
            },
        };

        if active {
            lines.push(format!("{}: {}={}", name, key, shown));
        }
    }

    lines
}
