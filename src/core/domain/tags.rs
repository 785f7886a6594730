//! Tag set operations.
//!
//! Pure functions over tag lists. Tags are a set; lists keep first-seen
//! order only so output is stable.

use std::collections::HashSet;

/// Split a comma-separated tag string, dropping blanks and duplicates.
pub fn split(input: &str) -> Vec<String> {
    dedupe(
        input
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string),
    )
}

/// Remove duplicate and blank tags, first occurrence wins.
pub fn dedupe<I>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    tags.into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty() && seen.insert(t.clone()))
        .collect()
}

/// Union of two tag lists, existing tags first.
pub fn merge(existing: &[String], new: &[String]) -> Vec<String> {
    dedupe(existing.iter().chain(new.iter()).cloned())
}

/// Tags in `existing` that are not in `remove`.
pub fn remove(existing: &[String], remove: &[String]) -> Vec<String> {
    let remove: HashSet<&String> = remove.iter().collect();
    dedupe(existing.iter().filter(|t| !remove.contains(t)).cloned())
}

/// Set equality, ignoring order and duplicates.
pub fn same_set(a: &[String], b: &[String]) -> bool {
    let a: HashSet<&String> = a.iter().collect();
    let b: HashSet<&String> = b.iter().collect();
    a == b
}
