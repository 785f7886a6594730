//! Shared CLI output helpers.
//!
//! Status lines (success, warnings, errors, hints) go to stderr so that
//! stdout carries only data, e.g. `eval "$(loadout export dev)"`.
//!
//! Color scheme (respects NO_COLOR):
//! - Green: success, checkmarks
//! - Red: errors
//! - Yellow: warnings
//! - Cyan: names, keys, hints
//! - Bold: headers
//! - Dimmed: secondary info

use std::fmt::Display;

use console::style;

/// Check if color output is disabled via NO_COLOR env var.
fn colors_enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

/// Print a success message with checkmark (green).
///
/// Example: `✓ created dev`
pub fn success(msg: &str) {
    if colors_enabled() {
        eprintln!("{} {}", style("✓").green().for_stderr(), msg);
    } else {
        eprintln!("✓ {}", msg);
    }
}

/// Print an error message to stderr (red).
pub fn error(msg: &str) {
    if colors_enabled() {
        eprintln!("{} {}", style("✗").red().for_stderr(), msg);
    } else {
        eprintln!("✗ {}", msg);
    }
}

/// Print a warning message (yellow).
pub fn warn(msg: &str) {
    if colors_enabled() {
        eprintln!("{} {}", style("⚠").yellow().for_stderr(), msg);
    } else {
        eprintln!("⚠ {}", msg);
    }
}

/// Print a hint message (cyan).
///
/// Example: `→ run: loadout new dev`
pub fn hint(msg: &str) {
    if colors_enabled() {
        eprintln!(
            "{} {}",
            style("→").cyan().for_stderr(),
            style(msg).cyan().for_stderr()
        );
    } else {
        eprintln!("→ {}", msg);
    }
}

/// Print a bold header on stdout.
pub fn header(title: &str) {
    if colors_enabled() {
        println!("{}", style(title).bold());
    } else {
        println!("{}", title);
    }
}

/// Print a key-value pair (label dimmed).
///
/// Example: `  updated:  2026-01-02 03:04:05`
pub fn kv(label: &str, value: impl Display) {
    if colors_enabled() {
        println!("  {}  {}", style(label).dim(), value);
    } else {
        println!("  {}  {}", label, value);
    }
}

/// Print a list item with bullet.
pub fn list_item(item: &str) {
    println!("  • {}", item);
}

/// Print a dimmed line on stdout.
pub fn dimmed(msg: &str) {
    if colors_enabled() {
        println!("{}", style(msg).dim());
    } else {
        println!("{}", msg);
    }
}

/// Format a loadout or template name in cyan.
pub fn name(n: &str) -> String {
    if colors_enabled() {
        style(n).cyan().to_string()
    } else {
        n.to_string()
    }
}

/// Format an entry key in cyan.
pub fn key(k: &str) -> String {
    if colors_enabled() {
        style(k).cyan().to_string()
    } else {
        k.to_string()
    }
}

/// Print raw data on stdout without decoration.
pub fn raw(data: &str) {
    print!("{}", data);
}
