//! Pure formatting functions for UI output.
//!
//! `format_*` functions build styled strings and have no side effects;
//! `display_*` functions print them.

use console::style;

/// Format an error message with a red prefix.
pub fn format_error(message: &str) -> String {
    format!("{} {}", style("ERROR:").red(), message)
}

/// Format a success message with a green checkmark.
pub fn format_success(message: &str) -> String {
    format!("{} {}", style("✓").green(), message)
}

/// Format a status message with a yellow arrow.
pub fn format_status(message: &str) -> String {
    format!("{} {}", style("→").yellow(), message)
}

/// Format one imported entry, indented under the preceding status line.
pub fn format_imported(entry: &str) -> String {
    format!("  {} {}", style("+").cyan(), entry)
}

pub fn display_error(message: &str) {
    eprintln!("{}", format_error(message));
}

pub fn display_success(message: &str) {
    println!("{}", format_success(message));
}

pub fn display_status(message: &str) {
    println!("{}", format_status(message));
}

pub fn display_imported(entry: &str) {
    println!("{}", format_imported(entry));
}
