//! User interface module - progress reporting and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - The [Reporter] observer the pipeline emits progress through

use std::sync::Mutex;

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_error, display_imported, display_status, display_success, format_error,
    format_imported, format_status, format_success,
};

/// Receives progress messages from a pipeline run.
///
/// Passed into the pipeline explicitly so that nothing writes to a global
/// console and tests can inspect what was reported.
pub trait Reporter: Send + Sync {
    /// A step is starting
    fn status(&self, message: &str);

    /// One file was imported; called before the final `success`
    fn imported(&self, entry: &str);

    /// A run finished successfully
    fn success(&self, message: &str);
}

/// Prints styled messages to stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn status(&self, message: &str) {
        display_status(message);
    }

    fn imported(&self, entry: &str) {
        display_imported(entry);
    }

    fn success(&self, message: &str) {
        display_success(message);
    }
}

/// Discards every message
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn status(&self, _message: &str) {}

    fn imported(&self, _entry: &str) {}

    fn success(&self, _message: &str) {}
}

/// Keeps every message in memory, in order
#[derive(Debug, Default)]
pub struct RecordingReporter {
    messages: Mutex<Vec<String>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages received so far
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|messages| messages.clone())
            .unwrap_or_default()
    }

    fn push(&self, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message.to_string());
        }
    }
}

impl Reporter for RecordingReporter {
    fn status(&self, message: &str) {
        self.push(message);
    }

    fn imported(&self, entry: &str) {
        self.push(entry);
    }

    fn success(&self, message: &str) {
        self.push(message);
    }
}
