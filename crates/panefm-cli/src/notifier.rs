use std::io::Write;

use panefm_core::{Severity, StatusNotifier};

/// Prints status messages on stderr so they don't interleave with listings.
#[derive(Debug, Default)]
pub struct StderrNotifier;

impl StatusNotifier for StderrNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        tracing::info!("status ({severity}): {message}");
        let _ = writeln!(std::io::stderr(), "[{severity}] {message}");
    }
}
