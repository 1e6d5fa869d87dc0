//! User-visible status reporting.

use std::fmt;

/// How prominently a status message should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => f.write_str("info"),
            Self::Warning => f.write_str("warning"),
            Self::Error => f.write_str("error"),
        }
    }
}

/// Receives messages meant for the status line.
///
/// The navigator calls this outside its state lock, once per failed read
/// that is still current.
pub trait StatusNotifier: Send + Sync {
    fn notify(&self, message: &str, severity: Severity);
}

/// Drops every message. Used when no status channel is wired.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentNotifier;

impl StatusNotifier for SilentNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        tracing::trace!("unrouted {severity} status: {message}");
    }
}
