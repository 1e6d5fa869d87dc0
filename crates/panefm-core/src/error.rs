//! Error types for `panefm-core`.
//!
//! Fallible calls at the navigator boundary return [`CoreResult<T>`], which is
//! an alias for `Result<T, CoreError>`. Directory-read failures are a separate
//! type, [`ReadError`], because they never cross that boundary: they are stored
//! inside the published navigation state instead.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Which side of the history a rejected back/forward request targeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryDirection {
    Back,
    Forward,
}

impl fmt::Display for HistoryDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Back => f.write_str("back"),
            Self::Forward => f.write_str("forward"),
        }
    }
}

/// Unified error type for requests rejected at the call boundary.
///
/// A request that fails with one of these leaves the navigator untouched.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The raw path is empty, contains a forbidden character, or cannot be
    /// applied (e.g. going up from the root).
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// Back or forward was requested with an empty stack.
    #[error("no {0} history")]
    NoHistory(HistoryDirection),

    /// The target path does not exist.
    #[error("path not found: {0}")]
    NotFound(PathBuf),

    /// The process lacks permission to access the path.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Failed to parse a TOML configuration file.
    #[error("config parse error: {0}")]
    ConfigParse(String),

    /// An I/O error that doesn't fit a more specific variant.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout `panefm-core`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Why a directory listing could not be produced.
///
/// Unlike [`CoreError`] this is `Clone + PartialEq`: it lives inside
/// [`crate::nav::NavState::Error`] snapshots handed to every subscriber.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReadError {
    #[error("not found")]
    NotFound,

    #[error("not a directory")]
    NotADirectory,

    #[error("permission denied")]
    PermissionDenied,

    #[error("i/o failure: {0}")]
    Io(String),

    /// The read did not resolve within the configured timeout.
    #[error("timed out after {}ms", .0.as_millis())]
    TimedOut(Duration),
}

impl ReadError {
    /// Maps an I/O error raised while reading `path` onto a read failure.
    pub fn from_io(path: &Path, err: &std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound,
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            _ if is_not_a_directory(err) => Self::NotADirectory,
            _ => Self::Io(format!("{}: {err}", path.display())),
        }
    }
}

#[cfg(unix)]
fn is_not_a_directory(err: &std::io::Error) -> bool {
    // ENOTDIR
    err.raw_os_error() == Some(20)
}

#[cfg(not(unix))]
fn is_not_a_directory(_err: &std::io::Error) -> bool {
    false
}

/// A terminal refused or failed to take a working-directory change.
///
/// The navigator logs these and carries on; they never reach navigation state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TerminalError {
    #[error("terminal session closed")]
    Closed,

    #[error("terminal i/o error: {0}")]
    Io(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_path_displays_message() {
        let err = CoreError::InvalidPath("empty path".to_string());
        assert_eq!(err.to_string(), "invalid path: empty path");
    }

    #[test]
    fn no_history_displays_direction() {
        assert_eq!(
            CoreError::NoHistory(HistoryDirection::Back).to_string(),
            "no back history"
        );
        assert_eq!(
            CoreError::NoHistory(HistoryDirection::Forward).to_string(),
            "no forward history"
        );
    }

    #[test]
    fn not_found_displays_path() {
        let err = CoreError::NotFound(PathBuf::from("/missing/file"));
        assert_eq!(err.to_string(), "path not found: /missing/file");
    }

    #[test]
    fn config_parse_displays_message() {
        let err = CoreError::ConfigParse("unexpected token".to_string());
        assert_eq!(err.to_string(), "config parse error: unexpected token");
    }

    #[test]
    fn io_error_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let core_err: CoreError = io_err.into();
        assert!(matches!(core_err, CoreError::Io(_)));
        assert!(core_err.to_string().contains("gone"));
    }

    #[test]
    fn read_error_from_io_kinds() {
        let path = Path::new("/x");
        let nf = std::io::Error::new(std::io::ErrorKind::NotFound, "nope");
        let pd = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let other = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");

        assert_eq!(ReadError::from_io(path, &nf), ReadError::NotFound);
        assert_eq!(ReadError::from_io(path, &pd), ReadError::PermissionDenied);
        assert_eq!(
            ReadError::from_io(path, &other),
            ReadError::Io("/x: disk on fire".to_string())
        );
    }

    #[cfg(unix)]
    #[test]
    fn read_error_from_enotdir() {
        let err = std::io::Error::from_raw_os_error(20);
        assert_eq!(
            ReadError::from_io(Path::new("/f"), &err),
            ReadError::NotADirectory
        );
    }

    #[test]
    fn timed_out_displays_millis() {
        let err = ReadError::TimedOut(Duration::from_millis(1500));
        assert_eq!(err.to_string(), "timed out after 1500ms");
    }

    #[test]
    fn terminal_error_displays() {
        assert_eq!(TerminalError::Closed.to_string(), "terminal session closed");
    }
}
