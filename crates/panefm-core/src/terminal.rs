//! The terminal seam.
//!
//! A pane may show an embedded terminal. The navigator does not own its
//! process or PTY; it only tells it where the pane went.

use crate::error::TerminalError;
use crate::nav::path::PathValue;

/// A running terminal that can follow the pane's working directory.
pub trait TerminalSession: Send + Sync {
    /// Asks the terminal to change to `path`.
    ///
    /// Must return without waiting for the shell to act on the request. An
    /// error only means the request could not be queued; the navigator logs
    /// it and moves on.
    fn set_working_directory(&self, path: &PathValue) -> Result<(), TerminalError>;
}
