//! Intents flowing from a pane controller into its navigator.
//!
//! Whatever triggered them (keys, clicks, scripts), user requests reach the
//! navigator as an [`Intent`] and come back as a [`DispatchOutcome`]. State
//! changes themselves are observed through a
//! [`Subscription`](crate::nav::Subscription).

use crate::nav::path::PathValue;

/// A navigation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Go to the given location, recording it in history.
    NavigateTo(PathValue),
    /// Step back in history.
    Back,
    /// Step forward in history.
    Forward,
    /// Go to the parent of the current location.
    Up,
    /// Re-read the current location without touching history.
    Refresh,
    /// Show or hide the pane's terminal.
    ToggleTerminal,
}

/// What an accepted [`Intent`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A read was issued under this generation.
    Loading { generation: u64 },
    /// The terminal became visible and was pointed at the current path.
    TerminalOpened,
    /// The terminal was hidden; the controller should give keyboard focus
    /// back to the listing.
    TerminalClosed,
}
