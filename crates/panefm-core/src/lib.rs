//! panefm core library: UI-agnostic navigation for file-manager panes.
//!
//! `panefm-core` decides where a pane is, what it shows while a directory is
//! being read, and which read result wins when several are in flight. It
//! knows nothing about rendering; frontends drive a [`Navigator`] with
//! [`Intent`]s and render the [`NavSnapshot`]s it publishes.
//!
//! # Modules
//!
//! - [`nav`] — Paths, history, listing cache, sorting and the [`Navigator`].
//! - [`fs`] — Directory entries, listings and the [`DirectoryReader`] seam.
//! - [`config`] — TOML-based settings.
//! - [`event`] — [`Intent`] and [`DispatchOutcome`].
//! - [`terminal`] — The [`TerminalSession`] seam.
//! - [`status`] — The [`StatusNotifier`] seam.
//! - [`error`] — [`CoreError`], [`ReadError`] and [`TerminalError`].
//!
//! ```
//! use panefm_core::PathValue;
//!
//! let path = PathValue::normalize("/home//user/./docs/../pics/").unwrap();
//! assert_eq!(path.as_str(), "/home/user/pics");
//! assert_eq!(path.parent().unwrap().as_str(), "/home/user");
//! ```

pub mod config;
pub mod error;
pub mod event;
pub mod fs;
pub mod nav;
pub mod status;
pub mod terminal;

pub use config::settings::Config;
pub use error::{CoreError, CoreResult, HistoryDirection, ReadError, TerminalError};
pub use event::{DispatchOutcome, Intent};
pub use fs::{DirectoryEntry, DirectoryListing, DirectoryReader, EntryKind, LocalDirectoryReader};
pub use nav::filter::{filter_hidden, sort_entries, ListingPreferences, SortDirection, SortField};
pub use nav::{
    ListingCache, NavSnapshot, NavState, NavigationHistory, Navigator, NavigatorBuilder,
    NavigatorOptions, PathValue, Subscription,
};
pub use status::{Severity, SilentNotifier, StatusNotifier};
pub use terminal::TerminalSession;

/// Normalises a string to NFC (composed) form.
///
/// macOS stores filenames in NFD (decomposed), which makes composed
/// characters such as Korean Hangul show up as separate parts. Names and path
/// segments pass through this before they are compared or displayed.
pub fn nfc_string(s: &str) -> String {
    use unicode_normalization::UnicodeNormalization;
    s.nfc().collect()
}
