//! File system abstractions for panefm.
//!
//! This module provides the entry and listing types ([`entry::DirectoryEntry`],
//! [`listing::DirectoryListing`]), the asynchronous [`reader::DirectoryReader`]
//! seam and its local-disk implementation ([`reader::LocalDirectoryReader`]).

pub mod entry;
pub mod listing;
pub mod reader;

pub use entry::{DirectoryEntry, EntryKind};
pub use listing::DirectoryListing;
pub use reader::{DirectoryReader, LocalDirectoryReader};
