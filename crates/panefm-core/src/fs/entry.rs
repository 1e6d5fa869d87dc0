//! Directory entry representation.

use std::ffi::{OsStr, OsString};
use std::fs::Metadata;
use std::time::SystemTime;

/// What kind of filesystem object an entry is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    File,
    Directory,
    Symlink,
    Other,
}

impl EntryKind {
    /// Classifies from metadata obtained **without** following symlinks.
    pub fn from_metadata(metadata: &Metadata) -> Self {
        let ft = metadata.file_type();
        if ft.is_symlink() {
            Self::Symlink
        } else if ft.is_dir() {
            Self::Directory
        } else if ft.is_file() {
            Self::File
        } else {
            Self::Other
        }
    }
}

/// A single entry of a directory listing.
///
/// `DirectoryEntry` is immutable and produced only by a
/// [`DirectoryReader`](crate::fs::reader::DirectoryReader); the navigator
/// replaces whole listings rather than editing entries. Directory sizes are
/// reported as `0`.
///
/// [`name`](Self::name) is for display and matching typed input; it is
/// NFC-composed and lossily decoded. [`file_name`](Self::file_name) keeps the
/// bytes found on disk and is what paths are built from.
///
/// # Examples
///
/// ```
/// use panefm_core::{DirectoryEntry, EntryKind};
///
/// let entry = DirectoryEntry::new(".profile", EntryKind::File, 220, None, false);
/// assert!(entry.is_hidden());
/// assert!(!entry.is_dir());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    file_name: OsString,
    name: String,
    kind: EntryKind,
    size: u64,
    modified: Option<SystemTime>,
    readonly: bool,
}

impl DirectoryEntry {
    /// Creates an entry from already-known attributes.
    ///
    /// The display name is re-composed to NFC; macOS hands out decomposed
    /// names.
    pub fn new(
        file_name: impl AsRef<OsStr>,
        kind: EntryKind,
        size: u64,
        modified: Option<SystemTime>,
        readonly: bool,
    ) -> Self {
        let file_name = file_name.as_ref().to_os_string();
        Self {
            name: crate::nfc_string(&file_name.to_string_lossy()),
            file_name,
            kind,
            size: if kind == EntryKind::Directory { 0 } else { size },
            modified,
            readonly,
        }
    }

    /// Creates an entry from a file name and its (non-following) metadata.
    pub fn from_metadata(file_name: impl AsRef<OsStr>, metadata: &Metadata) -> Self {
        Self::new(
            file_name,
            EntryKind::from_metadata(metadata),
            metadata.len(),
            metadata.modified().ok(),
            metadata.permissions().readonly(),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The name exactly as stored in the directory.
    pub fn file_name(&self) -> &OsStr {
        &self.file_name
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    /// File size in bytes. Always `0` for directories.
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn modified(&self) -> Option<SystemTime> {
        self.modified
    }

    /// `true` when the entry's permission bits forbid writing.
    pub fn is_readonly(&self) -> bool {
        self.readonly
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    pub fn is_symlink(&self) -> bool {
        self.kind == EntryKind::Symlink
    }

    /// Returns `true` if the name starts with `.`.
    pub fn is_hidden(&self) -> bool {
        self.name.starts_with('.')
    }

    /// Lower-cased extension, empty when there is none.
    pub fn extension_lower(&self) -> String {
        match self.name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => ext.to_lowercase(),
            _ => String::new(),
        }
    }
}
