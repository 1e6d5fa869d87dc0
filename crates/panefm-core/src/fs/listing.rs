//! Resolved directory listings.

use std::time::{Duration, Instant};

use crate::fs::entry::DirectoryEntry;
use crate::nav::path::PathValue;

/// The entries of one directory as produced by one navigation request.
///
/// `generation` is the navigator generation of the request that produced the
/// listing; `fetch_seq` increases with every listing a navigator installs, so
/// later fetches always carry larger numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryListing {
    path: PathValue,
    entries: Vec<DirectoryEntry>,
    generation: u64,
    fetch_seq: u64,
    fetched_at: Instant,
}

impl DirectoryListing {
    pub fn new(
        path: PathValue,
        entries: Vec<DirectoryEntry>,
        generation: u64,
        fetch_seq: u64,
    ) -> Self {
        Self {
            path,
            entries,
            generation,
            fetch_seq,
            fetched_at: Instant::now(),
        }
    }

    pub fn path(&self) -> &PathValue {
        &self.path
    }

    pub fn entries(&self) -> &[DirectoryEntry] {
        &self.entries
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn fetch_seq(&self) -> u64 {
        self.fetch_seq
    }

    pub fn fetched_at(&self) -> Instant {
        self.fetched_at
    }

    pub fn age(&self) -> Duration {
        self.fetched_at.elapsed()
    }

    /// Looks up an entry by exact name.
    pub fn find(&self, name: &str) -> Option<&DirectoryEntry> {
        self.entries.iter().find(|e| e.name() == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::entry::EntryKind;

    #[test]
    fn find_by_name() {
        let listing = DirectoryListing::new(
            PathValue::normalize("/tmp").unwrap(),
            vec![
                DirectoryEntry::new("a", EntryKind::File, 1, None, false),
                DirectoryEntry::new("b", EntryKind::Directory, 0, None, false),
            ],
            3,
            7,
        );

        assert_eq!(listing.len(), 2);
        assert!(listing.find("b").unwrap().is_dir());
        assert!(listing.find("c").is_none());
        assert_eq!(listing.generation(), 3);
        assert_eq!(listing.fetch_seq(), 7);
        assert!(listing.age() < Duration::from_secs(60));
    }
}
