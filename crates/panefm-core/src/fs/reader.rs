//! Directory reading.
//!
//! [`DirectoryReader`] is the only asynchronous seam of the navigation core.
//! [`LocalDirectoryReader`] implements it over `tokio::fs`.

use std::path::Path;

use async_trait::async_trait;

use crate::error::ReadError;
use crate::fs::entry::DirectoryEntry;
use crate::nav::filter::ListingPreferences;
use crate::nav::path::PathValue;

/// Produces the entries of a directory.
///
/// Implementations may take arbitrarily long; the navigator never blocks on
/// them and discards results of reads that have been superseded. A reader may
/// be shared by several navigators.
#[async_trait]
pub trait DirectoryReader: Send + Sync {
    /// Reads the immediate contents of `path`, already in display order.
    async fn read(&self, path: &PathValue) -> Result<Vec<DirectoryEntry>, ReadError>;
}

/// Reads directories from the local disk and shapes them with
/// [`ListingPreferences`].
#[derive(Debug, Clone, Default)]
pub struct LocalDirectoryReader {
    preferences: ListingPreferences,
}

impl LocalDirectoryReader {
    pub fn new(preferences: ListingPreferences) -> Self {
        Self { preferences }
    }

    pub fn preferences(&self) -> &ListingPreferences {
        &self.preferences
    }
}

#[async_trait]
impl DirectoryReader for LocalDirectoryReader {
    async fn read(&self, path: &PathValue) -> Result<Vec<DirectoryEntry>, ReadError> {
        let entries = read_directory(path.as_ref()).await?;
        Ok(self.preferences.apply(&entries))
    }
}

/// Reads the immediate contents of a directory, unsorted.
///
/// Entries whose metadata cannot be read (removed mid-listing, for instance)
/// are skipped rather than failing the whole read. Symlinks are reported as
/// such and not followed.
///
/// # Errors
///
/// - [`ReadError::NotFound`] — the path does not exist.
/// - [`ReadError::NotADirectory`] — the path is not a directory.
/// - [`ReadError::PermissionDenied`] — read access is denied.
/// - [`ReadError::Io`] — any other I/O error.
pub async fn read_directory(path: &Path) -> Result<Vec<DirectoryEntry>, ReadError> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|e| ReadError::from_io(path, &e))?;
    if !metadata.is_dir() {
        return Err(ReadError::NotADirectory);
    }

    let mut read_dir = tokio::fs::read_dir(path)
        .await
        .map_err(|e| ReadError::from_io(path, &e))?;

    let mut entries = Vec::new();
    loop {
        let dir_entry = match read_dir.next_entry().await {
            Ok(Some(e)) => e,
            Ok(None) => break,
            Err(e) => return Err(ReadError::from_io(path, &e)),
        };
        let metadata = match tokio::fs::symlink_metadata(dir_entry.path()).await {
            Ok(m) => m,
            Err(e) => {
                tracing::debug!("skipping {}: {e}", dir_entry.path().display());
                continue;
            }
        };
        entries.push(DirectoryEntry::from_metadata(
            dir_entry.file_name(),
            &metadata,
        ));
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::filter::{SortDirection, SortField};
    use std::fs;
    use tempfile::TempDir;

    fn value(path: &Path) -> PathValue {
        PathValue::from_path(path).unwrap()
    }

    fn names(entries: &[DirectoryEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.name()).collect()
    }

    #[tokio::test]
    async fn read_directory_lists_files_and_dirs() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.txt"), "hello").unwrap();
        fs::create_dir(tmp.path().join("sub")).unwrap();

        let mut entries = read_directory(tmp.path()).await.unwrap();
        entries.sort_by(|a, b| a.name().cmp(b.name()));

        assert_eq!(names(&entries), vec!["a.txt", "sub"]);
        assert_eq!(entries[0].size(), 5);
        assert!(entries[1].is_dir());
    }

    #[tokio::test]
    async fn read_directory_empty() {
        let tmp = TempDir::new().unwrap();
        assert!(read_directory(tmp.path()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn read_directory_not_found() {
        let tmp = TempDir::new().unwrap();
        let err = read_directory(&tmp.path().join("missing")).await.unwrap_err();
        assert_eq!(err, ReadError::NotFound);
    }

    #[tokio::test]
    async fn read_directory_on_file_is_not_a_directory() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("file.txt");
        fs::write(&file, "x").unwrap();

        let err = read_directory(&file).await.unwrap_err();
        assert_eq!(err, ReadError::NotADirectory);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn read_directory_reports_symlinks() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("real")).unwrap();
        std::os::unix::fs::symlink(tmp.path().join("real"), tmp.path().join("alias")).unwrap();

        let entries = read_directory(tmp.path()).await.unwrap();
        let alias = entries.iter().find(|e| e.name() == "alias").unwrap();
        assert!(alias.is_symlink());
    }

    #[tokio::test]
    async fn decomposed_directory_is_reachable_through_its_entry() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("cafe\u{301}");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("menu.txt"), "").unwrap();

        let reader = LocalDirectoryReader::default();
        let parent = value(tmp.path());
        let listed = reader.read(&parent).await.unwrap();
        assert_eq!(listed[0].name(), "caf\u{e9}");

        let child = parent.join(listed[0].file_name()).unwrap();
        let entries = reader.read(&child).await.unwrap();
        assert_eq!(names(&entries), vec!["menu.txt"]);
    }

    #[tokio::test]
    async fn local_reader_applies_default_preferences() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("b.txt"), "").unwrap();
        fs::write(tmp.path().join("A.txt"), "").unwrap();
        fs::write(tmp.path().join(".hidden"), "").unwrap();
        fs::create_dir(tmp.path().join("zdir")).unwrap();

        let reader = LocalDirectoryReader::default();
        let entries = reader.read(&value(tmp.path())).await.unwrap();

        assert_eq!(names(&entries), vec!["zdir", "A.txt", "b.txt"]);
    }

    #[tokio::test]
    async fn local_reader_respects_custom_preferences() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("small"), "1").unwrap();
        fs::write(tmp.path().join("large"), "1234567890").unwrap();
        fs::write(tmp.path().join(".dot"), "12345").unwrap();

        let reader = LocalDirectoryReader::new(ListingPreferences {
            show_hidden: true,
            sort_field: SortField::Size,
            sort_direction: SortDirection::Descending,
            dirs_first: true,
        });
        let entries = reader.read(&value(tmp.path())).await.unwrap();

        assert_eq!(names(&entries), vec!["large", ".dot", "small"]);
    }
}
