//! Sorting and filtering for directory entries.

use crate::config::settings::GeneralConfig;
use crate::fs::entry::DirectoryEntry;

/// The field by which entries are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    /// Sort alphabetically by name (case-insensitive).
    #[default]
    Name,
    /// Sort by file size in bytes.
    Size,
    /// Sort by last-modified time.
    Date,
    /// Sort by file extension (case-insensitive).
    Type,
}

impl SortField {
    /// Parses a config value. Unknown names fall back to [`SortField::Name`].
    pub fn from_config(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "size" => Self::Size,
            "date" | "modified" => Self::Date,
            "type" | "extension" => Self::Type,
            _ => Self::Name,
        }
    }
}

/// Sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// Smallest / earliest / A–Z first.
    #[default]
    Ascending,
    /// Largest / latest / Z–A first.
    Descending,
}

/// How a reader should shape a listing before handing it to the navigator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingPreferences {
    pub show_hidden: bool,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
    pub dirs_first: bool,
}

impl Default for ListingPreferences {
    fn default() -> Self {
        Self {
            show_hidden: false,
            sort_field: SortField::Name,
            sort_direction: SortDirection::Ascending,
            dirs_first: true,
        }
    }
}

impl ListingPreferences {
    pub fn from_config(general: &GeneralConfig) -> Self {
        Self {
            show_hidden: general.show_hidden,
            sort_field: SortField::from_config(&general.default_sort),
            sort_direction: if general.sort_descending {
                SortDirection::Descending
            } else {
                SortDirection::Ascending
            },
            dirs_first: general.sort_dir_first,
        }
    }

    /// Filters then sorts `entries`.
    pub fn apply(&self, entries: &[DirectoryEntry]) -> Vec<DirectoryEntry> {
        let visible = filter_hidden(entries, self.show_hidden);
        sort_entries(
            &visible,
            self.sort_field,
            self.sort_direction,
            self.dirs_first,
        )
    }
}

/// Sorts a list of entries by the given field and direction.
///
/// When `dirs_first` is `true`, directories always appear before everything
/// else regardless of the sort field. Returns a **new** sorted `Vec`; the
/// input slice is never mutated.
pub fn sort_entries(
    entries: &[DirectoryEntry],
    field: SortField,
    direction: SortDirection,
    dirs_first: bool,
) -> Vec<DirectoryEntry> {
    let mut sorted: Vec<DirectoryEntry> = entries.to_vec();

    sorted.sort_by(|a, b| {
        if dirs_first {
            let dir_cmp = b.is_dir().cmp(&a.is_dir());
            if dir_cmp != std::cmp::Ordering::Equal {
                return dir_cmp;
            }
        }

        let ord = compare_by_field(a, b, field);

        match direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });

    sorted
}

fn compare_by_field(a: &DirectoryEntry, b: &DirectoryEntry, field: SortField) -> std::cmp::Ordering {
    match field {
        SortField::Name => a.name().to_lowercase().cmp(&b.name().to_lowercase()),
        SortField::Size => a.size().cmp(&b.size()),
        SortField::Date => a.modified().cmp(&b.modified()),
        SortField::Type => a
            .extension_lower()
            .cmp(&b.extension_lower())
            .then_with(|| a.name().to_lowercase().cmp(&b.name().to_lowercase())),
    }
}

/// Filters out hidden entries when `show_hidden` is `false`.
pub fn filter_hidden(entries: &[DirectoryEntry], show_hidden: bool) -> Vec<DirectoryEntry> {
    if show_hidden {
        return entries.to_vec();
    }
    entries.iter().filter(|e| !e.is_hidden()).cloned().collect()
}
