//! Normalized, immutable filesystem locations.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use crate::error::{CoreError, CoreResult};

/// A normalized hierarchical location.
///
/// Normalization is purely lexical: repeated and trailing separators are
/// collapsed, `.` segments are dropped and `..` pops the previous segment (and
/// is absorbed at the root of an absolute path). Segments keep their on-disk
/// bytes, so equality, hashing and [`as_path`](Self::as_path) address exactly
/// the directory that was named. Only the display form
/// ([`as_str`](Self::as_str)) is decoded lossily and re-composed to Unicode
/// NFC.
///
/// Cloning is cheap; all parts are shared.
///
/// ```
/// use panefm_core::PathValue;
///
/// let p = PathValue::normalize("/home//user/./docs/../pics/").unwrap();
/// assert_eq!(p.as_str(), "/home/user/pics");
/// assert_eq!(p.parent().unwrap().as_str(), "/home/user");
/// ```
#[derive(Clone)]
pub struct PathValue {
    absolute: bool,
    segments: Arc<[OsString]>,
    path: Arc<Path>,
    display: Arc<str>,
}

impl PathValue {
    /// Parses and normalizes `raw`.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidPath`] if `raw` is empty or contains a NUL byte.
    pub fn normalize(raw: &str) -> CoreResult<Self> {
        Self::from_path(Path::new(raw))
    }

    /// Normalizes a platform path without decoding it, so names that are not
    /// valid UTF-8 (or not NFC) stay reachable.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidPath`] if `path` is empty or contains a NUL byte.
    pub fn from_path(path: &Path) -> CoreResult<Self> {
        if path.as_os_str().is_empty() {
            return Err(CoreError::InvalidPath("empty path".to_string()));
        }
        validate(path.as_os_str())?;

        let absolute = path.has_root();
        let mut segments = Vec::new();
        push_components(&mut segments, absolute, path);
        Ok(Self::from_parts(absolute, segments))
    }

    /// The filesystem root, `/`.
    pub fn root() -> Self {
        Self::from_parts(true, Vec::new())
    }

    /// Appends a relative `segment` (which may itself contain separators,
    /// `.` or `..`) and re-normalizes. The segment's bytes are kept as given;
    /// pass [`DirectoryEntry::file_name`](crate::fs::entry::DirectoryEntry::file_name)
    /// to enter a listed entry.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidPath`] if `segment` is empty, absolute, or contains
    /// a NUL byte.
    pub fn join(&self, segment: impl AsRef<OsStr>) -> CoreResult<Self> {
        let segment = Path::new(segment.as_ref());
        if segment.as_os_str().is_empty() {
            return Err(CoreError::InvalidPath("empty segment".to_string()));
        }
        if segment.has_root() {
            return Err(CoreError::InvalidPath(format!(
                "cannot join absolute segment {:?}",
                segment.display().to_string()
            )));
        }
        validate(segment.as_os_str())?;

        let mut segments = self.segments.to_vec();
        push_components(&mut segments, self.absolute, segment);
        Ok(Self::from_parts(self.absolute, segments))
    }

    /// Returns the containing location, or `None` at the root (or at an empty
    /// relative path).
    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.segments.split_last()?;
        Some(Self::from_parts(self.absolute, rest.to_vec()))
    }

    /// The last segment as stored on disk, or `None` for the root.
    pub fn name(&self) -> Option<&OsStr> {
        self.segments.last().map(OsString::as_os_str)
    }

    pub fn segments(&self) -> &[OsString] {
        &self.segments
    }

    pub fn is_absolute(&self) -> bool {
        self.absolute
    }

    pub fn is_root(&self) -> bool {
        self.absolute && self.segments.is_empty()
    }

    /// `true` if `self` is `other` or lies below it.
    pub fn starts_with(&self, other: &PathValue) -> bool {
        self.absolute == other.absolute && self.segments.starts_with(&other.segments)
    }

    /// The human-readable form: lossily decoded and NFC-composed. Not for I/O;
    /// use [`as_path`](Self::as_path).
    pub fn as_str(&self) -> &str {
        &self.display
    }

    /// The exact on-disk path.
    pub fn as_path(&self) -> &Path {
        &self.path
    }

    pub fn to_path_buf(&self) -> PathBuf {
        self.path.to_path_buf()
    }

    fn from_parts(absolute: bool, segments: Vec<OsString>) -> Self {
        let display = render(absolute, &segments);
        let mut path = match (absolute, segments.is_empty()) {
            (true, _) => PathBuf::from("/"),
            (false, true) => PathBuf::from("."),
            (false, false) => PathBuf::new(),
        };
        path.extend(&segments);
        Self {
            absolute,
            segments: segments.into(),
            path: path.into(),
            display: display.into(),
        }
    }
}

fn validate(raw: &OsStr) -> CoreResult<()> {
    let lossy = raw.to_string_lossy();
    if lossy.contains('\0') {
        return Err(CoreError::InvalidPath(format!(
            "{:?} contains a NUL byte",
            lossy.replace('\0', "\\0")
        )));
    }
    Ok(())
}

fn push_components(segments: &mut Vec<OsString>, absolute: bool, path: &Path) {
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir | Component::CurDir => {}
            Component::ParentDir => {
                let last_is_parent = segments.last().map(|s| s == "..");
                match last_is_parent {
                    Some(false) => {
                        segments.pop();
                    }
                    Some(true) | None if !absolute => segments.push(OsString::from("..")),
                    // `/..` is `/`
                    _ => {}
                }
            }
            Component::Normal(name) => segments.push(name.to_os_string()),
        }
    }
}

fn render(absolute: bool, segments: &[OsString]) -> String {
    let names: Vec<String> = segments
        .iter()
        .map(|s| crate::nfc_string(&s.to_string_lossy()))
        .collect();
    match (absolute, names.is_empty()) {
        (true, true) => "/".to_string(),
        (false, true) => ".".to_string(),
        (true, false) => format!("/{}", names.join("/")),
        (false, false) => names.join("/"),
    }
}

impl PartialEq for PathValue {
    fn eq(&self, other: &Self) -> bool {
        self.absolute == other.absolute && self.segments == other.segments
    }
}

impl Eq for PathValue {}

impl Hash for PathValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.absolute.hash(state);
        self.segments.hash(state);
    }
}

impl fmt::Display for PathValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for PathValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PathValue({:?})", self.path)
    }
}

impl AsRef<Path> for PathValue {
    fn as_ref(&self) -> &Path {
        self.as_path()
    }
}

impl std::str::FromStr for PathValue {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::normalize(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn p(raw: &str) -> PathValue {
        PathValue::normalize(raw).unwrap()
    }

    #[test]
    fn empty_is_rejected() {
        assert!(matches!(
            PathValue::normalize(""),
            Err(CoreError::InvalidPath(_))
        ));
    }

    #[test]
    fn nul_byte_is_rejected() {
        assert!(matches!(
            PathValue::normalize("/tmp/a\0b"),
            Err(CoreError::InvalidPath(_))
        ));
    }

    #[test]
    fn trailing_and_repeated_separators_collapse() {
        assert_eq!(p("/home//user///").as_str(), "/home/user");
        assert_eq!(p("/home/user/"), p("/home/user"));
    }

    #[test]
    fn dot_segments_resolve_lexically() {
        assert_eq!(p("/a/./b/../c").as_str(), "/a/c");
        assert_eq!(p("/../..").as_str(), "/");
        assert_eq!(p("a/../../b").as_str(), "../b");
        assert_eq!(p("a/..").as_str(), ".");
    }

    #[test]
    fn root_forms() {
        assert!(p("/").is_root());
        assert!(p("///").is_root());
        assert_eq!(PathValue::root(), p("/"));
        assert_eq!(p("/").as_str(), "/");
        assert!(p("/").name().is_none());
    }

    #[test]
    fn nfc_and_nfd_names_stay_distinct_on_disk() {
        // "é" precomposed vs. "e" + combining acute
        let composed = p("/tmp/caf\u{e9}");
        let decomposed = p("/tmp/cafe\u{301}");
        assert_ne!(composed, decomposed);
        assert_eq!(composed.as_str(), decomposed.as_str());
        assert_eq!(decomposed.as_path(), Path::new("/tmp/cafe\u{301}"));

        let set: HashSet<PathValue> = [composed, decomposed].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_names_keep_their_bytes() {
        use std::os::unix::ffi::OsStrExt;

        let raw = OsStr::from_bytes(b"/tmp/\xffdata");
        let value = PathValue::from_path(Path::new(raw)).unwrap();
        assert_eq!(value.as_path().as_os_str().as_bytes(), b"/tmp/\xffdata");
        assert_eq!(value.as_str(), "/tmp/\u{fffd}data");

        let child = PathValue::root()
            .join("tmp")
            .unwrap()
            .join(OsStr::from_bytes(b"\xffdata"))
            .unwrap();
        assert_eq!(child, value);
    }

    #[test]
    fn parent_walks_to_root() {
        let docs = p("/home/docs");
        let home = docs.parent().unwrap();
        assert_eq!(home.as_str(), "/home");
        let root = home.parent().unwrap();
        assert!(root.is_root());
        assert!(root.parent().is_none());
    }

    #[test]
    fn join_appends_and_normalizes() {
        let home = p("/home");
        assert_eq!(home.join("docs").unwrap().as_str(), "/home/docs");
        assert_eq!(home.join("docs/../pics/").unwrap().as_str(), "/home/pics");
        assert_eq!(home.join("..").unwrap().as_str(), "/");
    }

    #[test]
    fn join_rejects_bad_segments() {
        let home = p("/home");
        assert!(home.join("").is_err());
        assert!(home.join("/etc").is_err());
        assert!(home.join("a\0").is_err());
    }

    #[test]
    fn starts_with_is_segment_aware() {
        assert!(p("/home/docs").starts_with(&p("/home")));
        assert!(p("/home").starts_with(&p("/home")));
        assert!(!p("/homework").starts_with(&p("/home")));
        assert!(!p("home").starts_with(&p("/home")));
    }

    #[test]
    fn from_path_round_trips() {
        let value = PathValue::from_path(Path::new("/var/log/")).unwrap();
        assert_eq!(value.to_path_buf(), PathBuf::from("/var/log"));
    }

    #[test]
    fn parses_from_str() {
        let value: PathValue = "/etc/".parse().unwrap();
        assert_eq!(value.name(), Some(OsStr::new("etc")));
        assert_eq!(format!("{value:?}"), "PathValue(\"/etc\")");
    }
}
