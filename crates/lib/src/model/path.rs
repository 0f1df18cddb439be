//! Key paths for addressing locations inside a [`Document`](super::Document).
//!
//! A key path is a dot separated sequence of keys whose first component is
//! always a namespace (`main`, `call`, `response`, ...). The remaining
//! components are either field keys of a tagged composite (`Z2K2`, `K1`) or
//! numeric indices into a typed list (`1`, `2`, ...).
//!
//! The [`Path`]/[`PathBuf`] pair follows the same borrowed/owned pattern as
//! `std::path::Path`/`PathBuf`. String paths are the wire-compatible form used
//! at the API boundary; internally the resolver works on typed [`Segment`]s.
//!
//! ```rust
//! use zobject::model::{PathBuf, Segment};
//! use std::str::FromStr;
//!
//! let path = PathBuf::from_str("main.Z2K2.Z8K1.1.Z17K1")?;
//! assert_eq!(path.namespace(), Some("main"));
//! assert_eq!(path.segments().nth(2), Some(Segment::Index(1)));
//!
//! let built = PathBuf::new().push("main").push("Z2K2").push_index(3);
//! assert_eq!(built.as_str(), "main.Z2K2.3");
//! # Ok::<(), std::convert::Infallible>(())
//! ```

use std::{borrow::Borrow, fmt, ops::Deref, str::FromStr};

/// Normalizes a path string by dropping empty components.
///
/// - `""` stays empty
/// - `".main"` → `"main"`
/// - `"main."` → `"main"`
/// - `"main..Z2K2"` → `"main.Z2K2"`
pub fn normalize_path(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }

    input
        .split('.')
        .filter(|component| !component.is_empty())
        .collect::<Vec<_>>()
        .join(".")
}

/// One typed step of a key path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Segment<'a> {
    /// Field key of a tagged composite, or a namespace.
    Key(&'a str),
    /// Index into a typed list. Index 0 is the marker item.
    Index(usize),
}

impl<'a> Segment<'a> {
    /// Classifies a raw path component.
    ///
    /// Only canonical decimal numbers (no sign, no leading zero except `0`
    /// itself) are treated as indices.
    pub fn parse(component: &'a str) -> Self {
        let canonical_number = !component.is_empty()
            && component.bytes().all(|b| b.is_ascii_digit())
            && (component == "0" || !component.starts_with('0'));
        match canonical_number.then(|| component.parse::<usize>().ok()).flatten() {
            Some(index) => Segment::Index(index),
            None => Segment::Key(component),
        }
    }

    pub fn as_index(&self) -> Option<usize> {
        match self {
            Segment::Index(index) => Some(*index),
            Segment::Key(_) => None,
        }
    }
}

impl fmt::Display for Segment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(key) => write!(f, "{key}"),
            Segment::Index(index) => write!(f, "{index}"),
        }
    }
}

/// An owned key path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathBuf {
    inner: String,
}

/// A borrowed key path. Always used behind a reference.
#[derive(Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Path {
    inner: str,
}

impl PathBuf {
    /// Creates a new empty path.
    pub fn new() -> Self {
        Self {
            inner: String::new(),
        }
    }

    /// Adds one or more dot separated components to the end of this path.
    pub fn push(mut self, path: impl AsRef<str>) -> Self {
        let normalized = normalize_path(path.as_ref());
        if normalized.is_empty() {
            return self;
        }

        if self.inner.is_empty() {
            self.inner = normalized;
        } else {
            self.inner.push('.');
            self.inner.push_str(&normalized);
        }
        self
    }

    /// Adds a list index to the end of this path.
    pub fn push_index(self, index: usize) -> Self {
        self.push(index.to_string())
    }

    /// Joins this path with another path.
    pub fn join(mut self, other: impl AsRef<Path>) -> Self {
        let other_path = other.as_ref();
        if self.inner.is_empty() {
            self.inner = other_path.inner.to_string();
        } else if !other_path.inner.is_empty() {
            self.inner.push('.');
            self.inner.push_str(&other_path.inner);
        }
        self
    }

    /// Creates a PathBuf by normalizing the input string.
    pub fn normalize(path: &str) -> Self {
        Self {
            inner: normalize_path(path),
        }
    }
}

impl Path {
    /// Creates a Path from a string without normalizing it.
    ///
    /// # Safety
    /// The string must already be normalized: no leading, trailing or
    /// consecutive dots.
    pub unsafe fn from_str_unchecked(s: &str) -> &Path {
        // SAFETY: Path is repr(transparent) over str
        unsafe { &*(s as *const str as *const Path) }
    }

    /// Returns an iterator over the raw path components.
    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.inner.split('.').filter(|s| !s.is_empty())
    }

    /// Returns an iterator over the typed path segments, namespace included.
    pub fn segments(&self) -> impl Iterator<Item = Segment<'_>> {
        self.components().map(Segment::parse)
    }

    /// The namespace this path addresses (its first component).
    pub fn namespace(&self) -> Option<&str> {
        self.components().next()
    }

    /// Returns the number of components in the path.
    pub fn len(&self) -> usize {
        self.components().count()
    }

    /// Returns `true` if the path has no components.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the parent path, or `None` for a bare namespace.
    pub fn parent(&self) -> Option<PathBuf> {
        self.inner.rfind('.').map(|last_dot| PathBuf {
            inner: self.inner[..last_dot].to_string(),
        })
    }

    /// Returns the last component of the path, or `None` if empty.
    pub fn last(&self) -> Option<&str> {
        if self.inner.is_empty() {
            None
        } else {
            self.inner.split('.').next_back()
        }
    }

    /// Returns `true` if `prefix` is this path or one of its ancestors.
    pub fn starts_with(&self, prefix: impl AsRef<Path>) -> bool {
        let prefix = prefix.as_ref().as_str();
        self.inner == *prefix
            || (self.inner.starts_with(prefix) && self.inner[prefix.len()..].starts_with('.'))
    }

    /// Returns the path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Converts this `Path` to an owned `PathBuf`.
    pub fn to_path_buf(&self) -> PathBuf {
        PathBuf {
            inner: self.inner.to_string(),
        }
    }
}

impl Default for PathBuf {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for PathBuf {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        // SAFETY: PathBuf only ever holds normalized strings
        unsafe { Path::from_str_unchecked(self.inner.as_str()) }
    }
}

impl AsRef<Path> for PathBuf {
    fn as_ref(&self) -> &Path {
        self.deref()
    }
}

impl AsRef<Path> for Path {
    fn as_ref(&self) -> &Path {
        self
    }
}

impl AsRef<Path> for str {
    fn as_ref(&self) -> &Path {
        // Borrowed strings cannot be normalized in place; callers with
        // untrusted input should go through PathBuf::normalize.
        // SAFETY: Path is repr(transparent) over str
        unsafe { Path::from_str_unchecked(self) }
    }
}

impl AsRef<Path> for String {
    fn as_ref(&self) -> &Path {
        self.as_str().as_ref()
    }
}

impl AsRef<str> for Path {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}

impl AsRef<str> for PathBuf {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}

impl Borrow<Path> for PathBuf {
    fn borrow(&self) -> &Path {
        self.deref()
    }
}

impl FromStr for PathBuf {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::normalize(s))
    }
}

impl From<&str> for PathBuf {
    fn from(s: &str) -> Self {
        Self::normalize(s)
    }
}

impl From<&Path> for PathBuf {
    fn from(path: &Path) -> Self {
        path.to_path_buf()
    }
}

impl fmt::Display for PathBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.deref(), f)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.inner.is_empty() {
            write!(f, "(empty path)")
        } else {
            write!(f, "{}", &self.inner)
        }
    }
}

/// Constructs a [`PathBuf`] from components.
///
/// ```rust
/// # use zobject::path;
/// let index = 2;
/// let path = path!("main", "Z2K2.Z8K1", index, "Z17K1");
/// assert_eq!(path.as_str(), "main.Z2K2.Z8K1.2.Z17K1");
/// ```
#[macro_export]
macro_rules! path {
    () => {
        $crate::model::PathBuf::new()
    };

    ($first:expr $(, $rest:expr)* $(,)?) => {{
        let path = $crate::model::PathBuf::new().push($first.to_string());
        $(
            let path = path.push($rest.to_string());
        )*
        path
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments_are_typed() {
        let path = PathBuf::from_str("main.Z2K2.Z8K1.1.Z17K1").unwrap();
        let segments: Vec<Segment<'_>> = path.segments().collect();
        assert_eq!(
            segments,
            vec![
                Segment::Key("main"),
                Segment::Key("Z2K2"),
                Segment::Key("Z8K1"),
                Segment::Index(1),
                Segment::Key("Z17K1"),
            ]
        );
    }

    #[test]
    fn test_non_canonical_numbers_are_keys() {
        assert_eq!(Segment::parse("0"), Segment::Index(0));
        assert_eq!(Segment::parse("01"), Segment::Key("01"));
        assert_eq!(Segment::parse("-1"), Segment::Key("-1"));
        assert_eq!(Segment::parse("K1"), Segment::Key("K1"));
    }

    #[test]
    fn test_path_normalization() {
        let cases = vec![
            ("", ""),
            (".main", "main"),
            ("main.", "main"),
            ("main..Z2K2", "main.Z2K2"),
            ("...main...Z2K2...", "main.Z2K2"),
            ("...", ""),
        ];

        for (input, expected) in cases {
            assert_eq!(
                PathBuf::from_str(input).unwrap().as_str(),
                expected,
                "Input '{input}' should normalize to '{expected}'"
            );
        }
    }

    #[test]
    fn test_parent_and_last() {
        let path = PathBuf::from("main.Z2K2.Z8K1.3");
        assert_eq!(path.last(), Some("3"));
        assert_eq!(path.parent().unwrap().as_str(), "main.Z2K2.Z8K1");
        assert!(PathBuf::from("main").parent().is_none());
        assert_eq!(path.namespace(), Some("main"));
    }

    #[test]
    fn test_starts_with_respects_component_boundaries() {
        let path = PathBuf::from("main.Z2K2.Z8K1.1");
        assert!(path.starts_with("main.Z2K2"));
        assert!(path.starts_with("main.Z2K2.Z8K1.1"));
        assert!(!path.starts_with("main.Z2K"));
        assert!(!path.starts_with("call"));
    }

    #[test]
    fn test_path_macro() {
        let base = "main";
        let path = path!(base, "Z2K2", 4usize);
        assert_eq!(path.as_str(), "main.Z2K2.4");
        assert!(path!().is_empty());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", PathBuf::from("main.Z2K1")), "main.Z2K1");
        assert_eq!(format!("{}", PathBuf::new()), "(empty path)");
    }
}
