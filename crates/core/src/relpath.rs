//! Repository-relative paths with folded comparison semantics.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

/// A path relative to a repository root.
///
/// The stored text is whatever the producer wrote (the walker uses the host
/// separator; plan files carry whatever the generating host used). Comparison
/// is case-insensitive and separator-insensitive over the component sequence,
/// which is what allows a plan written on Windows to be applied on Unix and a
/// destination differing from its source only in case to count as an exact
/// path match.
#[derive(Clone, Debug)]
pub struct RelativePath {
    text: String,
}

impl RelativePath {
    /// Wraps the given path text without normalizing it.
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self { text: text.into() }
    }

    /// Builds a relative path from a filesystem path, joining components with
    /// the host separator.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        let mut text = String::new();
        for component in path.components() {
            if !text.is_empty() {
                text.push(std::path::MAIN_SEPARATOR);
            }
            text.push_str(&component.as_os_str().to_string_lossy());
        }
        Self { text }
    }

    /// Returns the stored path text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Returns the last component, or the empty string for an empty path.
    ///
    /// Extraction is purely lexical; no filesystem access occurs.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.components().last().unwrap_or("")
    }

    /// Iterates over the path components, treating both `/` and `\` as
    /// separators. Empty segments are skipped.
    pub fn components(&self) -> impl DoubleEndedIterator<Item = &str> {
        self.text
            .split(['/', '\\'])
            .filter(|segment| !segment.is_empty())
    }

    /// Resolves this relative path against a root directory.
    #[must_use]
    pub fn resolve(&self, root: &Path) -> PathBuf {
        let mut resolved = root.to_path_buf();
        for component in self.components() {
            resolved.push(component);
        }
        resolved
    }

    /// The comparison key: components lowercased and joined with `/`.
    fn folded(&self) -> String {
        let mut key = String::with_capacity(self.text.len());
        for component in self.components() {
            if !key.is_empty() {
                key.push('/');
            }
            for ch in component.chars() {
                key.extend(ch.to_lowercase());
            }
        }
        key
    }
}

impl PartialEq for RelativePath {
    fn eq(&self, other: &Self) -> bool {
        let mut left = self.components();
        let mut right = other.components();
        loop {
            match (left.next(), right.next()) {
                (None, None) => return true,
                (Some(a), Some(b)) => {
                    if !a.to_lowercase().eq(&b.to_lowercase()) {
                        return false;
                    }
                }
                _ => return false,
            }
        }
    }
}

impl Eq for RelativePath {}

impl Hash for RelativePath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.folded().hash(state);
    }
}

impl PartialOrd for RelativePath {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RelativePath {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.folded().cmp(&other.folded())
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<&str> for RelativePath {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn equality_ignores_case() {
        assert_eq!(
            RelativePath::new("lib/Util.c"),
            RelativePath::new("LIB/util.C")
        );
    }

    #[test]
    fn equality_ignores_separator() {
        assert_eq!(
            RelativePath::new("a/b/c.txt"),
            RelativePath::new("a\\b\\c.txt")
        );
    }

    #[test]
    fn differing_components_are_unequal() {
        assert_ne!(
            RelativePath::new("a/b/c.txt"),
            RelativePath::new("a/x/c.txt")
        );
        assert_ne!(RelativePath::new("a/b.txt"), RelativePath::new("b.txt"));
    }

    #[test]
    fn hash_agrees_with_equality() {
        let mut set = HashSet::new();
        set.insert(RelativePath::new("Docs\\ReadMe.md"));
        assert!(set.contains(&RelativePath::new("docs/readme.md")));
    }

    #[test]
    fn file_name_is_last_component() {
        assert_eq!(RelativePath::new("a/b/c.txt").file_name(), "c.txt");
        assert_eq!(RelativePath::new("c.txt").file_name(), "c.txt");
        assert_eq!(RelativePath::new("").file_name(), "");
    }

    #[test]
    fn resolve_joins_components() {
        let resolved = RelativePath::new("a\\b.txt").resolve(Path::new("/root"));
        assert_eq!(resolved, Path::new("/root").join("a").join("b.txt"));
    }

    #[test]
    fn display_preserves_original_text() {
        let path = RelativePath::new("A\\b/C.txt");
        assert_eq!(path.to_string(), "A\\b/C.txt");
    }

    #[test]
    fn ordering_is_case_insensitive() {
        let mut paths = vec![
            RelativePath::new("B.txt"),
            RelativePath::new("a.txt"),
            RelativePath::new("C.txt"),
        ];
        paths.sort();
        let names: Vec<&str> = paths.iter().map(RelativePath::as_str).collect();
        assert_eq!(names, vec!["a.txt", "B.txt", "C.txt"]);
    }
}
