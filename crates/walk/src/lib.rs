#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `codesync_walk` enumerates the regular files under a repository root,
//! yielding repository-relative paths while pruning excluded directories such
//! as build output and editor state. Both the matcher and the updater consume
//! the same traversal, so the walker keeps ordering stable across platforms
//! by sorting directory entries lexicographically before yielding them.
//!
//! # Design
//!
//! - [`WalkBuilder`] configures the root and the [`ExcludeSet`].
//! - [`Walker`] implements `Iterator<Item = RelativePath>` and performs a
//!   lazy depth-first traversal. Directories whose name appears in the
//!   exclude set are never descended into, which covers both "first
//!   component" and "interior segment" exclusion since every ancestor of a
//!   yielded file is a directory the walker chose to enter.
//! - Inaccessible entries are skipped silently: an unreadable directory
//!   contributes no paths, and a file whose type cannot be determined is
//!   dropped. Only a missing or unreadable root is an error, reported by
//!   [`WalkBuilder::build`].
//!
//! # Invariants
//!
//! - Yielded paths are always relative to the configured root and never
//!   contain `..` segments.
//! - No yielded path has a component matching the exclude set.
//! - Traversal never panics and, after a successful build, never fails.
//!
//! # Examples
//!
//! ```
//! use codesync_walk::WalkBuilder;
//! use std::fs;
//!
//! let temp = tempfile::tempdir().unwrap();
//! fs::create_dir(temp.path().join("bin")).unwrap();
//! fs::write(temp.path().join("bin/skipped.dll"), b"x").unwrap();
//! fs::write(temp.path().join("kept.cs"), b"x").unwrap();
//!
//! let walker = WalkBuilder::new(temp.path()).build().unwrap();
//! let names: Vec<String> = walker.map(|p| p.as_str().to_string()).collect();
//! assert_eq!(names, vec!["kept.cs".to_string()]);
//! ```

use std::error::Error;
use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use codesync_core::RelativePath;

/// Directory names skipped by default.
pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &["obj", "bin", ".vs", ".vscode", ".git"];

/// Case-insensitive set of directory names to prune during traversal.
#[derive(Clone, Debug)]
pub struct ExcludeSet {
    folded: Vec<String>,
}

impl ExcludeSet {
    /// Creates an empty set.
    #[must_use]
    pub fn empty() -> Self {
        Self { folded: Vec::new() }
    }

    /// Adds a directory name to the set.
    pub fn add<S: AsRef<str>>(&mut self, name: S) {
        let folded = name.as_ref().to_lowercase();
        if !self.folded.contains(&folded) {
            self.folded.push(folded);
        }
    }

    /// Extends the set from an iterator of names.
    pub fn extend<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            self.add(name);
        }
    }

    /// Reports whether a directory name is excluded. Matching is
    /// case-insensitive.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        let folded = name.to_lowercase();
        self.folded.iter().any(|entry| *entry == folded)
    }
}

impl Default for ExcludeSet {
    /// The default set: `obj`, `bin`, `.vs`, `.vscode`, `.git`.
    fn default() -> Self {
        let mut set = Self::empty();
        set.extend(DEFAULT_EXCLUDED_DIRS.iter().copied());
        set
    }
}

/// Configures a traversal rooted at a repository directory.
#[derive(Clone, Debug)]
pub struct WalkBuilder {
    root: PathBuf,
    excludes: ExcludeSet,
}

impl WalkBuilder {
    /// Creates a builder for the given root with the default exclude set.
    #[must_use]
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            excludes: ExcludeSet::default(),
        }
    }

    /// Replaces the exclude set.
    #[must_use]
    pub fn excludes(mut self, excludes: ExcludeSet) -> Self {
        self.excludes = excludes;
        self
    }

    /// Builds the walker, verifying that the root is a readable directory.
    pub fn build(self) -> Result<Walker, WalkError> {
        let metadata = fs::metadata(&self.root)
            .map_err(|error| WalkError::root(self.root.clone(), error))?;
        if !metadata.is_dir() {
            return Err(WalkError::not_a_directory(self.root));
        }

        let mut walker = Walker {
            excludes: self.excludes,
            stack: Vec::new(),
        };
        walker.push_directory(self.root, PathBuf::new());
        Ok(walker)
    }
}

/// Lazy depth-first iterator over the files under a root.
#[derive(Debug)]
pub struct Walker {
    excludes: ExcludeSet,
    stack: Vec<DirectoryState>,
}

impl Walker {
    fn push_directory(&mut self, fs_path: PathBuf, relative_prefix: PathBuf) {
        // Unreadable directories contribute nothing.
        if let Some(state) = DirectoryState::read(fs_path, relative_prefix) {
            self.stack.push(state);
        }
    }
}

impl Iterator for Walker {
    type Item = RelativePath;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (full_path, relative_path) = {
                let state = self.stack.last_mut()?;
                match state.next_name() {
                    Some(name) => {
                        let full_path = state.fs_path.join(&name);
                        let relative_path = state.relative_prefix.join(&name);
                        (full_path, relative_path)
                    }
                    None => {
                        self.stack.pop();
                        continue;
                    }
                }
            };

            let Ok(file_type) = fs::symlink_metadata(&full_path).map(|m| m.file_type()) else {
                continue;
            };
            if file_type.is_dir() {
                let name = relative_path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                if !self.excludes.contains(&name) {
                    self.push_directory(full_path, relative_path);
                }
                continue;
            }
            if file_type.is_file() {
                return Some(RelativePath::from_path(&relative_path));
            }
            // Symlinks and special files are not part of the reconciliation.
        }
    }
}

#[derive(Debug)]
struct DirectoryState {
    fs_path: PathBuf,
    relative_prefix: PathBuf,
    entries: Vec<OsString>,
    index: usize,
}

impl DirectoryState {
    fn read(fs_path: PathBuf, relative_prefix: PathBuf) -> Option<Self> {
        let read_dir = fs::read_dir(&fs_path).ok()?;
        let mut entries = Vec::new();
        for entry in read_dir {
            let Ok(entry) = entry else {
                continue;
            };
            entries.push(entry.file_name());
        }
        entries.sort();
        Some(Self {
            fs_path,
            relative_prefix,
            entries,
            index: 0,
        })
    }

    fn next_name(&mut self) -> Option<OsString> {
        let name = self.entries.get(self.index)?.clone();
        self.index += 1;
        Some(name)
    }
}

/// Error building a walker.
#[derive(Debug)]
pub struct WalkError {
    kind: WalkErrorKind,
}

impl WalkError {
    fn root(path: PathBuf, source: io::Error) -> Self {
        Self {
            kind: WalkErrorKind::Root { path, source },
        }
    }

    fn not_a_directory(path: PathBuf) -> Self {
        Self {
            kind: WalkErrorKind::NotADirectory { path },
        }
    }

    /// Returns the specific failure.
    #[must_use]
    pub fn kind(&self) -> &WalkErrorKind {
        &self.kind
    }
}

impl fmt::Display for WalkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            WalkErrorKind::Root { path, source } => {
                write!(
                    f,
                    "failed to read repository root '{}': {}",
                    path.display(),
                    source
                )
            }
            WalkErrorKind::NotADirectory { path } => {
                write!(f, "repository root '{}' is not a directory", path.display())
            }
        }
    }
}

impl Error for WalkError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.kind {
            WalkErrorKind::Root { source, .. } => Some(source),
            WalkErrorKind::NotADirectory { .. } => None,
        }
    }
}

/// Classification of walker construction failures.
#[derive(Debug)]
pub enum WalkErrorKind {
    /// The root could not be inspected.
    Root {
        /// Root path that failed.
        path: PathBuf,
        /// Underlying error from the operating system.
        source: io::Error,
    },
    /// The root exists but is not a directory.
    NotADirectory {
        /// Offending path.
        path: PathBuf,
    },
}

/// Convenience wrapper: enumerate every file under `root` with the given
/// exclusions, eagerly collected.
pub fn enumerate(root: &Path, excludes: &ExcludeSet) -> Result<Vec<RelativePath>, WalkError> {
    let walker = WalkBuilder::new(root).excludes(excludes.clone()).build()?;
    Ok(walker.collect())
}
