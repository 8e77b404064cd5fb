//! Plan entry shapes shared by the matcher, plan store, updater, and verifier.

use crate::RelativePath;

/// A resolved pairing: copy `source` over `dest` when the plan is applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CopyEntry {
    /// Path of the file in the source repository.
    pub source: RelativePath,
    /// Path of the counterpart in the destination repository.
    pub dest: RelativePath,
}

impl CopyEntry {
    /// Pairs a source path with its destination counterpart.
    pub fn new(source: RelativePath, dest: RelativePath) -> Self {
        Self { source, dest }
    }
}

/// A `Copy` entry missing one side, produced by hand edits gone wrong or by
/// the updater degrading an entry whose files vanished.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartialEntry {
    /// Source path, when present.
    pub source: Option<RelativePath>,
    /// Destination path, when present.
    pub dest: Option<RelativePath>,
}

/// A file deliberately left out of the copy set, recorded per side.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IgnoreEntry {
    /// A source file that should not be copied.
    Source(RelativePath),
    /// A destination file that should be left alone.
    Dest(RelativePath),
}

impl IgnoreEntry {
    /// The ignored path, whichever side it lives on.
    #[must_use]
    pub fn path(&self) -> &RelativePath {
        match self {
            Self::Source(path) | Self::Dest(path) => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_entry_equality_uses_both_fields() {
        let a = CopyEntry::new("a.txt".into(), "b.txt".into());
        let b = CopyEntry::new("A.TXT".into(), "B.TXT".into());
        let c = CopyEntry::new("a.txt".into(), "c.txt".into());
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn ignore_entry_exposes_its_path() {
        let entry = IgnoreEntry::Dest("old/tool.exe".into());
        assert_eq!(entry.path().as_str(), "old/tool.exe");
    }
}
