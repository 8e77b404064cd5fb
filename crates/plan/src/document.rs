//! The in-memory plan document and its lazy entry views.

use std::path::{Path, PathBuf};

use codesync_core::{CopyEntry, PartialEntry, RelativePath};
use time::OffsetDateTime;

/// One child entry of the plan document, in document order.
///
/// Both shapes keep their sides optional: classification into the usable
/// views happens lazily so a hand-edited document loads even when individual
/// entries are incomplete.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlanEntry {
    /// A `<Copy>` element.
    Copy {
        /// The `<Source>` child, when present and non-empty.
        source: Option<RelativePath>,
        /// The `<Destination>` child, when present and non-empty.
        dest: Option<RelativePath>,
    },
    /// An `<Ignore>` element.
    Ignore {
        /// The `<Source>` child, when present and non-empty.
        source: Option<RelativePath>,
        /// The `<Destination>` child, when present and non-empty.
        dest: Option<RelativePath>,
    },
}

/// A parsed plan document.
#[derive(Clone, Debug)]
pub struct Plan {
    source_dir: PathBuf,
    dest_dir: PathBuf,
    modified_time: Option<OffsetDateTime>,
    entries: Vec<PlanEntry>,
}

impl Plan {
    /// Creates an empty plan over the given repository roots.
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(
        source_dir: P,
        dest_dir: Q,
        modified_time: Option<OffsetDateTime>,
    ) -> Self {
        Self {
            source_dir: source_dir.into(),
            dest_dir: dest_dir.into(),
            modified_time,
            entries: Vec::new(),
        }
    }

    /// Appends an entry, preserving document order.
    pub fn push(&mut self, entry: PlanEntry) {
        self.entries.push(entry);
    }

    /// The source repository root recorded in the plan.
    #[must_use]
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// The destination repository root recorded in the plan.
    #[must_use]
    pub fn dest_dir(&self) -> &Path {
        &self.dest_dir
    }

    /// The generation timestamp, when the plan carries one.
    #[must_use]
    pub fn modified_time(&self) -> Option<OffsetDateTime> {
        self.modified_time
    }

    /// All entries in document order.
    #[must_use]
    pub fn entries(&self) -> &[PlanEntry] {
        &self.entries
    }

    /// `Copy` entries with both sides present.
    pub fn files_to_copy(&self) -> impl Iterator<Item = CopyEntry> + '_ {
        self.entries.iter().filter_map(|entry| match entry {
            PlanEntry::Copy {
                source: Some(source),
                dest: Some(dest),
            } => Some(CopyEntry::new(source.clone(), dest.clone())),
            _ => None,
        })
    }

    /// `Copy` entries missing at least one side.
    pub fn partial_entries(&self) -> impl Iterator<Item = PartialEntry> + '_ {
        self.entries.iter().filter_map(|entry| match entry {
            PlanEntry::Copy { source, dest }
                if source.is_none() || dest.is_none() =>
            {
                Some(PartialEntry {
                    source: source.clone(),
                    dest: dest.clone(),
                })
            }
            _ => None,
        })
    }

    /// `Ignore` entries carrying a `Source` side.
    pub fn ignore_source_entries(&self) -> impl Iterator<Item = &RelativePath> {
        self.entries.iter().filter_map(|entry| match entry {
            PlanEntry::Ignore {
                source: Some(source),
                ..
            } => Some(source),
            _ => None,
        })
    }

    /// `Ignore` entries carrying a `Destination` side.
    pub fn ignore_dest_entries(&self) -> impl Iterator<Item = &RelativePath> {
        self.entries.iter().filter_map(|entry| match entry {
            PlanEntry::Ignore {
                dest: Some(dest), ..
            } => Some(dest),
            _ => None,
        })
    }
}
