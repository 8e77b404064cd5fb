//! Counters accumulated by the matcher and the copy executor.

use std::fmt;

/// Counts maintained across a matcher run.
///
/// Every emission updates exactly one primary counter; hash matches
/// additionally increment `matched_by_hash`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MatchStats {
    /// Sources paired with a destination.
    pub matched: u64,
    /// Subset of `matched` decided by content hash rather than filename.
    pub matched_by_hash: u64,
    /// Sources with no counterpart (source orphans).
    pub source_not_in_dest: u64,
    /// Sources left ambiguous among several candidates.
    pub source_multi_in_dest: u64,
    /// Sources reported with a single surviving candidate.
    pub source_one_left: u64,
    /// Destinations with no counterpart (destination orphans).
    pub dest_not_in_source: u64,
}

impl fmt::Display for MatchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "matched files: {} ({} by content hash)",
            self.matched, self.matched_by_hash
        )?;
        writeln!(f, "sources without counterpart: {}", self.source_not_in_dest)?;
        writeln!(f, "ambiguous sources: {}", self.source_multi_in_dest)?;
        writeln!(f, "single-candidate guesses: {}", self.source_one_left)?;
        write!(f, "destination orphans: {}", self.dest_not_in_source)
    }
}

/// Counts maintained while applying a plan.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SyncStats {
    /// Files copied (or that would be copied under dry-run).
    pub copied: u64,
    /// Files skipped by a freshness gate.
    pub ignored: u64,
    /// Files whose copy failed.
    pub errors: u64,
}

impl fmt::Display for SyncStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "copied: {}, skipped: {}, errors: {}",
            self.copied, self.ignored, self.errors
        )
    }
}
