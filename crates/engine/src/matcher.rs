//! The multi-stage matching engine.

use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::Path;

use codesync_checksums::{fingerprint_file, Fingerprint};
use codesync_core::{CopyEntry, RelativePath};
use codesync_plan::{sections, PlanError, PlanWriter};
use tracing::{debug, warn};

use crate::dest_index::{DestEntry, DestinationIndex};
use crate::hash_index::HashIndex;
use crate::rank::rank_candidates;
use crate::stats::MatchStats;

/// Behaviour switches for a matcher run.
#[derive(Clone, Copy, Debug, Default)]
pub struct MatchOptions {
    /// Escalate to content hashing when names disagree or stay ambiguous.
    pub use_hash: bool,
}

/// A resolved source/destination pairing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Match {
    /// Source path.
    pub source: RelativePath,
    /// Destination path consumed by this match.
    pub dest: RelativePath,
    /// Whether the pairing was decided by content hash.
    pub by_hash: bool,
}

/// A source left unresolved among several candidates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AmbiguousSource {
    /// The unresolved source.
    pub source: RelativePath,
    /// The candidates it could pair with, in index order.
    pub candidates: Vec<RelativePath>,
}

/// Everything a matcher run produced, in emission order.
#[derive(Debug, Default)]
pub struct MatchOutcome {
    /// Confident matches.
    pub matches: Vec<Match>,
    /// Potentially incorrect single-survivor pairings.
    pub one_left: Vec<Match>,
    /// Sources that stayed ambiguous.
    pub ambiguous: Vec<AmbiguousSource>,
    /// Sources with no counterpart.
    pub source_orphans: Vec<RelativePath>,
    /// Destinations with no counterpart.
    pub dest_orphans: Vec<RelativePath>,
    /// Run counters.
    pub stats: MatchStats,
}

impl MatchOutcome {
    /// Writes the run's sections to a plan in the canonical order: matches,
    /// one-left, ambiguous, source orphans, then destination orphans as
    /// comments. Empty sections are omitted, header and all.
    pub fn write_sections<W: Write>(&self, writer: &mut PlanWriter<W>) -> Result<(), PlanError> {
        if !self.matches.is_empty() {
            writer.section(sections::CURRENT_MATCHES)?;
            for m in &self.matches {
                writer.copy(&CopyEntry::new(m.source.clone(), m.dest.clone()))?;
            }
        }
        if !self.one_left.is_empty() {
            writer.section(sections::ONE_LEFT)?;
            for m in &self.one_left {
                writer.copy(&CopyEntry::new(m.source.clone(), m.dest.clone()))?;
            }
        }
        if !self.ambiguous.is_empty() {
            writer.section(sections::AMBIGUOUS)?;
            for entry in &self.ambiguous {
                writer.ambiguous(&entry.source, &entry.candidates)?;
            }
        }
        if !self.source_orphans.is_empty() {
            writer.section(sections::SOURCE_ORPHANS)?;
            for orphan in &self.source_orphans {
                writer.ignore_source(orphan)?;
            }
        }
        if !self.dest_orphans.is_empty() {
            writer.section(sections::DEST_ORPHANS)?;
            for orphan in &self.dest_orphans {
                writer.orphan_dest(orphan)?;
            }
        }
        Ok(())
    }
}

enum Step {
    Orphan,
    Unique(RelativePath),
    Several(Vec<RelativePath>),
}

/// The stateful resolver.
///
/// A matcher exclusively owns its destination index and source queue for the
/// duration of [`run`](Self::run); decisions are strictly sequential, so a
/// candidate consumed by an earlier source is invisible to later ones.
pub struct Matcher<'a> {
    source_root: &'a Path,
    dest_root: &'a Path,
    options: MatchOptions,
    index: DestinationIndex,
    reserved: HashSet<RelativePath>,
    matches: Vec<Match>,
    pending: Vec<RelativePath>,
    orphans: Vec<RelativePath>,
    stats: MatchStats,
}

impl<'a> Matcher<'a> {
    /// Creates a matcher over a destination index.
    ///
    /// The roots are only touched when `options.use_hash` is set; a pure
    /// name/path run never opens a file.
    pub fn new(
        source_root: &'a Path,
        dest_root: &'a Path,
        index: DestinationIndex,
        options: MatchOptions,
    ) -> Self {
        Self {
            source_root,
            dest_root,
            options,
            index,
            reserved: HashSet::new(),
            matches: Vec::new(),
            pending: Vec::new(),
            orphans: Vec::new(),
            stats: MatchStats::default(),
        }
    }

    /// Marks a destination as claimed by a previous run. Reserved paths stay
    /// in the index so ambiguity reflects the full shape of the tree, but
    /// they are never reported as destination orphans and the cross-orphan
    /// pass does not offer them up.
    pub fn reserve(&mut self, path: RelativePath) {
        self.reserved.insert(path);
    }

    /// Drains the source queue and produces the complete outcome.
    pub fn run<I: IntoIterator<Item = RelativePath>>(mut self, sources: I) -> MatchOutcome {
        for source in sources {
            self.resolve(source);
        }
        let (one_left, ambiguous) = self.partition_pending();
        self.cross_orphan_pass();

        let dest_orphans: Vec<RelativePath> = self
            .index
            .remaining()
            .filter(|path| !self.reserved.contains(path))
            .cloned()
            .collect();
        self.stats.dest_not_in_source = dest_orphans.len() as u64;

        MatchOutcome {
            matches: self.matches,
            one_left,
            ambiguous,
            source_orphans: self.orphans,
            dest_orphans,
            stats: self.stats,
        }
    }

    fn resolve(&mut self, source: RelativePath) {
        let name = source.file_name().to_string();
        let step = match self.index.get(&name) {
            None => Step::Orphan,
            Some(DestEntry::Single(dest)) => Step::Unique(dest.clone()),
            Some(DestEntry::Multi(candidates)) => Step::Several(candidates.clone()),
        };

        match step {
            Step::Orphan => {
                debug!(source = %source, "no destination candidate");
                self.stats.source_not_in_dest += 1;
                self.orphans.push(source);
            }
            Step::Unique(dest) => {
                self.index.remove_entry(&name);
                // A relocated file (same name, different directory) counts as
                // a hash match when content verification is on and agrees;
                // the pairing itself never depends on it.
                let by_hash =
                    self.options.use_hash && dest != source && self.contents_equal(&source, &dest);
                self.emit(source, dest, by_hash);
            }
            Step::Several(candidates) => {
                // An exact path match wins unconditionally; the hash pass is
                // never entered when one exists.
                if let Some(exact) = candidates.iter().find(|c| **c == source).cloned() {
                    self.index.remove_candidate(&name, &exact);
                    self.emit(source, exact, false);
                    return;
                }

                let ranked = rank_candidates(&source, &candidates);
                let hash_matched =
                    self.options.use_hash && self.hash_pass(&source, &name, &ranked);
                if !hash_matched && self.index.get(&name).is_some() {
                    self.pending.push(source);
                }
            }
        }
    }

    /// Length-gated content comparison used to flag relocations.
    fn contents_equal(&self, source: &RelativePath, dest: &RelativePath) -> bool {
        let source_path = source.resolve(self.source_root);
        let dest_path = dest.resolve(self.dest_root);
        let lengths = fs::metadata(&source_path)
            .and_then(|s| fs::metadata(&dest_path).map(|d| (s.len(), d.len())));
        match lengths {
            Ok((source_len, dest_len)) if source_len == dest_len => {}
            _ => return false,
        }
        match (fingerprint_file(&source_path), fingerprint_file(&dest_path)) {
            (Ok(a), Ok(b)) => a.crc == b.crc,
            _ => false,
        }
    }

    /// Walks the ranked candidates looking for a content match. At most one
    /// candidate is consumed; the pass stops at the first hash equality.
    fn hash_pass(&mut self, source: &RelativePath, name: &str, ranked: &[RelativePath]) -> bool {
        let source_path = source.resolve(self.source_root);
        let source_len = match fs::metadata(&source_path) {
            Ok(metadata) => metadata.len(),
            Err(error) => {
                warn!(source = %source, %error, "cannot stat source, skipping hash pass");
                return false;
            }
        };

        let mut source_print: Option<Fingerprint> = None;
        for candidate in ranked {
            let candidate_path = candidate.resolve(self.dest_root);
            let candidate_len = match fs::metadata(&candidate_path) {
                Ok(metadata) => metadata.len(),
                Err(error) => {
                    warn!(candidate = %candidate, %error, "cannot stat candidate, leaving it unconsumed");
                    continue;
                }
            };
            if candidate_len != source_len {
                continue;
            }

            let source_crc = match source_print {
                Some(print) => print.crc,
                None => match fingerprint_file(&source_path) {
                    Ok(print) => {
                        source_print = Some(print);
                        print.crc
                    }
                    Err(error) => {
                        warn!(source = %source, %error, "cannot hash source, skipping hash pass");
                        return false;
                    }
                },
            };
            let candidate_print = match fingerprint_file(&candidate_path) {
                Ok(print) => print,
                Err(error) => {
                    warn!(candidate = %candidate, %error, "cannot hash candidate, leaving it unconsumed");
                    continue;
                }
            };

            if candidate_print.crc == source_crc {
                self.index.remove_candidate(name, candidate);
                self.emit(source.clone(), candidate.clone(), true);
                return true;
            }
        }
        false
    }

    /// Partitions the ambiguous list in a single pass against the live
    /// index. The first pending source claims its entry; a later source
    /// sharing the basename finds the key gone and degrades to an orphan,
    /// the same as one whose candidates were all consumed by hash matches.
    fn partition_pending(&mut self) -> (Vec<Match>, Vec<AmbiguousSource>) {
        let pending = std::mem::take(&mut self.pending);
        let mut one_left = Vec::new();
        let mut ambiguous = Vec::new();

        for source in pending {
            let name = source.file_name().to_string();
            let remaining = self
                .index
                .get(&name)
                .map(|entry| entry.candidates().to_vec());
            match remaining {
                None => {
                    self.stats.source_not_in_dest += 1;
                    self.orphans.push(source);
                }
                Some(mut candidates) if candidates.len() == 1 => {
                    self.index.remove_entry(&name);
                    self.stats.source_one_left += 1;
                    one_left.push(Match {
                        source,
                        dest: candidates.remove(0),
                        by_hash: false,
                    });
                }
                Some(candidates) => {
                    self.index.remove_entry(&name);
                    self.stats.source_multi_in_dest += 1;
                    ambiguous.push(AmbiguousSource { source, candidates });
                }
            }
        }
        (one_left, ambiguous)
    }

    /// Pairs source orphans with destination orphans by content. The hash
    /// index is allocated here, on first use, and dropped with the pass.
    fn cross_orphan_pass(&mut self) {
        if !self.options.use_hash || self.orphans.is_empty() {
            return;
        }
        let remaining: Vec<RelativePath> = self
            .index
            .remaining()
            .filter(|path| !self.reserved.contains(path))
            .cloned()
            .collect();
        if remaining.is_empty() {
            return;
        }

        let mut hash_index = HashIndex::new();
        let mut orphan_hashes: Vec<(RelativePath, Option<u32>)> = Vec::new();
        for orphan in std::mem::take(&mut self.orphans) {
            match fingerprint_file(&orphan.resolve(self.source_root)) {
                Ok(print) => {
                    hash_index.insert(print.crc, orphan.clone(), print.length);
                    orphan_hashes.push((orphan, Some(print.crc)));
                }
                Err(error) => {
                    warn!(source = %orphan, %error, "cannot hash orphan, leaving it unmatched");
                    orphan_hashes.push((orphan, None));
                }
            }
        }

        for dest in remaining {
            let print = match fingerprint_file(&dest.resolve(self.dest_root)) {
                Ok(print) => print,
                Err(error) => {
                    warn!(dest = %dest, %error, "cannot hash destination, leaving it unconsumed");
                    continue;
                }
            };
            if let Some(source) = hash_index.claim(print.crc, print.length) {
                let name = dest.file_name().to_string();
                self.index.remove_candidate(&name, &dest);
                self.stats.source_not_in_dest -= 1;
                self.emit(source, dest, true);
            }
        }

        // What survives is exactly the records never claimed, plus the
        // orphans that could not be hashed.
        self.orphans = orphan_hashes
            .into_iter()
            .filter_map(|(orphan, hash)| match hash {
                Some(hash) if hash_index.is_matched(hash, &orphan) => None,
                _ => Some(orphan),
            })
            .collect();
    }

    fn emit(&mut self, source: RelativePath, dest: RelativePath, by_hash: bool) {
        self.stats.matched += 1;
        if by_hash {
            self.stats.matched_by_hash += 1;
        }
        self.matches.push(Match {
            source,
            dest,
            by_hash,
        });
    }
}
