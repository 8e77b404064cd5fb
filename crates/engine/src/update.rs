//! Plan update: replay a previous plan against the current filesystem and
//! drive the matcher over the residual.

use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use codesync_core::{CopyEntry, PartialEntry, RelativePath};
use codesync_plan::{reader, sections, PlanError, PlanWriter};
use codesync_walk::{enumerate, ExcludeSet};
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::dest_index::DestinationIndex;
use crate::error::{EngineError, EngineResult};
use crate::matcher::{MatchOptions, MatchOutcome, Matcher};

/// Options for an update run.
#[derive(Clone, Debug, Default)]
pub struct UpdateOptions {
    /// Escalate to content hashing for the residual matcher run.
    pub use_hash: bool,
    /// Drop carried-forward matches whose source is not newer than the prior
    /// plan's `ModifiedTime`; the pair is treated as already synchronized.
    pub discard_older: bool,
    /// Directory names pruned during re-enumeration.
    pub excludes: ExcludeSet,
}

/// The validated carry-forward plus the residual matcher output.
#[derive(Debug)]
pub struct UpdateOutcome {
    /// Source root recorded in the prior plan.
    pub source_dir: PathBuf,
    /// Destination root recorded in the prior plan.
    pub dest_dir: PathBuf,
    /// Prior matches whose files both still exist.
    pub previous_matches: Vec<CopyEntry>,
    /// Prior entries degraded because a side vanished, plus entries that were
    /// already partial in the prior plan.
    pub previous_partials: Vec<PartialEntry>,
    /// Source-side ignores carried forward unconditionally.
    pub ignore_sources: Vec<RelativePath>,
    /// Destination-side ignores carried forward unconditionally.
    pub ignore_dests: Vec<RelativePath>,
    /// Matches dropped by the `discard_older` gate.
    pub discarded: u64,
    /// What the matcher made of the residual paths.
    pub residual: MatchOutcome,
}

/// Loads `plan_path`, validates it against the filesystem, re-enumerates both
/// roots, and runs the matcher on the residual.
pub fn update(plan_path: &Path, options: &UpdateOptions) -> EngineResult<UpdateOutcome> {
    let plan = reader::load(plan_path)?;
    let source_dir = plan.source_dir().to_path_buf();
    let dest_dir = plan.dest_dir().to_path_buf();
    for root in [&source_dir, &dest_dir] {
        if !root.is_dir() {
            return Err(EngineError::InputNotFound { path: root.clone() });
        }
    }
    let plan_time = plan.modified_time().map(to_system_time);

    let mut previous_matches: Vec<CopyEntry> = Vec::new();
    let mut previous_partials: Vec<PartialEntry> = Vec::new();
    let mut consumed_sources: HashSet<RelativePath> = HashSet::new();
    let mut reserved_dests: Vec<RelativePath> = Vec::new();
    let mut discarded = 0u64;

    for entry in plan.files_to_copy() {
        let source_path = entry.source.resolve(&source_dir);
        let dest_path = entry.dest.resolve(&dest_dir);
        let source_ok = source_path.is_file();
        let dest_ok = dest_path.is_file();
        if source_ok && dest_ok {
            consumed_sources.insert(entry.source.clone());
            reserved_dests.push(entry.dest.clone());
            if options.discard_older && is_not_newer(&source_path, plan_time) {
                discarded += 1;
                continue;
            }
            previous_matches.push(entry);
        } else {
            warn!(
                source = %entry.source,
                dest = %entry.dest,
                "previous match no longer valid, degrading to partial"
            );
            previous_partials.push(PartialEntry {
                source: source_ok.then(|| entry.source.clone()),
                dest: dest_ok.then(|| entry.dest.clone()),
            });
        }
    }
    previous_partials.extend(plan.partial_entries());

    let ignore_sources: Vec<RelativePath> = plan.ignore_source_entries().cloned().collect();
    let ignore_dests: Vec<RelativePath> = plan.ignore_dest_entries().cloned().collect();
    let ignored_sources: HashSet<RelativePath> = ignore_sources.iter().cloned().collect();
    let ignored_dests: HashSet<RelativePath> = ignore_dests.iter().cloned().collect();

    let residual_sources: Vec<RelativePath> = enumerate(&source_dir, &options.excludes)?
        .into_iter()
        .filter(|path| !consumed_sources.contains(path) && !ignored_sources.contains(path))
        .collect();
    // Previously matched destinations stay in the index so the matcher sees
    // the full shape of the tree; reserving them keeps them out of the
    // orphan section.
    let index = DestinationIndex::from_paths(
        enumerate(&dest_dir, &options.excludes)?
            .into_iter()
            .filter(|path| !ignored_dests.contains(path)),
    );
    info!(
        carried = previous_matches.len(),
        degraded = previous_partials.len(),
        residual = residual_sources.len(),
        "validated previous plan"
    );

    let mut matcher = Matcher::new(
        &source_dir,
        &dest_dir,
        index,
        MatchOptions {
            use_hash: options.use_hash,
        },
    );
    for dest in reserved_dests {
        matcher.reserve(dest);
    }
    let residual = matcher.run(residual_sources);

    Ok(UpdateOutcome {
        source_dir,
        dest_dir,
        previous_matches,
        previous_partials,
        ignore_sources,
        ignore_dests,
        discarded,
        residual,
    })
}

/// Writes the updated plan: carried-forward sections first, then the
/// residual matcher sections.
pub fn write_update<W: Write>(
    out: W,
    outcome: &UpdateOutcome,
    generated_at: Option<OffsetDateTime>,
) -> Result<(), PlanError> {
    let mut writer = PlanWriter::new(out);
    writer.begin(
        &outcome.source_dir.display().to_string(),
        &outcome.dest_dir.display().to_string(),
        generated_at,
    )?;
    if !outcome.previous_matches.is_empty() {
        writer.section(sections::PREVIOUS_MATCHES)?;
        for entry in &outcome.previous_matches {
            writer.copy(entry)?;
        }
    }
    if !outcome.previous_partials.is_empty() {
        writer.section(sections::PREVIOUS_PARTIALS)?;
        for entry in &outcome.previous_partials {
            writer.partial(entry)?;
        }
    }
    if !outcome.ignore_sources.is_empty() || !outcome.ignore_dests.is_empty() {
        writer.section(sections::PREVIOUS_IGNORES)?;
        for path in &outcome.ignore_sources {
            writer.ignore_source(path)?;
        }
        for path in &outcome.ignore_dests {
            writer.ignore_dest(path)?;
        }
    }
    outcome.residual.write_sections(&mut writer)?;
    writer.finish()?;
    Ok(())
}

fn to_system_time(stamp: OffsetDateTime) -> SystemTime {
    let seconds = stamp.unix_timestamp();
    if seconds >= 0 {
        SystemTime::UNIX_EPOCH + Duration::from_secs(seconds as u64)
    } else {
        SystemTime::UNIX_EPOCH - Duration::from_secs(seconds.unsigned_abs())
    }
}

fn is_not_newer(source_path: &Path, plan_time: Option<SystemTime>) -> bool {
    let Some(plan_time) = plan_time else {
        return false;
    };
    match fs::metadata(source_path).and_then(|m| m.modified()) {
        Ok(mtime) => mtime <= plan_time,
        Err(error) => {
            warn!(path = %source_path.display(), %error, "cannot read mtime, keeping entry");
            false
        }
    }
}
