//! Fresh analysis of two repository trees.

use std::io::Write;
use std::path::Path;

use codesync_plan::{PlanError, PlanWriter};
use codesync_walk::{enumerate, ExcludeSet};
use time::OffsetDateTime;
use tracing::info;

use crate::dest_index::DestinationIndex;
use crate::error::{EngineError, EngineResult};
use crate::matcher::{MatchOptions, MatchOutcome, Matcher};

/// Options for an analyze run.
#[derive(Clone, Debug, Default)]
pub struct AnalyzeOptions {
    /// Escalate to content hashing.
    pub use_hash: bool,
    /// Directory names pruned during enumeration.
    pub excludes: ExcludeSet,
}

/// Enumerates both trees and runs the matcher over them.
///
/// The source enumeration becomes the queue, drained exactly once; the
/// destination enumeration becomes the index the matcher consumes.
pub fn analyze(
    source_root: &Path,
    dest_root: &Path,
    options: &AnalyzeOptions,
) -> EngineResult<MatchOutcome> {
    for root in [source_root, dest_root] {
        if !root.is_dir() {
            return Err(EngineError::InputNotFound {
                path: root.to_path_buf(),
            });
        }
    }

    let sources = enumerate(source_root, &options.excludes)?;
    let dests = enumerate(dest_root, &options.excludes)?;
    info!(
        sources = sources.len(),
        destinations = dests.len(),
        "enumerated repositories"
    );

    let index = DestinationIndex::from_paths(dests);
    let matcher = Matcher::new(
        source_root,
        dest_root,
        index,
        MatchOptions {
            use_hash: options.use_hash,
        },
    );
    Ok(matcher.run(sources))
}

/// Writes a complete analysis plan: directories, timestamp, then the
/// matcher's sections in canonical order.
pub fn write_analysis<W: Write>(
    out: W,
    source_root: &Path,
    dest_root: &Path,
    outcome: &MatchOutcome,
    generated_at: Option<OffsetDateTime>,
) -> Result<(), PlanError> {
    let mut writer = PlanWriter::new(out);
    writer.begin(
        &source_root.display().to_string(),
        &dest_root.display().to_string(),
        generated_at,
    )?;
    outcome.write_sections(&mut writer)?;
    writer.finish()?;
    Ok(())
}
