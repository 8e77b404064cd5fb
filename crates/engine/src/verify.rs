//! Non-destructive plan lint.

use std::io::Write;

use codesync_core::{CopyEntry, RelativePath};
use codesync_plan::{sections, Plan, PlanError, PlanWriter};
use tracing::warn;

/// Which checks the verifier applies.
#[derive(Clone, Copy, Debug, Default)]
pub struct VerifyOptions {
    /// Drop duplicated copy entries.
    pub check_repeats: bool,
    /// Drop copy entries whose files are missing.
    pub check_existing_copy: bool,
    /// Drop ignore entries whose files are missing.
    pub check_existing_ignore: bool,
}

/// What the verifier kept and what it dropped.
#[derive(Debug, Default)]
pub struct VerifyReport {
    /// Copy entries that passed every enabled check, in document order.
    pub copies: Vec<CopyEntry>,
    /// Source-side ignores, deduplicated.
    pub ignore_sources: Vec<RelativePath>,
    /// Destination-side ignores, deduplicated.
    pub ignore_dests: Vec<RelativePath>,
    /// Copies dropped as duplicates.
    pub duplicate_copies: u64,
    /// Copies dropped because an ignore entry claims one of their sides.
    pub reclassified: u64,
    /// Copies dropped because a side is missing on disk.
    pub missing_copies: u64,
    /// Ignores dropped as duplicates within their own set.
    pub duplicate_ignores: u64,
    /// Ignores dropped because their file is missing on disk.
    pub missing_ignores: u64,
    /// Partial copy entries reported and dropped.
    pub malformed: u64,
}

impl VerifyReport {
    /// Total number of findings.
    #[must_use]
    pub fn issues(&self) -> u64 {
        self.duplicate_copies
            + self.reclassified
            + self.missing_copies
            + self.duplicate_ignores
            + self.missing_ignores
            + self.malformed
    }
}

/// Lints `plan` without modifying anything on disk.
///
/// Ignore sets are cleaned first so the cross-conflict check for copy
/// entries runs against the deduplicated sets.
pub fn verify(plan: &Plan, options: &VerifyOptions) -> VerifyReport {
    let mut report = VerifyReport::default();

    for path in plan.ignore_source_entries() {
        if report.ignore_sources.contains(path) {
            report.duplicate_ignores += 1;
            continue;
        }
        if options.check_existing_ignore && !path.resolve(plan.source_dir()).is_file() {
            warn!(path = %path, "ignored source no longer exists, dropping entry");
            report.missing_ignores += 1;
            continue;
        }
        report.ignore_sources.push(path.clone());
    }
    for path in plan.ignore_dest_entries() {
        if report.ignore_dests.contains(path) {
            report.duplicate_ignores += 1;
            continue;
        }
        if options.check_existing_ignore && !path.resolve(plan.dest_dir()).is_file() {
            warn!(path = %path, "ignored destination no longer exists, dropping entry");
            report.missing_ignores += 1;
            continue;
        }
        report.ignore_dests.push(path.clone());
    }

    for entry in plan.files_to_copy() {
        if options.check_repeats && report.copies.contains(&entry) {
            warn!(source = %entry.source, "duplicate copy entry, dropping");
            report.duplicate_copies += 1;
            continue;
        }
        if report.ignore_sources.contains(&entry.source)
            || report.ignore_dests.contains(&entry.dest)
        {
            warn!(source = %entry.source, "copy conflicts with an ignore entry, keeping the ignore");
            report.reclassified += 1;
            continue;
        }
        if options.check_existing_copy
            && (!entry.source.resolve(plan.source_dir()).is_file()
                || !entry.dest.resolve(plan.dest_dir()).is_file())
        {
            warn!(source = %entry.source, dest = %entry.dest, "copy entry references a missing file, dropping");
            report.missing_copies += 1;
            continue;
        }
        report.copies.push(entry);
    }

    for partial in plan.partial_entries() {
        warn!(
            source = partial.source.as_ref().map(RelativePath::as_str),
            dest = partial.dest.as_ref().map(RelativePath::as_str),
            "malformed copy entry, dropping"
        );
        report.malformed += 1;
    }

    report
}

/// Writes the reorganized plan: copies sorted by source path, ignores sorted
/// lexicographically. Directories and timestamp are carried over unchanged.
pub fn write_verified<W: Write>(
    out: W,
    plan: &Plan,
    report: &VerifyReport,
) -> Result<(), PlanError> {
    let mut writer = PlanWriter::new(out);
    writer.begin(
        &plan.source_dir().display().to_string(),
        &plan.dest_dir().display().to_string(),
        plan.modified_time(),
    )?;

    if !report.copies.is_empty() {
        let mut copies = report.copies.clone();
        copies.sort_by(|a, b| a.source.cmp(&b.source));
        writer.section(sections::VERIFIED_COPIES)?;
        for entry in &copies {
            writer.copy(entry)?;
        }
    }
    if !report.ignore_sources.is_empty() || !report.ignore_dests.is_empty() {
        let mut sources = report.ignore_sources.clone();
        sources.sort();
        let mut dests = report.ignore_dests.clone();
        dests.sort();
        writer.section(sections::VERIFIED_IGNORES)?;
        for path in &sources {
            writer.ignore_source(path)?;
        }
        for path in &dests {
            writer.ignore_dest(path)?;
        }
    }
    writer.finish()?;
    Ok(())
}
