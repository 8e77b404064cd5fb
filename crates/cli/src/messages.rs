//! User-facing message catalog.
//!
//! Every string a person reads on the console is built here, so the wording
//! can be swapped wholesale (translations included) without touching the
//! dispatch logic. Error classification stays language-independent in the
//! engine; only the rendering lives in this module.

use std::path::Path;

use codesync_engine::verify::VerifyReport;
use codesync_engine::{MatchStats, SyncStats};

pub(crate) fn fatal(error: &dyn std::error::Error) -> String {
    format!("codesync: {error}")
}

pub(crate) fn plan_written(path: &Path) -> String {
    format!("plan written to {}", path.display())
}

pub(crate) fn match_summary(stats: &MatchStats) -> String {
    stats.to_string()
}

pub(crate) fn update_summary(carried: usize, degraded: usize, discarded: u64) -> String {
    format!(
        "carried forward: {carried}, degraded to partial: {degraded}, discarded as already synchronized: {discarded}"
    )
}

pub(crate) fn verify_summary(report: &VerifyReport) -> String {
    if report.issues() == 0 {
        return "plan is clean".to_string();
    }
    format!(
        "findings: {} duplicate copies, {} copies reclassified as ignored, {} copies with missing files, {} duplicate ignores, {} ignores with missing files, {} malformed entries",
        report.duplicate_copies,
        report.reclassified,
        report.missing_copies,
        report.duplicate_ignores,
        report.missing_ignores,
        report.malformed,
    )
}

pub(crate) fn sync_summary(stats: &SyncStats) -> String {
    stats.to_string()
}
