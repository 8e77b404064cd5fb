//! Apply a validated plan to the filesystem.

use std::fs;
use std::io;
use std::path::Path;
use std::time::{Duration, SystemTime};

use codesync_plan::Plan;
use filetime::FileTime;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::stats::SyncStats;

/// Options for applying a plan.
#[derive(Clone, Copy, Debug, Default)]
pub struct SyncOptions {
    /// Report what would happen without writing anything.
    pub dry_run: bool,
    /// Skip sources older than the plan's `ModifiedTime` (when present) or
    /// older than the destination file.
    pub if_newer: bool,
}

enum Disposition {
    Copied,
    Skipped,
}

/// Copies every complete `Copy` entry, combining the relative paths with the
/// plan's directories. Per-file failures are counted and reported; the
/// executor always runs to the end of the plan.
pub fn execute(plan: &Plan, options: &SyncOptions) -> SyncStats {
    let plan_time = plan.modified_time().map(to_system_time);
    let mut stats = SyncStats::default();

    for entry in plan.files_to_copy() {
        let source = entry.source.resolve(plan.source_dir());
        let dest = entry.dest.resolve(plan.dest_dir());
        match copy_one(&source, &dest, plan_time, options) {
            Ok(Disposition::Copied) => {
                debug!(source = %entry.source, dest = %entry.dest, "copied");
                stats.copied += 1;
            }
            Ok(Disposition::Skipped) => {
                debug!(source = %entry.source, "skipped, not newer");
                stats.ignored += 1;
            }
            Err(error) => {
                warn!(source = %entry.source, dest = %entry.dest, %error, "copy failed");
                stats.errors += 1;
            }
        }
    }

    info!(%stats, dry_run = options.dry_run, "plan applied");
    stats
}

fn copy_one(
    source: &Path,
    dest: &Path,
    plan_time: Option<SystemTime>,
    options: &SyncOptions,
) -> io::Result<Disposition> {
    let source_mtime = fs::metadata(source)?.modified()?;

    if options.if_newer {
        if let Some(stamp) = plan_time {
            if source_mtime < stamp {
                return Ok(Disposition::Skipped);
            }
        } else if let Ok(dest_mtime) = fs::metadata(dest).and_then(|m| m.modified()) {
            if source_mtime < dest_mtime {
                return Ok(Disposition::Skipped);
            }
        }
    }

    if options.dry_run {
        return Ok(Disposition::Copied);
    }

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(source, dest)?;
    // Contents first, then metadata.
    filetime::set_file_mtime(dest, FileTime::from_system_time(source_mtime))?;
    Ok(Disposition::Copied)
}

fn to_system_time(stamp: OffsetDateTime) -> SystemTime {
    let seconds = stamp.unix_timestamp();
    if seconds >= 0 {
        SystemTime::UNIX_EPOCH + Duration::from_secs(seconds as u64)
    } else {
        SystemTime::UNIX_EPOCH - Duration::from_secs(seconds.unsigned_abs())
    }
}
