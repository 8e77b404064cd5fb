#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! Thin command-line frontend for the `codesync` binary.
//!
//! The crate exposes [`run`] as the single entry point so the binary stays a
//! one-liner and integration tests can drive the full surface in-process.
//! Argument parsing lives in the internal `command` module; all user-facing
//! wording lives in `messages`.

use std::ffi::OsString;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgMatches;
use codesync_engine::analyze::{analyze, write_analysis, AnalyzeOptions};
use codesync_engine::sync::{execute, SyncOptions};
use codesync_engine::update::{update, write_update, UpdateOptions};
use codesync_engine::verify::{verify, write_verified, VerifyOptions};
use codesync_plan::reader;
use codesync_walk::ExcludeSet;
use time::OffsetDateTime;
use tracing_subscriber::EnvFilter;

mod command;
mod messages;

const STATUS_OK: u8 = 0;
const STATUS_FAILURE: u8 = 1;
const STATUS_USAGE: u8 = 2;

/// Parses arguments, dispatches the subcommand, and maps the result to an
/// exit code: 0 on success, 1 on fatal errors or copy failures, 2 on usage
/// errors.
pub fn run<I, T>(args: I) -> ExitCode
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    ExitCode::from(dispatch(args))
}

fn dispatch<I, T>(args: I) -> u8
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = match command::build().try_get_matches_from(args) {
        Ok(matches) => matches,
        Err(error) => {
            let is_help = matches!(
                error.kind(),
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion
            );
            let _ = error.print();
            return if is_help { STATUS_OK } else { STATUS_USAGE };
        }
    };

    init_logging(&matches);
    let excludes = excludes_from(&matches);

    match matches.subcommand() {
        Some(("analyze", sub)) => run_analyze(sub, excludes),
        Some(("update", sub)) => run_update(sub, excludes),
        Some(("verify", sub)) => run_verify(sub),
        Some(("sync", sub)) => run_sync(sub),
        _ => STATUS_USAGE,
    }
}

fn init_logging(matches: &ArgMatches) {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => {
            let level = if matches.get_flag("quiet") {
                "error"
            } else {
                match matches.get_count("verbose") {
                    0 => "warn",
                    1 => "info",
                    2 => "debug",
                    _ => "trace",
                }
            };
            EnvFilter::new(level)
        }
    };
    // A second init in the same process (tests) is fine to ignore.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn excludes_from(matches: &ArgMatches) -> ExcludeSet {
    let mut excludes = ExcludeSet::default();
    if let Some(extra) = matches.get_many::<String>("exclude-dir") {
        excludes.extend(extra.map(String::as_str));
    }
    excludes
}

fn run_analyze(matches: &ArgMatches, excludes: ExcludeSet) -> u8 {
    let (Some(source), Some(dest)) = (
        matches.get_one::<PathBuf>("source"),
        matches.get_one::<PathBuf>("dest"),
    ) else {
        return STATUS_USAGE;
    };
    let options = AnalyzeOptions {
        use_hash: matches.get_flag("hash"),
        excludes,
    };

    let outcome = match analyze(source, dest, &options) {
        Ok(outcome) => outcome,
        Err(error) => return fatal(&error),
    };
    let stamp = OffsetDateTime::now_utc();
    let written = write_plan_output(matches, |out| {
        write_analysis(out, source, dest, &outcome, Some(stamp))
    });
    if let Err(error) = written {
        return fatal(&error);
    }
    report(matches, &messages::match_summary(&outcome.stats));
    STATUS_OK
}

fn run_update(matches: &ArgMatches, excludes: ExcludeSet) -> u8 {
    let Some(plan) = matches.get_one::<PathBuf>("plan") else {
        return STATUS_USAGE;
    };
    let options = UpdateOptions {
        use_hash: matches.get_flag("hash"),
        discard_older: matches.get_flag("discard-older"),
        excludes,
    };

    let outcome = match update(plan, &options) {
        Ok(outcome) => outcome,
        Err(error) => return fatal(&error),
    };
    let stamp = OffsetDateTime::now_utc();
    let written = write_plan_output(matches, |out| write_update(out, &outcome, Some(stamp)));
    if let Err(error) = written {
        return fatal(&error);
    }
    report(
        matches,
        &messages::update_summary(
            outcome.previous_matches.len(),
            outcome.previous_partials.len(),
            outcome.discarded,
        ),
    );
    report(matches, &messages::match_summary(&outcome.residual.stats));
    STATUS_OK
}

fn run_verify(matches: &ArgMatches) -> u8 {
    let Some(plan_path) = matches.get_one::<PathBuf>("plan") else {
        return STATUS_USAGE;
    };
    let check_both = matches.get_flag("check-existing");
    let options = VerifyOptions {
        check_repeats: matches.get_flag("check-repeats"),
        check_existing_copy: check_both || matches.get_flag("check-existing-copy"),
        check_existing_ignore: check_both || matches.get_flag("check-existing-ignore"),
    };

    let plan = match reader::load(plan_path) {
        Ok(plan) => plan,
        Err(error) => return fatal(&error),
    };
    let findings = verify(&plan, &options);
    if matches.contains_id("output") {
        let written = write_plan_output(matches, |out| write_verified(out, &plan, &findings));
        if let Err(error) = written {
            return fatal(&error);
        }
    }
    report(matches, &messages::verify_summary(&findings));
    STATUS_OK
}

fn run_sync(matches: &ArgMatches) -> u8 {
    let Some(plan_path) = matches.get_one::<PathBuf>("plan") else {
        return STATUS_USAGE;
    };
    let options = SyncOptions {
        dry_run: matches.get_flag("dry-run"),
        if_newer: matches.get_flag("if-newer"),
    };

    let plan = match reader::load(plan_path) {
        Ok(plan) => plan,
        Err(error) => return fatal(&error),
    };
    let stats = execute(&plan, &options);
    println!("{}", messages::sync_summary(&stats));
    if stats.errors > 0 {
        STATUS_FAILURE
    } else {
        STATUS_OK
    }
}

/// Runs `write` against `--output PATH` when given, standard output
/// otherwise. The writer is closed on all paths before the summary prints.
fn write_plan_output<F>(matches: &ArgMatches, write: F) -> Result<(), codesync_plan::PlanError>
where
    F: FnOnce(Box<dyn Write>) -> Result<(), codesync_plan::PlanError>,
{
    match matches.get_one::<PathBuf>("output") {
        Some(path) => {
            let file = File::create(path)?;
            write(Box::new(BufWriter::new(file)))?;
            eprintln!("{}", messages::plan_written(path));
            Ok(())
        }
        None => write(Box::new(io::stdout().lock())),
    }
}

/// Prints a human summary without corrupting a plan streamed to stdout.
fn report(matches: &ArgMatches, text: &str) {
    if matches.contains_id("output") {
        println!("{text}");
    } else {
        eprintln!("{text}");
    }
}

fn fatal(error: &dyn std::error::Error) -> u8 {
    eprintln!("{}", messages::fatal(error));
    STATUS_FAILURE
}
