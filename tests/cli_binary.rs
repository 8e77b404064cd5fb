//! Exercises the compiled `codesync` binary end to end.

mod integration;

use std::fs;

use codesync_plan::reader;
use integration::helpers::{codesync, stderr_of, stdout_of, Repos};

#[test]
fn analyze_writes_plan_to_stdout_by_default() {
    let repos = Repos::new();
    repos.source_file("a.txt", "a\n");
    repos.dest_file("a.txt", "a\n");

    let output = codesync(&[
        "analyze",
        repos.source.path().to_str().expect("utf8"),
        repos.dest.path().to_str().expect("utf8"),
    ])
    .expect("run binary");
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));

    let plan = reader::parse(&stdout_of(&output)).expect("parse stdout plan");
    assert_eq!(plan.files_to_copy().count(), 1);
    // The summary goes to stderr so the plan stream stays clean.
    assert!(stderr_of(&output).contains("matched files: 1"));
}

#[test]
fn full_cycle_analyze_update_verify_sync() {
    let repos = Repos::new();
    repos.source_file("kept/data.txt", "payload\n");
    repos.source_file("renamed/notes.md", "body\n");
    repos.dest_file("kept/data.txt", "stale\n");
    repos.dest_file("moved/jottings.md", "body\n");
    let plan = repos.plan_path("plan.xml");
    let plan_str = plan.to_str().expect("utf8");

    let analyzed = codesync(&[
        "analyze",
        repos.source.path().to_str().expect("utf8"),
        repos.dest.path().to_str().expect("utf8"),
        "--hash",
        "--output",
        plan_str,
    ])
    .expect("analyze");
    assert!(analyzed.status.success(), "stderr: {}", stderr_of(&analyzed));

    let updated_plan = repos.plan_path("updated.xml");
    let updated = codesync(&[
        "update",
        plan_str,
        "--hash",
        "--output",
        updated_plan.to_str().expect("utf8"),
    ])
    .expect("update");
    assert!(updated.status.success(), "stderr: {}", stderr_of(&updated));

    let verified = codesync(&["verify", plan_str, "--check-repeats", "--check-existing"])
        .expect("verify");
    assert!(verified.status.success(), "stderr: {}", stderr_of(&verified));

    let synced = codesync(&["sync", plan_str]).expect("sync");
    assert!(synced.status.success(), "stderr: {}", stderr_of(&synced));
    assert_eq!(
        fs::read(repos.dest.path().join("kept/data.txt")).expect("read"),
        b"payload\n"
    );
    // The hash match landed the renamed file onto its old destination.
    assert_eq!(
        fs::read(repos.dest.path().join("moved/jottings.md")).expect("read"),
        b"body\n"
    );
}

#[test]
fn sync_reports_errors_with_nonzero_exit() {
    let repos = Repos::new();
    let plan = repos.plan_path("plan.xml");
    fs::write(
        &plan,
        format!(
            "<CodeSync><SourceDirectory>{}</SourceDirectory><DestDirectory>{}</DestDirectory>\
             <Copy><Source>missing.txt</Source><Destination>missing.txt</Destination></Copy>\
             </CodeSync>",
            repos.source.path().display(),
            repos.dest.path().display(),
        ),
    )
    .expect("write plan");

    let output = codesync(&["sync", plan.to_str().expect("utf8")]).expect("sync");
    assert!(!output.status.success());
    assert!(stdout_of(&output).contains("errors: 1"));
}

#[test]
fn dry_run_leaves_the_destination_untouched() {
    let repos = Repos::new();
    repos.source_file("a.txt", "fresh\n");
    repos.dest_file("a.txt", "stale\n");
    let plan = repos.plan_path("plan.xml");

    let analyzed = codesync(&[
        "analyze",
        repos.source.path().to_str().expect("utf8"),
        repos.dest.path().to_str().expect("utf8"),
        "--output",
        plan.to_str().expect("utf8"),
    ])
    .expect("analyze");
    assert!(analyzed.status.success());

    let synced = codesync(&["sync", plan.to_str().expect("utf8"), "--dry-run"]).expect("sync");
    assert!(synced.status.success());
    assert_eq!(
        fs::read(repos.dest.path().join("a.txt")).expect("read"),
        b"stale\n"
    );
}

#[test]
fn invalid_plan_is_a_fatal_error() {
    let repos = Repos::new();
    let plan = repos.plan_path("broken.xml");
    fs::write(&plan, "<NotAPlan/>").expect("write");

    let output = codesync(&["verify", plan.to_str().expect("utf8")]).expect("verify");
    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("CodeSync root"));
}
