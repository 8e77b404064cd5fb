//! Command-line definition.

use std::path::PathBuf;

use clap::{value_parser, Arg, ArgAction, Command};

pub(crate) fn build() -> Command {
    Command::new("codesync")
        .about("Reconcile two file trees through a hand-editable synchronization plan")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .global(true)
                .help("Increase diagnostic verbosity (repeatable)"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue)
                .global(true)
                .conflicts_with("verbose")
                .help("Only report errors"),
        )
        .arg(
            Arg::new("exclude-dir")
                .long("exclude-dir")
                .value_name("NAME")
                .action(ArgAction::Append)
                .global(true)
                .help("Additional directory name to skip during enumeration"),
        )
        .subcommand(analyze_command())
        .subcommand(update_command())
        .subcommand(verify_command())
        .subcommand(sync_command())
}

fn analyze_command() -> Command {
    Command::new("analyze")
        .about("Match two trees and produce a synchronization plan")
        .arg(
            Arg::new("source")
                .value_name("SOURCE")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("Source repository root"),
        )
        .arg(
            Arg::new("dest")
                .value_name("DEST")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("Destination repository root"),
        )
        .arg(output_arg())
        .arg(hash_arg())
}

fn update_command() -> Command {
    Command::new("update")
        .about("Validate a previous plan and rematch the residual paths")
        .arg(plan_arg())
        .arg(output_arg())
        .arg(hash_arg())
        .arg(
            Arg::new("discard-older")
                .long("discard-older")
                .action(ArgAction::SetTrue)
                .help("Drop carried-forward matches whose source is not newer than the plan timestamp"),
        )
}

fn verify_command() -> Command {
    Command::new("verify")
        .about("Lint a plan and optionally write a reorganized copy")
        .arg(plan_arg())
        .arg(output_arg())
        .arg(
            Arg::new("check-repeats")
                .long("check-repeats")
                .action(ArgAction::SetTrue)
                .help("Drop duplicated copy entries"),
        )
        .arg(
            Arg::new("check-existing")
                .long("check-existing")
                .action(ArgAction::SetTrue)
                .conflicts_with_all(["check-existing-copy", "check-existing-ignore"])
                .help("Drop copy and ignore entries whose files are missing"),
        )
        .arg(
            Arg::new("check-existing-copy")
                .long("check-existing-copy")
                .action(ArgAction::SetTrue)
                .help("Drop copy entries whose files are missing"),
        )
        .arg(
            Arg::new("check-existing-ignore")
                .long("check-existing-ignore")
                .action(ArgAction::SetTrue)
                .conflicts_with("check-existing-copy")
                .help("Drop ignore entries whose files are missing"),
        )
}

fn sync_command() -> Command {
    Command::new("sync")
        .about("Apply a plan to the filesystem")
        .arg(plan_arg())
        .arg(
            Arg::new("dry-run")
                .short('n')
                .long("dry-run")
                .action(ArgAction::SetTrue)
                .help("Report what would be copied without writing anything"),
        )
        .arg(
            Arg::new("if-newer")
                .long("if-newer")
                .action(ArgAction::SetTrue)
                .help("Skip sources older than the plan timestamp or the destination file"),
        )
}

fn plan_arg() -> Arg {
    Arg::new("plan")
        .value_name("PLAN")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Path to the plan file")
}

fn output_arg() -> Arg {
    Arg::new("output")
        .long("output")
        .value_name("PATH")
        .value_parser(value_parser!(PathBuf))
        .help("Write the plan to PATH instead of standard output")
}

fn hash_arg() -> Arg {
    Arg::new("hash")
        .long("hash")
        .action(ArgAction::SetTrue)
        .help("Escalate to content hashing when names disagree or stay ambiguous")
}
