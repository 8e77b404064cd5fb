use std::process::ExitCode;

fn main() -> ExitCode {
    codesync_cli::run(std::env::args_os())
}
