//! Shared helpers for workspace-level integration tests.

#![allow(dead_code)] // Each test binary uses its own subset.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// A pair of repository roots plus a scratch directory for plan files.
pub struct Repos {
    pub source: TempDir,
    pub dest: TempDir,
    pub scratch: TempDir,
}

impl Repos {
    pub fn new() -> Self {
        Self {
            source: TempDir::new().expect("source tempdir"),
            dest: TempDir::new().expect("dest tempdir"),
            scratch: TempDir::new().expect("scratch tempdir"),
        }
    }

    pub fn source_file(&self, rel: &str, contents: &str) {
        write_file(self.source.path(), rel, contents);
    }

    pub fn dest_file(&self, rel: &str, contents: &str) {
        write_file(self.dest.path(), rel, contents);
    }

    pub fn plan_path(&self, name: &str) -> PathBuf {
        self.scratch.path().join(name)
    }
}

pub fn write_file(root: &Path, rel: &str, contents: &str) {
    let full = root.join(rel);
    if let Some(parent) = full.parent() {
        fs::create_dir_all(parent).expect("create parent");
    }
    fs::write(full, contents).expect("write file");
}

/// Runs the compiled `codesync` binary with the given arguments.
pub fn codesync(args: &[&str]) -> io::Result<Output> {
    Command::new(env!("CARGO_BIN_EXE_codesync")).args(args).output()
}

pub fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
