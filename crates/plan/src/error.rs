//! Fatal plan load/store failures.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or writing a plan document.
///
/// Every variant is fatal to the operation that triggered it: a plan that
/// fails to load produces no output, matching the policy that a broken input
/// must never be silently rewritten.
#[derive(Debug, Error)]
pub enum PlanError {
    /// The plan file does not exist.
    #[error("plan file not found: {path}")]
    InputNotFound {
        /// Path that was requested.
        path: PathBuf,
    },
    /// The document has no `CodeSync` root element.
    #[error("not a CodeSync plan: missing the CodeSync root element")]
    MissingRoot,
    /// The document lacks a required directory element.
    #[error("plan is missing the {element} element")]
    MissingDirectory {
        /// Name of the absent element.
        element: &'static str,
    },
    /// The XML itself could not be parsed or written.
    #[error("malformed plan XML: {0}")]
    Xml(#[from] quick_xml::Error),
    /// An underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
