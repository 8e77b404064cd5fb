//! Common error types for engine operations.

use std::io;
use std::path::PathBuf;

use codesync_plan::PlanError;
use codesync_walk::WalkError;
use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that abort an engine operation.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A repository root does not exist or is not a directory.
    #[error("directory not found: {path}")]
    InputNotFound {
        /// The missing path.
        path: PathBuf,
    },
    /// The plan could not be loaded or written.
    #[error(transparent)]
    Plan(#[from] PlanError),
    /// A repository enumeration could not start.
    #[error(transparent)]
    Walk(#[from] WalkError),
    /// An I/O failure outside the per-file degradation policy.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
