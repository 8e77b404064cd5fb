#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `codesync_engine` is the heart of CodeSync: the stateful multi-stage
//! matcher that reconciles a source tree against a destination tree, plus the
//! three operations built around it. [`analyze`](analyze::analyze) runs the
//! matcher over two freshly enumerated trees. [`update`](update::update)
//! replays a previous plan against the current filesystem and drives the
//! matcher over the residual. [`verify`](verify::verify) lints a plan without
//! touching the filesystem layout, and [`sync`](sync::execute) applies a
//! validated plan.
//!
//! # Design
//!
//! - [`DestinationIndex`] maps bare filenames to one-or-many candidate paths
//!   and maintains a running candidate count. The matcher exclusively owns it
//!   for the duration of a run; every match consumes candidates from it.
//! - [`Matcher`] drains the source queue front to back. Decisions are strictly
//!   sequential: a candidate consumed by an earlier source is invisible to
//!   every later source.
//! - [`HashIndex`] is allocated lazily the first time the cross-orphan
//!   content pass runs, and lives for a single run.
//! - All counters live on the matcher and are surfaced as [`MatchStats`];
//!   each emission bumps exactly one primary counter, with hash matches
//!   additionally counted in `matched_by_hash`.
//!
//! # Invariants
//!
//! - At every quiescent point, the destination index's count equals the sum
//!   of candidates across entries.
//! - A destination consumed by a match never reappears in a later section.
//! - Every source lands in exactly one of: match, one-left, ambiguous,
//!   source orphan.
//!
//! # Errors
//!
//! Operation-level failures (missing roots, unreadable plans) surface as
//! [`EngineError`] and abort without output. Per-file I/O problems during
//! hashing or copying degrade only the file involved; the engine logs them
//! through `tracing` and carries on.

pub mod analyze;
mod dest_index;
mod error;
mod hash_index;
mod matcher;
mod rank;
mod stats;
pub mod sync;
pub mod update;
pub mod verify;

pub use dest_index::{DestEntry, DestinationIndex};
pub use error::{EngineError, EngineResult};
pub use hash_index::{HashIndex, HashRecord};
pub use matcher::{AmbiguousSource, Match, MatchOptions, MatchOutcome, Matcher};
pub use stats::{MatchStats, SyncStats};
