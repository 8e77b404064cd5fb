#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `codesync_core` holds the data model shared by every crate in the CodeSync
//! workspace: repository-relative paths with the comparison semantics the
//! matcher relies on, and the copy/partial/ignore entry types that flow
//! between the matcher, the plan store, the updater, and the verifier.
//!
//! # Design
//!
//! - [`RelativePath`] is a newtype over the textual path as the walker
//!   produced it. Equality and hashing are case-insensitive and
//!   separator-insensitive over the component sequence, so `a/B.txt` recorded
//!   on one platform compares equal to `A\b.txt` recorded on another.
//! - [`CopyEntry`], [`PartialEntry`], and [`IgnoreEntry`] model the three
//!   entry shapes a synchronization plan can carry. They are plain data;
//!   classification logic lives in the engine and plan crates.
//!
//! # Invariants
//!
//! - A [`RelativePath`] preserves the text it was constructed from; folding
//!   happens only during comparison, never in storage, so hand-edited plans
//!   round-trip byte for byte.
//! - `Eq` and `Hash` agree: two paths that compare equal hash identically.
//!
//! # Examples
//!
//! ```
//! use codesync_core::RelativePath;
//!
//! let stored = RelativePath::new("src/ui/Button.cs");
//! let edited = RelativePath::new("SRC\\UI\\button.cs");
//! assert_eq!(stored, edited);
//! assert_eq!(stored.file_name(), "Button.cs");
//! ```

mod entry;
mod relpath;

pub use entry::{CopyEntry, IgnoreEntry, PartialEntry};
pub use relpath::RelativePath;
