#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `codesync_plan` reads and writes the synchronization plan: a single XML
//! document listing the source and destination directories, an optional
//! generation timestamp, and a sequence of `Copy` and `Ignore` entries
//! interspersed with descriptive comments. Plans are hand-edited between an
//! analyze run and a sync run, so the on-disk shape is an observable
//! contract: two-space indentation, a constant newline choice, and section
//! headers rendered as block comments with a blank line before and after.
//!
//! # Design
//!
//! - [`Plan`] is the in-memory document: directories, timestamp, and an
//!   ordered entry list. Four lazy views classify entries the way the
//!   engine consumes them.
//! - [`reader::load`] and [`reader::parse`] build a [`Plan`] from XML via a
//!   `quick-xml` event stream. Comments are skipped on read; the candidate
//!   hints the matcher writes into ambiguous entries are informational only.
//! - [`PlanWriter`] emits the document through explicit write events,
//!   intermixing raw newline text with structured element writes so the
//!   visual spacing around section headers is produced deterministically
//!   rather than left to a pretty-printer.
//!
//! # Errors
//!
//! [`PlanError`] covers the fatal load failures: a missing file, a document
//! without the `CodeSync` root, a document missing either directory element,
//! malformed XML, and I/O failures. Loading never produces a partial plan.
//!
//! # Examples
//!
//! ```
//! use codesync_plan::{reader, sections, PlanWriter};
//! use codesync_core::CopyEntry;
//!
//! let mut writer = PlanWriter::new(Vec::new());
//! writer.begin("/src", "/dst", None).unwrap();
//! writer.section(sections::CURRENT_MATCHES).unwrap();
//! writer.copy(&CopyEntry::new("a.txt".into(), "b/a.txt".into())).unwrap();
//! let xml = String::from_utf8(writer.finish().unwrap()).unwrap();
//!
//! let plan = reader::parse(&xml).unwrap();
//! assert_eq!(plan.files_to_copy().count(), 1);
//! ```

mod document;
mod error;
pub mod reader;
pub mod sections;
mod writer;

pub use document::{Plan, PlanEntry};
pub use error::PlanError;
pub use writer::PlanWriter;
