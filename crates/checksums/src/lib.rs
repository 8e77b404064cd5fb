#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `codesync_checksums` computes the content fingerprint the matcher uses to
//! decide that two files with different names carry the same bytes: the file
//! length paired with a CRC-32 over the full contents, streamed in 4 KiB
//! reads so large files never sit in memory.
//!
//! # Design
//!
//! The fingerprint is deliberately weak. Every call site gates on equal byte
//! length before comparing checksums, so CRC-32's collision behaviour is
//! acceptable for same-content detection; this is not an integrity mechanism.
//!
//! # Errors
//!
//! [`fingerprint_file`] surfaces the underlying [`io::Error`] unchanged.
//! Callers treat a failure as "this file cannot participate in content
//! matching" and leave the file unconsumed.
//!
//! # Examples
//!
//! ```
//! use codesync_checksums::fingerprint_reader;
//!
//! let print = fingerprint_reader(&b"123456789"[..]).unwrap();
//! assert_eq!(print.length, 9);
//! assert_eq!(print.crc, 0xCBF4_3926);
//! ```

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Size of the scratch buffer used for streamed reads.
pub const HASH_BUFFER_SIZE: usize = 4096;

/// Length and CRC-32 of a file's contents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fingerprint {
    /// Total number of bytes read.
    pub length: u64,
    /// CRC-32 (IEEE) over the full contents.
    pub crc: u32,
}

/// Fingerprints the file at `path`.
///
/// The file handle is scoped to this call and released on every exit path.
pub fn fingerprint_file(path: &Path) -> io::Result<Fingerprint> {
    let file = File::open(path)?;
    fingerprint_reader(file)
}

/// Fingerprints everything the reader yields.
pub fn fingerprint_reader<R: Read>(mut reader: R) -> io::Result<Fingerprint> {
    let mut hasher = crc32fast::Hasher::new();
    let mut buffer = [0u8; HASH_BUFFER_SIZE];
    let mut length = 0u64;
    loop {
        let read = reader.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
        length += read as u64;
    }
    Ok(Fingerprint {
        length,
        crc: hasher.finalize(),
    })
}
