//! The hash index used by the cross-orphan content pass.

use codesync_core::RelativePath;
use rustc_hash::FxHashMap;

/// A source orphan awaiting a content match.
#[derive(Clone, Debug)]
pub struct HashRecord {
    /// Whether a destination has already claimed this record.
    pub matched: bool,
    /// The source path the record stands for.
    pub path: RelativePath,
    /// Byte length, the secondary check behind the 32-bit hash.
    pub length: u64,
}

/// Mapping from content hash to the source orphans carrying it.
///
/// Collisions land in the same bucket and are told apart by the length check
/// in [`claim`](Self::claim).
#[derive(Debug, Default)]
pub struct HashIndex {
    buckets: FxHashMap<u32, Vec<HashRecord>>,
}

impl HashIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record to the bucket for `hash`.
    pub fn insert(&mut self, hash: u32, path: RelativePath, length: u64) {
        self.buckets.entry(hash).or_default().push(HashRecord {
            matched: false,
            path,
            length,
        });
    }

    /// Claims the first unmatched record with the given hash and length,
    /// marking it matched and returning its path.
    pub fn claim(&mut self, hash: u32, length: u64) -> Option<RelativePath> {
        let bucket = self.buckets.get_mut(&hash)?;
        let record = bucket
            .iter_mut()
            .find(|record| !record.matched && record.length == length)?;
        record.matched = true;
        Some(record.path.clone())
    }

    /// Reports whether the record for `path` under `hash` has been claimed.
    #[must_use]
    pub fn is_matched(&self, hash: u32, path: &RelativePath) -> bool {
        self.buckets
            .get(&hash)
            .is_some_and(|bucket| bucket.iter().any(|r| r.matched && r.path == *path))
    }
}
