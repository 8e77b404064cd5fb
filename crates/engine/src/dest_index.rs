//! The destination index: bare filename to one-or-many candidate paths.

use codesync_core::RelativePath;
use rustc_hash::FxHashMap;

/// Candidates sharing a filename.
///
/// The two shapes are deliberate: `Single` is the common case and the matcher
/// branches on the tag at every consumer, escalating to the candidate-list
/// logic only for `Multi`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DestEntry {
    /// Exactly one destination carries this filename.
    Single(RelativePath),
    /// Two or more destinations carry this filename, in insertion order.
    Multi(Vec<RelativePath>),
}

impl DestEntry {
    /// Number of candidate paths in this entry.
    #[must_use]
    pub fn candidate_count(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Multi(paths) => paths.len(),
        }
    }

    /// The candidates as a slice, in insertion order.
    #[must_use]
    pub fn candidates(&self) -> &[RelativePath] {
        match self {
            Self::Single(path) => std::slice::from_ref(path),
            Self::Multi(paths) => paths,
        }
    }

    fn push(&mut self, path: RelativePath) {
        match self {
            Self::Single(existing) => {
                let first = existing.clone();
                *self = Self::Multi(vec![first, path]);
            }
            Self::Multi(paths) => paths.push(path),
        }
    }
}

/// Mapping from bare filename to destination candidates.
///
/// Keys are filenames folded to lower case, so lookups are case-insensitive.
/// `count` tracks the total number of candidate paths across all entries (not
/// the number of keys) and is kept in step by every mutation. Keys are never
/// re-inserted after removal during a run; the matcher only consumes.
#[derive(Debug, Default)]
pub struct DestinationIndex {
    entries: FxHashMap<String, DestEntry>,
    order: Vec<String>,
    count: usize,
}

impl DestinationIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an index from an enumeration of destination paths.
    pub fn from_paths<I: IntoIterator<Item = RelativePath>>(paths: I) -> Self {
        let mut index = Self::new();
        for path in paths {
            index.insert(path);
        }
        index
    }

    /// Inserts a path under its filename, escalating `Single` to `Multi` on
    /// collision.
    pub fn insert(&mut self, path: RelativePath) {
        let key = fold(path.file_name());
        self.count += 1;
        match self.entries.get_mut(&key) {
            Some(entry) => entry.push(path),
            None => {
                self.order.push(key.clone());
                self.entries.insert(key, DestEntry::Single(path));
            }
        }
    }

    /// Total candidate paths across all entries.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Reports whether no candidates remain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Looks up the entry for a filename, case-insensitively.
    #[must_use]
    pub fn get(&self, file_name: &str) -> Option<&DestEntry> {
        self.entries.get(&fold(file_name))
    }

    /// Drops the whole entry for a filename; `count` decreases by the entry's
    /// candidate count.
    pub fn remove_entry(&mut self, file_name: &str) -> Option<DestEntry> {
        let entry = self.entries.remove(&fold(file_name))?;
        self.count -= entry.candidate_count();
        Some(entry)
    }

    /// Drops a specific candidate; the key goes with it when the entry
    /// empties, and a `Multi` left with one path collapses to `Single`.
    /// Returns whether the candidate was present.
    pub fn remove_candidate(&mut self, file_name: &str, path: &RelativePath) -> bool {
        enum Action {
            DropKey,
            Collapse(RelativePath),
            Removed,
        }

        let key = fold(file_name);
        let action = match self.entries.get_mut(&key) {
            None => return false,
            Some(DestEntry::Single(existing)) => {
                if existing == path {
                    Action::DropKey
                } else {
                    return false;
                }
            }
            Some(DestEntry::Multi(paths)) => match paths.iter().position(|c| c == path) {
                None => return false,
                Some(position) => {
                    paths.remove(position);
                    if paths.len() == 1 {
                        Action::Collapse(paths.remove(0))
                    } else {
                        Action::Removed
                    }
                }
            },
        };

        match action {
            Action::DropKey => {
                self.entries.remove(&key);
            }
            Action::Collapse(last) => {
                self.entries.insert(key, DestEntry::Single(last));
            }
            Action::Removed => {}
        }
        self.count -= 1;
        true
    }

    /// All remaining candidate paths, grouped by first-insertion order of
    /// their filename.
    pub fn remaining(&self) -> impl Iterator<Item = &RelativePath> {
        self.order
            .iter()
            .filter_map(|key| self.entries.get(key))
            .flat_map(DestEntry::candidates)
    }
}

fn fold(name: &str) -> String {
    name.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rp(text: &str) -> RelativePath {
        RelativePath::new(text)
    }

    #[test]
    fn insert_escalates_single_to_multi() {
        let mut index = DestinationIndex::new();
        index.insert(rp("a/x.txt"));
        assert!(matches!(index.get("x.txt"), Some(DestEntry::Single(_))));

        index.insert(rp("b/x.txt"));
        index.insert(rp("c/x.txt"));
        let entry = index.get("x.txt").expect("entry");
        assert_eq!(entry.candidate_count(), 3);
        let order: Vec<&str> = entry.candidates().iter().map(RelativePath::as_str).collect();
        assert_eq!(order, vec!["a/x.txt", "b/x.txt", "c/x.txt"]);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let index = DestinationIndex::from_paths([rp("docs/ReadMe.md")]);
        assert!(index.get("readme.MD").is_some());
    }

    #[test]
    fn count_tracks_candidates_not_keys() {
        let mut index = DestinationIndex::from_paths([
            rp("a/x.txt"),
            rp("b/x.txt"),
            rp("y.txt"),
        ]);
        assert_eq!(index.count(), 3);

        index.remove_candidate("x.txt", &rp("a/x.txt"));
        assert_eq!(index.count(), 2);

        index.remove_entry("y.txt");
        assert_eq!(index.count(), 1);

        index.remove_entry("x.txt");
        assert_eq!(index.count(), 0);
        assert!(index.is_empty());
    }

    #[test]
    fn remove_entry_drops_all_candidates_at_once() {
        let mut index =
            DestinationIndex::from_paths([rp("a/x.txt"), rp("b/x.txt"), rp("c/x.txt")]);
        let removed = index.remove_entry("x.txt").expect("entry");
        assert_eq!(removed.candidate_count(), 3);
        assert_eq!(index.count(), 0);
        assert!(index.get("x.txt").is_none());
    }

    #[test]
    fn removing_second_to_last_candidate_collapses_to_single() {
        let mut index = DestinationIndex::from_paths([rp("a/x.txt"), rp("b/x.txt")]);
        assert!(index.remove_candidate("x.txt", &rp("a/x.txt")));
        assert!(matches!(index.get("x.txt"), Some(DestEntry::Single(path)) if path.as_str() == "b/x.txt"));
    }

    #[test]
    fn removing_last_candidate_drops_the_key() {
        let mut index = DestinationIndex::from_paths([rp("x.txt")]);
        assert!(index.remove_candidate("x.txt", &rp("x.txt")));
        assert!(index.get("x.txt").is_none());
        assert_eq!(index.count(), 0);
    }

    #[test]
    fn remove_candidate_reports_missing_paths() {
        let mut index = DestinationIndex::from_paths([rp("a/x.txt"), rp("b/x.txt")]);
        assert!(!index.remove_candidate("x.txt", &rp("z/x.txt")));
        assert!(!index.remove_candidate("other.txt", &rp("other.txt")));
        assert_eq!(index.count(), 2);
    }

    #[test]
    fn remaining_preserves_insertion_order() {
        let mut index = DestinationIndex::from_paths([
            rp("b.txt"),
            rp("a/x.txt"),
            rp("c.txt"),
            rp("b/x.txt"),
        ]);
        index.remove_entry("c.txt");
        let rest: Vec<&str> = index.remaining().map(RelativePath::as_str).collect();
        assert_eq!(rest, vec!["b.txt", "a/x.txt", "b/x.txt"]);
    }
}
