//! Section header wording.
//!
//! Plans are hand-edited, so these headers are documentation for the person
//! holding the editor. The wording is part of the observable file format;
//! change it here and nowhere else.

/// Matches the analyzer is confident about.
pub const CURRENT_MATCHES: &str =
    "Matched files. Each Copy entry overwrites the destination file with the source file when the plan is applied.";

/// Sources that started ambiguous and ended with a single surviving candidate.
pub const ONE_LEFT: &str =
    "Potentially incorrect matches. Each source below matched several destinations and only one candidate remained. Review the pairing and delete the Copy entry if it is wrong.";

/// Sources whose name matched several destinations and stayed unresolved.
pub const AMBIGUOUS: &str =
    "Ambiguous sources. Each entry matched several destinations, listed as comments inside it. To resolve one, change Ignore to Copy and add the chosen Destination.";

/// Sources with no counterpart on the destination side.
pub const SOURCE_ORPHANS: &str =
    "Source files with no destination counterpart. To copy one anyway, change Ignore to Copy and add a Destination path.";

/// Destination files with no counterpart on the source side.
pub const DEST_ORPHANS: &str =
    "Destination files with no source counterpart, listed as comments for reference. Uncomment an entry to record the file as deliberately ignored.";

/// Matches validated and carried forward by the updater.
pub const PREVIOUS_MATCHES: &str =
    "Matches carried forward from the previous plan. Both files were still present when the plan was updated.";

/// Previous entries whose files disappeared.
pub const PREVIOUS_PARTIALS: &str =
    "Entries from the previous plan whose files no longer exist. Review each one, then repair it or delete it.";

/// Ignore entries carried forward verbatim.
pub const PREVIOUS_IGNORES: &str =
    "Ignore entries carried forward from the previous plan.";

/// Verified copy entries, reorganized.
pub const VERIFIED_COPIES: &str =
    "Copy entries that passed verification, sorted by source path.";

/// Verified ignore entries, reorganized.
pub const VERIFIED_IGNORES: &str =
    "Ignore entries that passed verification, sorted by path.";
