//! Changelog entry synthesis and merge engine
//!
//! - `document`: marker-delimited changelog model and file I/O
//! - `entry`: PR bullet lines and version entries
//! - `formatter`: turns merged-PR activity into a canonical entry
//! - `merge`: inserts or updates the current entry, preserving manual edits
//! - `placeholder`: swaps silent placeholders for published release notes
//! - `forwardport`: carries a release entry back onto the default branch
//! - `check`: cross-checks a committed entry against generated activity
//! - `splice`: merges a changelog entry into hosting-generated release notes

pub mod check;
pub mod document;
pub mod entry;
pub mod formatter;
pub mod forwardport;
pub mod merge;
pub mod placeholder;
pub mod splice;

pub use document::{read_current_entry, read_current_version};
pub use formatter::{EntryFormatter, EntryRequest, NoiseFilter};
pub use forwardport::{ForwardportOutcome, forwardport_changelog};
pub use merge::update_changelog;
pub use placeholder::remove_placeholder_entries;
pub use splice::splice_github_entry;

/// Opens the current entry
pub const START_MARKER: &str = "<!-- <START NEW CHANGELOG ENTRY> -->";
/// Closes the current entry
pub const END_MARKER: &str = "<!-- <END NEW CHANGELOG ENTRY> -->";
/// Opens a silent placeholder
pub const START_SILENT_MARKER: &str = "<!-- START SILENT CHANGELOG ENTRY -->";
/// Closes a silent placeholder
pub const END_SILENT_MARKER: &str = "<!-- END SILENT CHANGELOG ENTRY -->";

/// Title prefix of the automated PRs that carry a changelog update
pub const PR_PREFIX: &str = "Automated Changelog Entry";
/// Title prefix of pre-commit.ci autoupdate PRs
pub const PRECOMMIT_PREFIX: &str = "[pre-commit.ci] pre-commit autoupdate";
