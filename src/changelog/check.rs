//! Cross-checking a committed entry against generated activity

use super::document::{locate_current_entry, read_changelog, write_changelog};
use super::entry::pr_numbers;
use crate::core::error::{RailResult, ResultExt, ValidationError};
use std::path::Path;
use tracing::debug;

/// Verify that `final_entry` describes exactly the PRs in `raw_entry`
///
/// `final_entry` is the committed, possibly hand-edited entry; `raw_entry` is
/// freshly generated. A generated PR whose line mentions "changelog" is the
/// changelog PR itself and may be absent from the committed entry.
pub fn check_entry(final_entry: &str, raw_entry: &str, version: &str) -> RailResult<()> {
  if !final_entry.contains(&format!("# {}", version)) {
    debug!("{}", final_entry);
    return Err(
      ValidationError::MissingVersionEntry {
        version: version.to_string(),
      }
      .into(),
    );
  }

  for number in pr_numbers(raw_entry) {
    let token = format!("[#{}]", number);
    let is_changelog_pr = raw_entry
      .lines()
      .any(|line| line.contains(&token) && line.to_lowercase().contains("changelog"));
    if is_changelog_pr {
      continue;
    }
    if !final_entry.contains(&token) {
      return Err(ValidationError::MissingPullRequest { number }.into());
    }
  }

  for number in pr_numbers(final_entry) {
    if !raw_entry.contains(&format!("[#{}]", number)) {
      return Err(
        ValidationError::UnexpectedPullRequest {
          number,
          version: version.to_string(),
        }
        .into(),
      );
    }
  }

  Ok(())
}

/// Check the current entry of the changelog at `path`
///
/// On success the committed entry is optionally written to `output`, e.g. for
/// use as release notes.
pub fn check_changelog(path: &Path, raw_entry: &str, version: &str, output: Option<&Path>) -> RailResult<()> {
  let doc = read_changelog(path)?;
  let span = locate_current_entry(&doc).with_context(|| format!("In changelog {}", path.display()))?;
  let final_entry = &doc[span.inner()];

  check_entry(final_entry, raw_entry, version).with_context(|| format!("Checking {}", path.display()))?;

  if let Some(output) = output {
    write_changelog(output, final_entry)?;
  }
  Ok(())
}
