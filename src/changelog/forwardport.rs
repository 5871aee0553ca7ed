//! Forward-porting a shipped entry onto the default branch
//!
//! A release cut from a maintenance branch finalizes its entry there. The same
//! entry has to land on the default branch in descending-version order, even
//! when that branch has already moved on to newer releases.

use super::END_MARKER;
use super::document::{extract_current, extract_version, locate_current_entry, normalize, write_changelog};
use super::merge::insert_entry;
use crate::core::error::{DocumentError, RailError, RailResult, ResultExt};
use crate::core::vcs::SystemGit;
use std::path::Path;
use tracing::{info, warn};

/// Result of merging a tagged entry into a target document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForwardPort {
  /// The merged document
  Updated(String),
  /// The anchor header is absent from the target; nothing was changed
  MissingAnchor { header: String },
  /// The target already has a line equal to the entry's header
  AlreadyPresent { header: String },
}

/// First header line below the end marker of a tagged document
pub fn previous_header(tagged: &str) -> RailResult<String> {
  let span = locate_current_entry(tagged)?;

  tagged[span.end..]
    .lines()
    .find(|line| line.trim().starts_with('#'))
    .map(str::to_string)
    .ok_or_else(|| DocumentError::MissingAnchor.into())
}

/// Merge the current entry of `tagged` into `target`
///
/// The header that followed the entry on the tagged commit anchors it. When the
/// anchor is still the target's current entry, the entry is inserted as a new
/// current entry. When the target already has newer entries, the entry is
/// spliced in just above the anchor.
///
/// Running it again on its own output changes nothing.
pub fn forwardport_entry(tagged: &str, target: &str) -> RailResult<ForwardPort> {
  let entry = extract_current(tagged);
  let header = previous_header(tagged)?;
  let span = locate_current_entry(target)?;

  extract_version(&entry)?;
  let entry_header = entry.trim().lines().next().unwrap_or_default().to_string();
  if line_offset(target, &entry_header).is_some() {
    return Ok(ForwardPort::AlreadyPresent { header: entry_header });
  }

  let Some(position) = line_offset(target, &header) else {
    return Ok(ForwardPort::MissingAnchor { header });
  };

  let updated = if span.inner().contains(&position) {
    insert_entry(target, &entry, None, false)?
  } else {
    normalize(&format!("{}{}{}", &target[..position], entry, &target[position..]))
  };

  Ok(ForwardPort::Updated(updated))
}

/// Byte offset of the first line of `doc` equal to `line`
fn line_offset(doc: &str, line: &str) -> Option<usize> {
  let mut offset = 0;
  for candidate in doc.split_inclusive('\n') {
    if candidate.trim_end_matches(['\n', '\r']) == line {
      return Some(offset);
    }
    offset += candidate.len();
  }
  None
}

/// What a forward-port run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForwardportOutcome {
  /// The tag is already reachable from the branch
  AlreadyMerged,
  /// The branch diverged too far to place the entry
  AnchorNotFound { header: String },
  /// The branch already carries the entry from an earlier forward-port
  AlreadyPresent { header: String },
  /// The entry was merged; `written` is false for dry runs
  Updated { written: bool },
}

/// Forward-port the entry released as `tag` onto `branch`
///
/// With a remote, the branch is fetched and reset to the remote's tip before
/// merging. The branch is left checked out with the updated changelog
/// uncommitted.
pub fn forwardport_changelog(
  git: &SystemGit,
  changelog_path: &Path,
  tag: &str,
  branch: &str,
  remote: Option<&str>,
  dry_run: bool,
) -> RailResult<ForwardportOutcome> {
  if let Some(remote) = remote {
    git.fetch_branch(remote, branch)?;
  }

  let start_point = remote.map(|r| format!("{}/{}", r, branch));
  let upstream = start_point.as_deref().unwrap_or(branch);
  if git.tags_merged(upstream)?.iter().any(|t| t == tag) {
    info!("Skipping since tag is already merged into {}", branch);
    return Ok(ForwardportOutcome::AlreadyMerged);
  }

  let tagged = git
    .read_file_at_commit(tag, changelog_path)?
    .ok_or_else(|| RailError::message(format!("{} does not exist at {}", changelog_path.display(), tag)))?;

  match &start_point {
    Some(start) => git.checkout_reset(branch, start)?,
    None => git.checkout(branch)?,
  }

  let full_path = git.work_tree().join(changelog_path);
  let target = std::fs::read_to_string(&full_path)
    .with_context(|| format!("Failed to read {} on branch {}", full_path.display(), branch))?;

  let merged = forwardport_entry(&tagged, &target)
    .with_context(|| format!("Forward-porting {} from {}", changelog_path.display(), tag))?;

  match merged {
    ForwardPort::MissingAnchor { header } => {
      warn!(
        "Could not find previous header \"{}\" in {} on branch {}",
        header,
        changelog_path.display(),
        branch
      );
      Ok(ForwardportOutcome::AnchorNotFound { header })
    }
    ForwardPort::AlreadyPresent { header } => {
      info!("{} already has \"{}\" on branch {}", changelog_path.display(), header, branch);
      Ok(ForwardportOutcome::AlreadyPresent { header })
    }
    ForwardPort::Updated(doc) => {
      if dry_run {
        return Ok(ForwardportOutcome::Updated { written: false });
      }
      write_changelog(&full_path, &doc)?;
      Ok(ForwardportOutcome::Updated { written: true })
    }
  }
}
