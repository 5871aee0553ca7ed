//! Silent placeholder reconciliation
//!
//! A release drafted without public notes leaves a silent placeholder in the
//! changelog. Once the hosted release for that version is published, its body
//! replaces the placeholder.

use super::document::{
  check_placeholders, check_unique_markers, extract_version, normalize, read_changelog, write_changelog,
};
use super::{END_SILENT_MARKER, START_SILENT_MARKER};
use crate::core::error::{RailResult, ResultExt};
use crate::hosting::{ReleaseHost, RepoSlug};
use std::path::Path;
use tracing::{debug, info};

/// Release body as it should appear in the changelog
pub fn format_release_body(body: &str) -> String {
  body.replace("\r\n", "\n").trim().to_string()
}

/// Replace every placeholder whose release is published
///
/// Returns the new document and how many placeholders were resolved. A version
/// with no hosted release yet, or only a draft, keeps its placeholder.
/// Duplicated current-entry sentinels are rejected before anything is asked.
pub fn reconcile_placeholders(doc: &str, repo: &RepoSlug, host: &dyn ReleaseHost) -> RailResult<(String, usize)> {
  check_unique_markers(doc)?;
  let count = check_placeholders(doc)?;

  let mut doc = doc.to_string();
  let mut cursor = 0;
  let mut resolved = 0;

  for _ in 0..count {
    let Some(start) = doc[cursor..].find(START_SILENT_MARKER).map(|i| i + cursor) else {
      break;
    };
    let body_start = start + START_SILENT_MARKER.len();
    let Some(end) = doc[body_start..].find(END_SILENT_MARKER).map(|i| i + body_start) else {
      break;
    };
    let region_end = end + END_SILENT_MARKER.len();

    let version = extract_version(&doc[body_start..end])?;
    let tag = format!("v{}", version);
    info!("Getting release for tag '{}'...", tag);

    let published = match host.get_release_by_tag(repo, &tag)? {
      Some(release) if !release.draft => Some(release),
      Some(_) => {
        debug!("Release {} is still a draft", tag);
        None
      }
      None => {
        debug!("No release for {} yet", tag);
        None
      }
    };

    match published {
      Some(release) => {
        info!("Release {} is published, replacing its placeholder", release.tag_name);
        let replacement = format!("\n\n{}\n\n", format_release_body(release.body.as_deref().unwrap_or_default()));
        doc.replace_range(start..region_end, &replacement);
        cursor = start + replacement.len();
        resolved += 1;
      }
      None => cursor = region_end,
    }
  }

  Ok((normalize(&doc), resolved))
}

/// Reconcile the placeholders of the changelog at `path`
///
/// The file is rewritten only when something was resolved and `dry_run` is off.
pub fn remove_placeholder_entries(
  repo: &RepoSlug,
  host: &dyn ReleaseHost,
  path: &Path,
  dry_run: bool,
) -> RailResult<usize> {
  let doc = read_changelog(path)?;
  let (updated, resolved) =
    reconcile_placeholders(&doc, repo, host).with_context(|| format!("In changelog {}", path.display()))?;

  if resolved > 0 && !dry_run {
    write_changelog(path, &updated)?;
  }
  Ok(resolved)
}
