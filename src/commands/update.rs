//! Update command: insert an externally written entry

use crate::changelog::document::extract_version;
use crate::changelog::merge::update_changelog_from_text;
use crate::changelog::splice_github_entry;
use crate::core::context::ChangelogContext;
use crate::core::error::{RailError, RailResult, ResultExt};
use crate::hosting::{GhCli, ReleaseHost};
use std::fs;
use std::path::PathBuf;

/// Where the entry text comes from
#[derive(Debug, Clone)]
pub enum EntrySource {
  /// A local markdown file
  File(PathBuf),
  /// The body of the hosted release with this tag
  Release { tag: String, repo: Option<String>, auth: Option<String> },
}

/// Run the update command
///
/// With `github_notes`, PR titles and any preamble from GitHub's generated
/// release notes are spliced into the entry first.
pub fn run_update(
  ctx: &ChangelogContext,
  source: EntrySource,
  version: Option<String>,
  github_notes: Option<PathBuf>,
  dry_run: bool,
) -> RailResult<()> {
  let text = match &source {
    EntrySource::File(path) => {
      fs::read_to_string(path).with_context(|| format!("Failed to read entry from {}", path.display()))?
    }
    EntrySource::Release { tag, repo, auth } => {
      let repo = ctx.repo(repo.as_deref())?;
      let host = GhCli::new(ctx.config.tools.gh.clone(), auth.clone());
      let release = host
        .get_release_by_tag(&repo, tag)?
        .ok_or_else(|| RailError::message(format!("No release found for tag {} in {}", tag, repo)))?;
      release.body.unwrap_or_default()
    }
  };

  let text = match github_notes {
    Some(path) => {
      let notes =
        fs::read_to_string(&path).with_context(|| format!("Failed to read release notes from {}", path.display()))?;
      splice_below_header(&text, &notes).with_context(|| format!("Splicing {}", path.display()))?
    }
    None => text,
  };

  if dry_run {
    println!("DRY RUN: Would add to {}:", ctx.changelog.display());
    println!();
    println!("{}", text.trim());
    return Ok(());
  }

  update_changelog_from_text(&ctx.changelog_path(), &text, version.as_deref())?;
  println!("✅ Updated {}", ctx.changelog.display());
  Ok(())
}

/// Splice release notes into an entry, keeping its version header on top
fn splice_below_header(entry: &str, notes: &str) -> RailResult<String> {
  let entry = entry.trim();
  match entry.split_once('\n') {
    Some((header, body)) if extract_version(header).is_ok() => {
      Ok(format!("{}\n\n{}", header, splice_github_entry(body.trim_start(), notes)?))
    }
    _ => splice_github_entry(entry, notes),
  }
}
