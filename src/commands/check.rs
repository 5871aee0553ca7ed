//! Check command: cross-check the committed entry against PR activity

use super::build::{EntryOptions, generate_entry};
use crate::changelog::check::check_changelog;
use crate::changelog::entry::VersionEntry;
use crate::core::context::ChangelogContext;
use crate::core::error::RailResult;
use std::path::PathBuf;

/// Run the check command
pub fn run_check(ctx: &ChangelogContext, opts: EntryOptions, version: String, output: Option<PathBuf>) -> RailResult<()> {
  let raw_entry = generate_entry(ctx, &opts, &version)?;

  check_changelog(&ctx.changelog_path(), &raw_entry, &version, output.as_deref())?;

  let prs = VersionEntry::parse(&raw_entry)?.pull_requests().len();
  println!("✅ Changelog entry for {} matches {} merged PR{}", version, prs, if prs == 1 { "" } else { "s" });
  if let Some(output) = output {
    println!("   Entry written to {}", output.display());
  }
  Ok(())
}
