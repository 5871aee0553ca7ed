//! Extract command: print the current entry or its version

use crate::changelog::{read_current_entry, read_current_version};
use crate::core::context::ChangelogContext;
use crate::core::error::RailResult;

/// Run the extract command
///
/// Prints bare text so the output can be captured by scripts.
pub fn run_extract(ctx: &ChangelogContext, version_only: bool) -> RailResult<()> {
  let path = ctx.changelog_path();

  if version_only {
    println!("{}", read_current_version(&path)?);
  } else {
    println!("{}", read_current_entry(Some(&path)).trim());
  }
  Ok(())
}
