//! Forwardport command: carry a shipped entry onto the default branch

use crate::changelog::{ForwardportOutcome, forwardport_changelog};
use crate::core::context::ChangelogContext;
use crate::core::error::RailResult;
use crate::core::vcs::SystemGit;

/// Run the forwardport command
///
/// Without `no_fetch`, the branch is fetched from the configured remote when
/// that remote exists and reset to its tip.
pub fn run_forwardport(
  ctx: &ChangelogContext,
  tag: String,
  branch: Option<String>,
  no_fetch: bool,
  dry_run: bool,
) -> RailResult<()> {
  let branch = ctx.branch(branch.as_deref())?;
  let git = SystemGit::open(&ctx.root)?;

  let remote = &ctx.config.repository.remote;
  let remote = if !no_fetch && git.list_remotes()?.contains(remote) {
    Some(remote.as_str())
  } else {
    None
  };

  println!("🔀 Forward-porting {} entry onto {}", tag, branch);

  match forwardport_changelog(&git, &ctx.changelog, &tag, &branch, remote, dry_run)? {
    ForwardportOutcome::AlreadyMerged => {
      println!("✅ {} is already merged into {}, nothing to do", tag, branch);
    }
    ForwardportOutcome::AlreadyPresent { header } => {
      println!("✅ {} already has \"{}\", nothing to do", branch, header);
    }
    ForwardportOutcome::AnchorNotFound { header } => {
      println!("⚠️  Could not find \"{}\" on {}, changelog left unchanged", header, branch);
    }
    ForwardportOutcome::Updated { written: false } => {
      println!("DRY RUN: Would update {} on {}", ctx.changelog.display(), branch);
    }
    ForwardportOutcome::Updated { written: true } => {
      println!("✅ Updated {} on {}", ctx.changelog.display(), branch);
      println!("   Commit the change to open a forward-port PR");
    }
  }
  Ok(())
}
