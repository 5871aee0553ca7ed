//! Publish command: fill silent placeholders from published releases

use crate::changelog::remove_placeholder_entries;
use crate::core::context::ChangelogContext;
use crate::core::error::RailResult;
use crate::hosting::GhCli;

/// Run the publish command
pub fn run_publish(ctx: &ChangelogContext, repo: Option<String>, auth: Option<String>, dry_run: bool) -> RailResult<()> {
  let repo = ctx.repo(repo.as_deref())?;
  let host = GhCli::new(ctx.config.tools.gh.clone(), auth);

  let resolved = remove_placeholder_entries(&repo, &host, &ctx.changelog_path(), dry_run)?;

  match (resolved, dry_run) {
    (0, _) => println!("✅ No silent entries ready to publish"),
    (n, true) => println!("DRY RUN: Would replace {} silent entr{}", n, if n == 1 { "y" } else { "ies" }),
    (n, false) => println!(
      "✅ Replaced {} silent entr{} in {}",
      n,
      if n == 1 { "y" } else { "ies" },
      ctx.changelog.display()
    ),
  }
  Ok(())
}
