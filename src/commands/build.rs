//! Build command: generate an entry and merge it into the changelog

use crate::changelog::entry::VersionEntry;
use crate::changelog::{EntryFormatter, EntryRequest, update_changelog};
use crate::core::context::ChangelogContext;
use crate::core::error::RailResult;
use crate::core::vcs::SystemGit;
use crate::hosting::{GhCli, GithubActivityCli};

/// Entry generation settings shared by `build` and `check`
#[derive(Debug, Clone, Default)]
pub struct EntryOptions {
  pub repo: Option<String>,
  pub branch: Option<String>,
  pub git_ref: Option<String>,
  pub since: Option<String>,
  pub since_last_stable: bool,
  pub until: Option<String>,
  pub auth: Option<String>,
  pub no_resolve_backports: bool,
}

/// Generate the entry for `version` from merged-PR activity
pub(crate) fn generate_entry(ctx: &ChangelogContext, opts: &EntryOptions, version: &str) -> RailResult<String> {
  let repo = ctx.repo(opts.repo.as_deref())?;
  let branch = ctx.branch(opts.branch.as_deref())?;

  let git = SystemGit::open(&ctx.root)?;
  let host = GhCli::new(ctx.config.tools.gh.clone(), opts.auth.clone());
  let activity = GithubActivityCli::new(ctx.config.tools.activity.clone());
  let formatter =
    EntryFormatter::new(&activity, &host, &git).with_noise_filter(ctx.config.filters.noise_filter());

  formatter.get_version_entry(&EntryRequest {
    repo: &repo,
    branch: &branch,
    git_ref: opts.git_ref.as_deref(),
    version,
    since: opts.since.as_deref(),
    since_last_stable: opts.since_last_stable || ctx.config.changelog.since_last_stable,
    until: opts.until.as_deref(),
    auth: opts.auth.as_deref(),
    resolve_backports: ctx.config.changelog.resolve_backports && !opts.no_resolve_backports,
  })
}

/// Run the build command
pub fn run_build(ctx: &ChangelogContext, opts: EntryOptions, version: String, silent: bool, dry_run: bool) -> RailResult<()> {
  let entry = generate_entry(ctx, &opts, &version)?;

  if dry_run {
    println!("DRY RUN: Would add to {}:", ctx.changelog.display());
    println!();
    println!("{}", entry);
    return Ok(());
  }

  update_changelog(&ctx.changelog_path(), &entry, Some(&version), silent)?;

  if silent {
    println!("🔇 Added silent placeholder for {} to {}", version, ctx.changelog.display());
  } else {
    let prs = VersionEntry::parse(&entry)?.pull_requests().len();
    println!("✅ Updated {} with entry for {}", ctx.changelog.display(), version);
    println!("   {} merged PR{}", prs, if prs == 1 { "" } else { "s" });
  }
  Ok(())
}
