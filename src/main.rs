mod changelog;
mod commands;
mod core;
mod hosting;

use clap::{Args, Parser, Subcommand};
use core::error::{RailError, print_error};
use std::path::PathBuf;

/// Generate, merge, and forward-port release changelog entries
#[derive(Parser)]
#[command(name = "rail-changelog")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  /// Changelog path relative to the repository root (default: from config, else CHANGELOG.md)
  #[arg(long, global = true)]
  changelog: Option<PathBuf>,

  #[command(subcommand)]
  command: Commands,
}

/// Where and how to look for merged PRs
#[derive(Args)]
struct EntryArgs {
  /// GitHub repository as owner/name
  #[arg(long)]
  repo: Option<String>,
  /// Target branch of the merged PRs
  #[arg(long)]
  branch: Option<String>,
  /// Ref to find the previous tag from (default: the branch)
  #[arg(long = "ref")]
  git_ref: Option<String>,
  /// Start of the range: tag, commit, or date (default: latest tag)
  #[arg(long)]
  since: Option<String>,
  /// Start from the latest stable tag instead of the latest tag
  #[arg(long)]
  since_last_stable: bool,
  /// End of the range (default: now)
  #[arg(long)]
  until: Option<String>,
  /// GitHub token
  #[arg(long, env = "GITHUB_ACCESS_TOKEN", hide_env_values = true)]
  auth: Option<String>,
  /// Keep backport PRs as they are instead of attributing the original PR
  #[arg(long)]
  no_resolve_backports: bool,
}

impl From<EntryArgs> for commands::EntryOptions {
  fn from(args: EntryArgs) -> Self {
    Self {
      repo: args.repo,
      branch: args.branch,
      git_ref: args.git_ref,
      since: args.since,
      since_last_stable: args.since_last_stable,
      until: args.until,
      auth: args.auth,
      no_resolve_backports: args.no_resolve_backports,
    }
  }
}

#[derive(Subcommand)]
enum Commands {
  // ============================================================================
  // Generating
  // ============================================================================
  /// Generate the entry for a version and merge it into the changelog
  Build {
    /// Version being released
    #[arg(value_name = "VERSION")]
    release_version: String,
    #[command(flatten)]
    entry: EntryArgs,
    /// Add a silent placeholder to be filled from the published release
    #[arg(long)]
    silent: bool,
    /// Print the entry instead of writing the changelog
    #[arg(long)]
    dry_run: bool,
  },

  /// Verify the committed entry against merged PRs
  Check {
    /// Version being released
    #[arg(value_name = "VERSION")]
    release_version: String,
    #[command(flatten)]
    entry: EntryArgs,
    /// Write the verified entry to this file
    #[arg(long)]
    output: Option<PathBuf>,
  },

  // ============================================================================
  // Editing
  // ============================================================================
  /// Insert an externally written entry into the changelog
  Update {
    /// Read the entry from this markdown file
    #[arg(long, conflicts_with = "release", required_unless_present = "release")]
    from_file: Option<PathBuf>,
    /// Use the body of the hosted release with this tag
    #[arg(long)]
    release: Option<String>,
    /// GitHub repository as owner/name (with --release)
    #[arg(long)]
    repo: Option<String>,
    /// GitHub token (with --release)
    #[arg(long, env = "GITHUB_ACCESS_TOKEN", hide_env_values = true)]
    auth: Option<String>,
    /// Version of the entry (default: from its header)
    #[arg(long, value_name = "VERSION")]
    for_version: Option<String>,
    /// Splice titles and preamble from GitHub's generated release notes in this file
    #[arg(long)]
    github_notes: Option<PathBuf>,
    /// Print the entry instead of writing the changelog
    #[arg(long)]
    dry_run: bool,
  },

  /// Print the current entry
  Extract {
    /// Print only the version of the current entry
    #[arg(long)]
    version_only: bool,
  },

  // ============================================================================
  // After a release
  // ============================================================================
  /// Replace silent placeholders whose releases have been published
  Publish {
    /// GitHub repository as owner/name
    #[arg(long)]
    repo: Option<String>,
    /// GitHub token
    #[arg(long, env = "GITHUB_ACCESS_TOKEN", hide_env_values = true)]
    auth: Option<String>,
    /// Report what would change without writing
    #[arg(long)]
    dry_run: bool,
  },

  /// Carry a released entry onto the default branch
  Forwardport {
    /// Tag of the release whose entry is carried over
    tag: String,
    /// Branch to update (default: repository.default_branch)
    #[arg(long)]
    branch: Option<String>,
    /// Use the local branch as is instead of fetching it
    #[arg(long)]
    no_fetch: bool,
    /// Report what would change without writing
    #[arg(long)]
    dry_run: bool,
  },
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn init_tracing() {
  let filter = tracing_subscriber::EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("rail_changelog=info"));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .init();
}

fn main() {
  let cli = Cli::parse();
  init_tracing();

  let root = match std::env::current_dir() {
    Ok(dir) => core::context::discover_root(&dir),
    Err(e) => {
      eprintln!("Error: Failed to get current directory: {}", e);
      std::process::exit(1);
    }
  };

  // Build context once (repository root + config + changelog path)
  let ctx = match core::context::ChangelogContext::build(&root, cli.changelog.as_deref()) {
    Ok(ctx) => ctx,
    Err(e) => handle_error(e),
  };

  let result = match cli.command {
    // Generating
    Commands::Build {
      release_version,
      entry,
      silent,
      dry_run,
    } => commands::run_build(&ctx, entry.into(), release_version, silent, dry_run),
    Commands::Check {
      release_version,
      entry,
      output,
    } => commands::run_check(&ctx, entry.into(), release_version, output),

    // Editing
    Commands::Update {
      from_file,
      release,
      repo,
      auth,
      for_version,
      github_notes,
      dry_run,
    } => {
      let source = match (from_file, release) {
        (Some(path), _) => commands::EntrySource::File(path),
        (None, Some(tag)) => commands::EntrySource::Release { tag, repo, auth },
        (None, None) => handle_error(RailError::with_help(
          "No entry to insert",
          "Pass --from-file or --release",
        )),
      };
      commands::run_update(&ctx, source, for_version, github_notes, dry_run)
    }
    Commands::Extract { version_only } => commands::run_extract(&ctx, version_only),

    // After a release
    Commands::Publish { repo, auth, dry_run } => commands::run_publish(&ctx, repo, auth, dry_run),
    Commands::Forwardport {
      tag,
      branch,
      no_fetch,
      dry_run,
    } => commands::run_forwardport(&ctx, tag, branch, no_fetch, dry_run),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: RailError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
