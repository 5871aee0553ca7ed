//! Entry formatter: activity markdown in, canonical changelog entry out

use super::entry::PrReference;
use super::{PR_PREFIX, PRECOMMIT_PREFIX};
use crate::core::error::RailResult;
use crate::core::vcs::RefHistory;
use crate::hosting::{ActivityQuery, ActivitySource, ReleaseHost, RepoSlug};
use regex::Regex;
use std::sync::LazyLock;
use tracing::info;

/// Only this phrasing is recognised; other backport bots are left untouched.
static BACKPORT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Backport PR #(\d+) on branch").expect("valid regex"));
static EMPTY_DOCS_SECTION: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?m)^#+ Documentation improvements[ \t]*(?:\n\n|\n?\z)").expect("valid regex"));

/// Heading level requested from the activity source
const HEADING_LEVEL: u8 = 2;

/// Lines that never belong in a human-facing changelog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoiseFilter {
  /// Authors whose PRs are dropped, e.g. `github-actions`
  pub bot_logins: Vec<String>,
  /// Title prefixes of automated PRs
  pub title_prefixes: Vec<String>,
}

impl Default for NoiseFilter {
  fn default() -> Self {
    Self {
      bot_logins: vec!["github-actions".to_string()],
      title_prefixes: vec![PR_PREFIX.to_string(), PRECOMMIT_PREFIX.to_string()],
    }
  }
}

impl NoiseFilter {
  pub fn is_noise(&self, line: &str) -> bool {
    self
      .bot_logins
      .iter()
      .any(|login| line.contains(&format!("[@{login}](https://github.com/{login})")))
      || self.title_prefixes.iter().any(|prefix| line.contains(prefix.as_str()))
  }
}

/// Inputs for one entry generation
#[derive(Debug, Clone)]
pub struct EntryRequest<'a> {
  pub repo: &'a RepoSlug,
  /// Target branch
  pub branch: &'a str,
  /// Source ref; tags are looked up from here when set, else from `branch`
  pub git_ref: Option<&'a str>,
  pub version: &'a str,
  pub since: Option<&'a str>,
  pub since_last_stable: bool,
  pub until: Option<&'a str>,
  pub auth: Option<&'a str>,
  pub resolve_backports: bool,
}

/// Builds changelog entries from merged-PR activity
pub struct EntryFormatter<'a> {
  activity: &'a dyn ActivitySource,
  host: &'a dyn ReleaseHost,
  history: &'a dyn RefHistory,
  noise: NoiseFilter,
}

impl<'a> EntryFormatter<'a> {
  pub fn new(activity: &'a dyn ActivitySource, host: &'a dyn ReleaseHost, history: &'a dyn RefHistory) -> Self {
    Self {
      activity,
      host,
      history,
      noise: NoiseFilter::default(),
    }
  }

  pub fn with_noise_filter(mut self, noise: NoiseFilter) -> Self {
    self.noise = noise;
    self
  }

  /// Lower bound of the activity range
  ///
  /// An explicit `since` wins; otherwise the latest (optionally stable) tag
  /// reachable from the source; otherwise the root commit, so the range is
  /// always bounded.
  pub fn resolve_since(&self, request: &EntryRequest<'_>) -> RailResult<String> {
    if let Some(since) = request.since.filter(|s| !s.is_empty()) {
      return Ok(since.to_string());
    }

    let source = request.git_ref.unwrap_or(request.branch);
    match self.history.latest_tag(source, request.since_last_stable)? {
      Some(tag) => Ok(tag),
      None => self.history.first_commit(source),
    }
  }

  /// Generate the entry for `request.version`
  pub fn get_version_entry(&self, request: &EntryRequest<'_>) -> RailResult<String> {
    let since = self.resolve_since(request)?;
    info!(
      "Getting changes to {} since {} on branch {}...",
      request.repo, since, request.branch
    );

    let until = request.until.map(|u| u.replace('%', ""));
    let markdown = self.activity.generate_activity(&ActivityQuery {
      repo: request.repo,
      since: &since,
      until: until.as_deref(),
      branch: request.branch,
      auth: request.auth,
      heading_level: HEADING_LEVEL,
    })?;

    if markdown.is_empty() {
      info!("No PRs found");
      return Ok(format!("## {}\n\nNo merged PRs", request.version));
    }

    let body = self.format_body(&markdown, until.as_deref(), request)?;
    Ok(format!("## {}\n\n{}", request.version, body).trim().to_string())
  }

  fn format_body(&self, markdown: &str, until: Option<&str>, request: &EntryRequest<'_>) -> RailResult<String> {
    let markdown = markdown.replace("[full changelog]", "[Full Changelog]");
    let markdown = match until {
      Some(until) => markdown.replace("...None", &format!("...{}", until)),
      None => markdown.replace("...None", ""),
    };

    // The first two lines are the aggregator's own date-range header
    let mut lines: Vec<String> = markdown.lines().skip(2).map(str::to_string).collect();

    if request.resolve_backports {
      for line in lines.iter_mut() {
        let Some(caps) = BACKPORT.captures(line) else {
          continue;
        };
        let Ok(number) = caps[1].parse::<u64>() else {
          continue;
        };
        *line = format_pr_entry(self.host, request.repo, number)?;
      }
    }

    let body = lines
      .into_iter()
      .filter(|line| !self.noise.is_noise(line))
      .collect::<Vec<_>>()
      .join("\n");
    let body = body.trim();

    Ok(prune_empty_docs_section(body))
  }
}

/// Canonical bullet line for one PR, fetched from the hosting service
pub fn format_pr_entry(host: &dyn ReleaseHost, repo: &RepoSlug, number: u64) -> RailResult<String> {
  let pull = host.get_pull_request(repo, number)?;
  Ok(PrReference::from_pull(number, &pull).to_string())
}

/// Drop the "Documentation improvements" heading when no bullets survived under it
fn prune_empty_docs_section(body: &str) -> String {
  if !body.contains("# Documentation improvements") || body.contains("# Documentation improvements\n\n-") {
    return body.to_string();
  }
  EMPTY_DOCS_SECTION.replace_all(body, "").trim().to_string()
}
