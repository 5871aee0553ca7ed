//! Release-hosting and activity collaborators
//!
//! The changelog engine only talks to these traits. Production implementations
//! shell out to `gh` and `github-activity`; tests substitute in-memory stubs.

pub mod activity;
pub mod gh;

pub use activity::GithubActivityCli;
pub use gh::GhCli;

use crate::core::error::{ConfigError, RailError, RailResult};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// A GitHub `owner/name` repository identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
  pub owner: String,
  pub name: String,
}

impl FromStr for RepoSlug {
  type Err = RailError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let invalid = || {
      RailError::Config(ConfigError::InvalidRepo {
        value: s.to_string(),
      })
    };

    let (owner, name) = s.trim().split_once('/').ok_or_else(invalid)?;
    if owner.is_empty() || name.is_empty() || name.contains('/') {
      return Err(invalid());
    }

    Ok(Self {
      owner: owner.to_string(),
      name: name.to_string(),
    })
  }
}

impl fmt::Display for RepoSlug {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}/{}", self.owner, self.name)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
  pub login: String,
  pub html_url: String,
}

/// The fields of a pull request the changelog cares about
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PullRequest {
  pub title: String,
  pub html_url: String,
  pub user: User,
}

/// A hosted release object
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Release {
  pub tag_name: String,
  pub draft: bool,
  #[serde(default)]
  pub body: Option<String>,
}

/// Release-hosting service
pub trait ReleaseHost {
  fn get_pull_request(&self, repo: &RepoSlug, number: u64) -> RailResult<PullRequest>;

  /// Look up a release by tag; `Ok(None)` when no such release exists
  fn get_release_by_tag(&self, repo: &RepoSlug, tag: &str) -> RailResult<Option<Release>>;
}

/// Parameters for one activity-aggregator call
#[derive(Debug, Clone)]
pub struct ActivityQuery<'a> {
  pub repo: &'a RepoSlug,
  pub since: &'a str,
  pub until: Option<&'a str>,
  pub branch: &'a str,
  pub auth: Option<&'a str>,
  pub heading_level: u8,
}

/// Merged-PR activity aggregator
pub trait ActivitySource {
  /// Markdown describing merged PRs in the range; empty when there are none
  fn generate_activity(&self, query: &ActivityQuery<'_>) -> RailResult<String>;
}
