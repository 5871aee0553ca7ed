use crate::changelog::{NoiseFilter, PR_PREFIX, PRECOMMIT_PREFIX};
use crate::core::error::{RailResult, ResultExt};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for rail-changelog
/// Searched in order: rail-changelog.toml, .rail-changelog.toml, .config/rail-changelog.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangelogConfig {
  #[serde(default)]
  pub repository: RepositoryConfig,
  #[serde(default)]
  pub changelog: ChangelogFileConfig,
  #[serde(default)]
  pub filters: FilterConfig,
  #[serde(default)]
  pub tools: ToolConfig,
}

/// Where the project lives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryConfig {
  /// GitHub `owner/name`
  #[serde(default)]
  pub repo: Option<String>,

  /// Branch entries are generated for when none is given
  #[serde(default)]
  pub default_branch: Option<String>,

  /// Remote to fetch branches from (default: "origin")
  #[serde(default = "default_remote")]
  pub remote: String,
}

fn default_remote() -> String {
  "origin".to_string()
}

impl Default for RepositoryConfig {
  fn default() -> Self {
    Self {
      repo: None,
      default_branch: None,
      remote: default_remote(),
    }
  }
}

/// The changelog file and how entries for it are generated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangelogFileConfig {
  /// Changelog path relative to the repository root (default: CHANGELOG.md)
  #[serde(default = "default_changelog_path")]
  pub path: PathBuf,

  /// Start from the last stable tag instead of the last tag
  #[serde(default)]
  pub since_last_stable: bool,

  /// Attribute backport PRs to the PR they were cut from (default: true)
  #[serde(default = "default_true")]
  pub resolve_backports: bool,
}

fn default_changelog_path() -> PathBuf {
  PathBuf::from("CHANGELOG.md")
}

fn default_true() -> bool {
  true
}

impl Default for ChangelogFileConfig {
  fn default() -> Self {
    Self {
      path: default_changelog_path(),
      since_last_stable: false,
      resolve_backports: true,
    }
  }
}

/// PRs left out of generated entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
  /// Bot accounts whose PRs are dropped (default: ["github-actions"])
  #[serde(default = "default_bot_logins")]
  pub bot_logins: Vec<String>,

  /// Title prefixes of automated PRs
  #[serde(default = "default_title_prefixes")]
  pub title_prefixes: Vec<String>,
}

fn default_bot_logins() -> Vec<String> {
  vec!["github-actions".to_string()]
}

fn default_title_prefixes() -> Vec<String> {
  vec![PR_PREFIX.to_string(), PRECOMMIT_PREFIX.to_string()]
}

impl Default for FilterConfig {
  fn default() -> Self {
    Self {
      bot_logins: default_bot_logins(),
      title_prefixes: default_title_prefixes(),
    }
  }
}

impl FilterConfig {
  pub fn noise_filter(&self) -> NoiseFilter {
    NoiseFilter {
      bot_logins: self.bot_logins.clone(),
      title_prefixes: self.title_prefixes.clone(),
    }
  }
}

/// External programs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolConfig {
  /// GitHub CLI (default: "gh")
  #[serde(default = "default_gh")]
  pub gh: String,

  /// Merged-PR activity generator (default: "github-activity")
  #[serde(default = "default_activity")]
  pub activity: String,
}

fn default_gh() -> String {
  "gh".to_string()
}

fn default_activity() -> String {
  "github-activity".to_string()
}

impl Default for ToolConfig {
  fn default() -> Self {
    Self {
      gh: default_gh(),
      activity: default_activity(),
    }
  }
}

impl ChangelogConfig {
  /// Find config file in search order
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = vec![
      path.join("rail-changelog.toml"),
      path.join(".rail-changelog.toml"),
      path.join(".config").join("rail-changelog.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config, or `None` when no config file exists
  pub fn load(path: &Path) -> RailResult<Option<Self>> {
    let Some(config_path) = Self::find_config_path(path) else {
      return Ok(None);
    };

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config: ChangelogConfig = toml_edit::de::from_str(&content)
      .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

    Ok(Some(config))
  }
}
