//! Shared command context - build once, pass everywhere
//!
//! ```text
//! main.rs:
//!   ChangelogContext::build() -> &ChangelogContext
//!   |
//!   v
//! commands/build.rs, check.rs, etc:
//!   fn run_*(ctx: &ChangelogContext, ...)
//! ```

use crate::core::config::ChangelogConfig;
use crate::core::error::{ConfigError, RailError, RailResult};
use crate::core::vcs::SystemGit;
use crate::hosting::RepoSlug;
use std::path::{Path, PathBuf};

/// Repository root, configuration, and the changelog they point at
#[derive(Debug, Clone)]
pub struct ChangelogContext {
  /// Repository root directory
  pub root: PathBuf,

  /// Loaded configuration, or defaults when no config file exists
  pub config: ChangelogConfig,

  /// Changelog path relative to `root`
  pub changelog: PathBuf,
}

impl ChangelogContext {
  /// Build context from a root directory, with an optional changelog override
  pub fn build(root: &Path, changelog: Option<&Path>) -> RailResult<Self> {
    let config = ChangelogConfig::load(root)?.unwrap_or_default();
    let changelog = changelog
      .map(Path::to_path_buf)
      .unwrap_or_else(|| config.changelog.path.clone());

    Ok(Self {
      root: root.to_path_buf(),
      config,
      changelog,
    })
  }

  /// Absolute changelog path
  pub fn changelog_path(&self) -> PathBuf {
    self.root.join(&self.changelog)
  }

  /// Repository slug from the command line, falling back to config
  pub fn repo(&self, explicit: Option<&str>) -> RailResult<RepoSlug> {
    explicit
      .or(self.config.repository.repo.as_deref())
      .ok_or_else(|| {
        RailError::Config(ConfigError::MissingField {
          field: "repo".to_string(),
        })
      })?
      .parse()
  }

  /// Branch from the command line, falling back to config
  pub fn branch(&self, explicit: Option<&str>) -> RailResult<String> {
    explicit
      .or(self.config.repository.default_branch.as_deref())
      .map(str::to_string)
      .ok_or_else(|| {
        RailError::Config(ConfigError::MissingField {
          field: "branch".to_string(),
        })
      })
  }
}

/// Top level of the git checkout containing `cwd`, or `cwd` outside one
///
/// Every command resolves the changelog and config against this directory, so
/// running from a subdirectory touches the same files as running at the top.
pub fn discover_root(cwd: &Path) -> PathBuf {
  match SystemGit::open(cwd) {
    Ok(git) => git.work_tree().to_path_buf(),
    Err(e) => {
      tracing::debug!("Using {} as root: {}", cwd.display(), e);
      cwd.to_path_buf()
    }
  }
}
