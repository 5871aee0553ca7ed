//! Additional operations for SystemGit (tags, checkout, remotes)

use super::system_git::SystemGit;
use super::{RefHistory, is_stable_tag};
use crate::core::error::{GitError, RailError, RailResult, ResultExt};

impl SystemGit {
  /// Tags reachable from `source`, newest first by creation date
  pub fn tags_merged(&self, source: &str) -> RailResult<Vec<String>> {
    let stdout = self.run(&["--no-pager", "tag", "--sort=-creatordate", "--merged", source])?;

    Ok(
      stdout
        .lines()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect(),
    )
  }

  /// Check out a branch, tag, or commit
  pub fn checkout(&self, target: &str) -> RailResult<()> {
    self.run(&["checkout", target])?;
    Ok(())
  }

  /// Check out `branch`, resetting it to `start_point`
  pub fn checkout_reset(&self, branch: &str, start_point: &str) -> RailResult<()> {
    self.run(&["checkout", "-B", branch, start_point])?;
    Ok(())
  }

  /// Fetch a single branch with a blobless filter
  pub fn fetch_branch(&self, remote: &str, branch: &str) -> RailResult<()> {
    let output = self
      .git_cmd()
      .args(["fetch", remote, "--filter=blob:none", "--quiet", branch])
      .output()
      .context("Failed to fetch")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(RailError::Git(GitError::CommandFailed {
        command: format!("git fetch {} {}", remote, branch),
        stderr: stderr.to_string(),
      }));
    }

    Ok(())
  }

  /// List remote names
  pub fn list_remotes(&self) -> RailResult<Vec<String>> {
    let output = self
      .git_cmd()
      .args(["remote"])
      .output()
      .context("Failed to list remotes")?;

    if !output.status.success() {
      return Ok(vec![]);
    }

    Ok(
      String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect(),
    )
  }
}

impl RefHistory for SystemGit {
  fn latest_tag(&self, source: &str, stable_only: bool) -> RailResult<Option<String>> {
    let tags = self.tags_merged(source)?;

    let tag = if stable_only {
      tags.into_iter().find(|t| is_stable_tag(t))
    } else {
      tags.into_iter().next()
    };

    Ok(tag)
  }

  fn first_commit(&self, source: &str) -> RailResult<String> {
    let stdout = self.run(&["rev-list", "--max-parents=0", source])?;

    // Histories with merged unrelated roots list several; the oldest is last
    stdout
      .lines()
      .last()
      .map(|s| s.trim().to_string())
      .ok_or_else(|| RailError::message(format!("No root commit found for {}", source)))
  }
}
