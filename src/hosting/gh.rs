//! GitHub access via the `gh` CLI

use super::{PullRequest, Release, ReleaseHost, RepoSlug};
use crate::core::error::{HostError, RailError, RailResult};
use serde::de::DeserializeOwned;
use std::process::Command;

/// [`ReleaseHost`] backed by `gh api`
pub struct GhCli {
  program: String,
  token: Option<String>,
}

impl GhCli {
  pub fn new(program: impl Into<String>, token: Option<String>) -> Self {
    Self {
      program: program.into(),
      token,
    }
  }

  /// GET an API path, returning `Ok(None)` on HTTP 404
  fn api<T: DeserializeOwned>(&self, path: &str) -> RailResult<Option<T>> {
    tracing::debug!("gh api {}", path);

    let mut cmd = Command::new(&self.program);
    cmd.args(["api", "-H", "Accept: application/vnd.github+json", path]);
    if let Some(token) = &self.token {
      cmd.env("GH_TOKEN", token);
    }

    let output = cmd.output().map_err(|e| {
      RailError::Host(HostError::ToolUnavailable {
        program: self.program.clone(),
        reason: e.to_string(),
      })
    })?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
      if is_not_found(&stderr) {
        return Ok(None);
      }
      return Err(RailError::Host(HostError::CommandFailed {
        command: format!("{} api {}", self.program, path),
        stderr,
      }));
    }

    decode(path, &output.stdout).map(Some)
  }
}

impl ReleaseHost for GhCli {
  fn get_pull_request(&self, repo: &RepoSlug, number: u64) -> RailResult<PullRequest> {
    let path = format!("repos/{}/pulls/{}", repo, number);
    self.api(&path)?.ok_or_else(|| {
      RailError::Host(HostError::InvalidResponse {
        resource: path,
        reason: "pull request not found".to_string(),
      })
    })
  }

  fn get_release_by_tag(&self, repo: &RepoSlug, tag: &str) -> RailResult<Option<Release>> {
    self.api(&format!("repos/{}/releases/tags/{}", repo, tag))
  }
}

fn is_not_found(stderr: &str) -> bool {
  stderr.contains("HTTP 404") || stderr.contains("Not Found")
}

fn decode<T: DeserializeOwned>(resource: &str, body: &[u8]) -> RailResult<T> {
  serde_json::from_slice(body).map_err(|e| {
    RailError::Host(HostError::InvalidResponse {
      resource: resource.to_string(),
      reason: e.to_string(),
    })
  })
}
