//! Merged-PR activity via the `github-activity` tool

use super::{ActivityQuery, ActivitySource};
use crate::core::error::{HostError, RailError, RailResult};
use std::process::Command;

/// [`ActivitySource`] backed by the `github-activity` command line tool
pub struct GithubActivityCli {
  program: String,
}

impl GithubActivityCli {
  pub fn new(program: impl Into<String>) -> Self {
    Self {
      program: program.into(),
    }
  }

  fn args(query: &ActivityQuery<'_>) -> Vec<String> {
    let mut args = vec![
      query.repo.to_string(),
      "--since".to_string(),
      query.since.to_string(),
      "--kind".to_string(),
      "pr".to_string(),
      "--heading-level".to_string(),
      query.heading_level.to_string(),
      "--branch".to_string(),
      query.branch.to_string(),
    ];

    if let Some(until) = query.until {
      args.push("--until".to_string());
      args.push(until.to_string());
    }

    args
  }

  fn command(&self, query: &ActivityQuery<'_>) -> Command {
    let mut cmd = Command::new(&self.program);
    cmd.args(Self::args(query));
    // Token stays off argv
    if let Some(auth) = query.auth {
      cmd.env("GITHUB_ACCESS_TOKEN", auth);
    }
    cmd
  }
}

impl ActivitySource for GithubActivityCli {
  fn generate_activity(&self, query: &ActivityQuery<'_>) -> RailResult<String> {
    let output = self
      .command(query)
      .output()
      .map_err(|e| {
        RailError::Host(HostError::ToolUnavailable {
          program: self.program.clone(),
          reason: e.to_string(),
        })
      })?;

    if !output.status.success() {
      return Err(RailError::Host(HostError::CommandFailed {
        command: format!("{} {} --since {}", self.program, query.repo, query.since),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
      }));
    }

    let markdown = String::from_utf8_lossy(&output.stdout).into_owned();
    if markdown.trim().is_empty() {
      return Ok(String::new());
    }
    Ok(markdown)
  }
}
