//! Version entries and pull-request bullet lines

use super::document::extract_version;
use crate::core::error::RailResult;
use crate::hosting::PullRequest;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static PR_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[#(\d+)\]").expect("valid regex"));

/// One merged pull request as rendered in a changelog
///
/// Renders as `- {title} [#{number}]({url}) ([@{author}]({author_url}))`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrReference {
  pub title: String,
  pub number: u64,
  pub url: String,
  pub author: String,
  pub author_url: String,
}

impl PrReference {
  pub fn from_pull(number: u64, pull: &PullRequest) -> Self {
    Self {
      title: pull.title.clone(),
      number,
      url: pull.html_url.clone(),
      author: pull.user.login.clone(),
      author_url: pull.user.html_url.clone(),
    }
  }
}

impl fmt::Display for PrReference {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "- {} [#{}]({}) ([@{}]({}))",
      self.title, self.number, self.url, self.author, self.author_url
    )
  }
}

/// The first `[#N]` token on a line, e.g. `[#14]`
pub fn pr_token(line: &str) -> Option<&str> {
  PR_TOKEN.find(line).map(|m| m.as_str())
}

/// Every PR number referenced in `text`, in order of first appearance
pub fn pr_numbers(text: &str) -> Vec<u64> {
  let mut numbers: Vec<u64> = Vec::new();
  for caps in PR_TOKEN.captures_iter(text) {
    if let Ok(number) = caps[1].parse::<u64>()
      && !numbers.contains(&number)
    {
      numbers.push(number);
    }
  }
  numbers
}

/// The changelog section for one release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionEntry {
  pub version: String,
  /// Lines after the header, blank lines included
  pub body: Vec<String>,
}

impl VersionEntry {
  /// Parse an entry whose first non-blank line is its `#+ <version>` header
  pub fn parse(text: &str) -> RailResult<Self> {
    let version = extract_version(text)?;
    let body = text
      .trim()
      .lines()
      .skip(1)
      .map(str::to_string)
      .collect();

    Ok(Self { version, body })
  }

  /// PR numbers referenced anywhere in the entry
  pub fn pull_requests(&self) -> Vec<u64> {
    pr_numbers(&self.body.join("\n"))
  }
}
