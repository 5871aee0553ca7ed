//! Merging GitHub-generated release notes into an entry

use crate::core::error::{RailError, RailResult};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

const WHATS_CHANGED: &str = "## What's Changed";

static GITHUB_LINE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?m)^\* (.*?) by @.*?/pull/(\d+)$").expect("valid regex"));
static ENTRY_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^- (.*?) \[#(\d+)\]").expect("valid regex"));

/// Splice GitHub's release notes into a generated entry
///
/// PR titles from `github_notes` override the entry's titles, and any text the
/// release author wrote above `## What's Changed` is prepended with its
/// headings demoted below the entry's own.
pub fn splice_github_entry(entry: &str, github_notes: &str) -> RailResult<String> {
  let titles: HashMap<&str, &str> = GITHUB_LINE
    .captures_iter(github_notes)
    .filter_map(|caps| Some((caps.get(2)?.as_str(), caps.get(1)?.as_str())))
    .collect();

  let mut lines: Vec<String> = entry
    .lines()
    .map(|line| {
      let Some(caps) = ENTRY_LINE.captures(line) else {
        return line.to_string();
      };
      match titles.get(&caps[2]) {
        Some(title) => line.replacen(&caps[1], title, 1),
        None => line.to_string(),
      }
    })
    .collect();

  let index = github_notes
    .find(WHATS_CHANGED)
    .ok_or_else(|| RailError::message(format!("GitHub release notes have no \"{}\" section", WHATS_CHANGED)))?;

  let preamble = &github_notes[..index];
  if !preamble.trim().is_empty() {
    let mut spliced: Vec<String> = demote_headings(preamble);
    spliced.push(String::new());
    spliced.append(&mut lines);
    lines = spliced;
  }

  Ok(lines.join("\n"))
}

/// Shift headings so a leading `#` or `##` becomes `###`
fn demote_headings(preamble: &str) -> Vec<String> {
  let level = |line: &str| {
    let hashes = line.chars().take_while(|c| *c == '#').count();
    (hashes > 0 && line[hashes..].starts_with(' ')).then_some(hashes)
  };

  let shift = match preamble.lines().next().and_then(level) {
    Some(top @ 1..=2) => 3 - top,
    _ => 0,
  };

  preamble
    .lines()
    .map(|line| match level(line) {
      Some(_) if shift > 0 => format!("{}{}", "#".repeat(shift), line),
      _ => line.to_string(),
    })
    .collect()
}
