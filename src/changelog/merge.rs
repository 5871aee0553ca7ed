//! Inserting and updating the current entry
//!
//! Generation is re-run many times over a release cycle. When the current
//! entry already belongs to the version being generated, lines are merged by
//! PR number so hand-edited bullets survive while newly merged PRs still show
//! up. Otherwise the old entry drops below the end marker and becomes history.

use super::document::{
  extract_version, locate_current_entry, normalize, read_changelog, replace_current, write_changelog,
};
use super::entry::pr_token;
use super::placeholder::format_release_body;
use super::{END_MARKER, END_SILENT_MARKER, START_MARKER, START_SILENT_MARKER};
use crate::core::error::{ConfigError, RailError, RailResult, ResultExt};
use std::path::Path;
use tracing::debug;

/// Insert `entry` as the current entry of `doc`
///
/// With `version` set and an existing current entry headed `# {version}`, the
/// two are merged line by line: a generated line referencing `[#N]` is
/// replaced by the existing line referencing the same PR. Without a version
/// the new entry always takes over the current region.
///
/// `silent` swaps the entry for an empty placeholder that is filled in once
/// the release is published; it needs a version.
pub fn insert_entry(doc: &str, entry: &str, version: Option<&str>, silent: bool) -> RailResult<String> {
  let span = locate_current_entry(doc)?;

  let entry = if silent {
    let version = version.ok_or_else(|| {
      RailError::Config(ConfigError::MissingField {
        field: "version".to_string(),
      })
    })?;
    format!("{}\n\n## {}\n\n{}", START_SILENT_MARKER, version, END_SILENT_MARKER)
  } else {
    entry.to_string()
  };

  let new_region = format!("{}\n\n{}\n\n{}", START_MARKER, entry, END_MARKER);
  let prev_region = &doc[span.outer()];

  let same_version = version.is_some_and(|v| prev_region.contains(&format!("# {}\n", v)));

  let updated = if same_version {
    debug!("Merging into existing entry for {}", version.unwrap_or_default());
    replace_current(doc, &format!("\n\n{}\n\n", merge_lines(&entry, prev_region)))?
  } else {
    // The old end marker goes; the old entry stays in place below the new one
    format!(
      "{}{}{}{}",
      &doc[..span.start],
      new_region,
      &doc[span.inner()],
      &doc[span.outer().end..]
    )
  };

  Ok(normalize(&updated))
}

/// Generated lines, with PR bullets swapped for their existing counterparts
fn merge_lines(entry: &str, prev_region: &str) -> String {
  let old_lines: Vec<&str> = prev_region.lines().collect();

  entry
    .lines()
    .map(|line| {
      let Some(token) = pr_token(line) else {
        return line;
      };
      // Last match wins when a PR is mentioned more than once
      old_lines
        .iter()
        .rev()
        .find(|old| old.contains(token))
        .copied()
        .unwrap_or(line)
    })
    .collect::<Vec<_>>()
    .join("\n")
}

/// Insert `entry` into the changelog at `path` and write it back
///
/// The version defaults to the one in the entry's own header.
pub fn update_changelog(path: &Path, entry: &str, version: Option<&str>, silent: bool) -> RailResult<()> {
  let doc = read_changelog(path)?;

  let version = match version {
    Some(v) => v.to_string(),
    None => extract_version(entry)?,
  };

  let updated = insert_entry(&doc, entry, Some(&version), silent)
    .with_context(|| format!("Failed to update {}", path.display()))?;
  write_changelog(path, &updated)
}

/// Insert externally written entry text, such as a release body
///
/// Line endings are normalized and surrounding whitespace dropped before the
/// text is merged like any generated entry.
pub fn update_changelog_from_text(path: &Path, text: &str, version: Option<&str>) -> RailResult<()> {
  let entry = format_release_body(text);
  update_changelog(path, &entry, version, false)
}
