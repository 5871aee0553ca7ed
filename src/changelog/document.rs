//! Marker document model
//!
//! A changelog is plain markdown with one mutable region, the current entry,
//! fenced by [`START_MARKER`] and [`END_MARKER`]. Everything below the end
//! marker is history. Silent placeholders are fenced the same way with
//! [`START_SILENT_MARKER`] and [`END_SILENT_MARKER`] and may appear anywhere.

use super::{END_MARKER, END_SILENT_MARKER, START_MARKER, START_SILENT_MARKER};
use crate::core::error::{DocumentError, RailResult, ResultExt};
use regex::Regex;
use std::io::Write;
use std::ops::Range;
use std::path::Path;
use std::sync::LazyLock;

static BLANK_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{2,}").expect("valid regex"));
static VERSION_HEADER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#+ (\d\S+)").expect("valid regex"));

/// Byte offsets of the current-entry sentinels within a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerSpan {
  /// Offset of the start sentinel
  pub start: usize,
  /// Offset of the end sentinel
  pub end: usize,
}

impl MarkerSpan {
  /// Text strictly between the sentinels
  pub fn inner(&self) -> Range<usize> {
    self.start + START_MARKER.len()..self.end
  }

  /// The sentinels and everything between them
  pub fn outer(&self) -> Range<usize> {
    self.start..self.end + END_MARKER.len()
  }
}

/// Find the unique current-entry sentinel pair
pub fn locate_current_entry(doc: &str) -> RailResult<MarkerSpan> {
  let (Some(start), Some(end)) = (doc.find(START_MARKER), doc.find(END_MARKER)) else {
    return Err(DocumentError::MissingMarkers.into());
  };

  check_unique_markers(doc)?;
  if end < start + START_MARKER.len() {
    return Err(DocumentError::MisorderedMarkers.into());
  }

  Ok(MarkerSpan { start, end })
}

/// Fail when either current-entry sentinel appears more than once
///
/// Documents without sentinels pass.
pub fn check_unique_markers(doc: &str) -> RailResult<()> {
  for marker in [START_MARKER, END_MARKER] {
    if doc.matches(marker).count() > 1 {
      return Err(DocumentError::DuplicateMarker { marker }.into());
    }
  }
  Ok(())
}

/// Text between the sentinels, or an empty string when there is none
///
/// Never fails; used to probe whether there is a current entry at all.
pub fn extract_current(doc: &str) -> String {
  match (doc.find(START_MARKER), doc.find(END_MARKER)) {
    (Some(start), Some(end)) if end >= start + START_MARKER.len() => doc[start + START_MARKER.len()..end].to_string(),
    _ => String::new(),
  }
}

/// Replace the text between the sentinels, keeping the sentinels themselves
pub fn replace_current(doc: &str, new_text: &str) -> RailResult<String> {
  let span = locate_current_entry(doc)?;
  let inner = span.inner();
  Ok(format!("{}{}{}", &doc[..inner.start], new_text, &doc[inner.end..]))
}

/// Collapse runs of blank lines to one and end the document with a single newline
pub fn normalize(doc: &str) -> String {
  let mut out = BLANK_RUN.replace_all(doc, "\n\n").into_owned();
  if out.ends_with("\n\n") {
    out.truncate(out.trim_end_matches('\n').len());
    out.push('\n');
  }
  out
}

/// Number of silent start and end sentinels
pub fn count_placeholders(doc: &str) -> (usize, usize) {
  (doc.matches(START_SILENT_MARKER).count(), doc.matches(END_SILENT_MARKER).count())
}

/// Number of silent placeholder pairs, failing when the sentinels are unbalanced
pub fn check_placeholders(doc: &str) -> RailResult<usize> {
  let (starts, ends) = count_placeholders(doc);
  if starts != ends {
    return Err(DocumentError::UnbalancedPlaceholders { starts, ends }.into());
  }
  Ok(starts)
}

/// Version from the leading `#+ <version>` header of an entry
pub fn extract_version(entry: &str) -> RailResult<String> {
  let trimmed = entry.trim();
  VERSION_HEADER
    .captures(trimmed)
    .map(|caps| caps[1].to_string())
    .ok_or_else(|| {
      DocumentError::UnparsableVersion {
        excerpt: trimmed.lines().next().unwrap_or_default().to_string(),
      }
      .into()
    })
}

/// Read a changelog file
pub fn read_changelog(path: &Path) -> RailResult<String> {
  std::fs::read_to_string(path).with_context(|| format!("Failed to read changelog {}", path.display()))
}

/// Write a changelog file in one step
///
/// The new content goes to a temporary file beside the target which is then
/// renamed over it, so an interrupted run leaves the old file intact.
pub fn write_changelog(path: &Path, content: &str) -> RailResult<()> {
  let dir = match path.parent() {
    Some(parent) if !parent.as_os_str().is_empty() => parent,
    _ => Path::new("."),
  };

  let mut tmp =
    tempfile::NamedTempFile::new_in(dir).with_context(|| format!("Failed to stage write to {}", path.display()))?;
  tmp
    .write_all(content.as_bytes())
    .with_context(|| format!("Failed to write {}", path.display()))?;

  // Temp files are created owner-only; keep the mode of the file being replaced
  if let Ok(metadata) = std::fs::metadata(path) {
    tmp
      .as_file()
      .set_permissions(metadata.permissions())
      .with_context(|| format!("Failed to set permissions on {}", path.display()))?;
  }
  tmp
    .persist(path)
    .with_context(|| format!("Failed to replace {}", path.display()))?;
  Ok(())
}

/// Current entry of a changelog file; empty when the file or markers are missing
pub fn read_current_entry(path: Option<&Path>) -> String {
  let Some(path) = path else {
    return String::new();
  };

  match std::fs::read_to_string(path) {
    Ok(doc) => extract_current(&doc),
    Err(e) => {
      if e.kind() != std::io::ErrorKind::NotFound {
        tracing::warn!("Could not read {}: {}", path.display(), e);
      }
      String::new()
    }
  }
}

/// Version of the current entry of a changelog file
///
/// Unlike [`read_current_entry`], a malformed document is an error.
pub fn read_current_version(path: &Path) -> RailResult<String> {
  let doc = read_changelog(path)?;
  locate_current_entry(&doc)
    .and_then(|span| extract_version(&doc[span.inner()]))
    .with_context(|| format!("Could not find previous version in {}", path.display()))
}
