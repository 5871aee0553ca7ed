//! Integration tests for `rail-changelog update`

use crate::helpers::{END, TestRepo, current_entry, run_rail_changelog};
use anyhow::Result;

const ENTRY: &str = "## 1.1.0

### Bugs fixed

- Fix widget [#10](https://github.com/octo-org/widgets/pull/10) ([@alice](https://github.com/alice))
";

const NOTES: &str = "# Highlights

Widgets now render correctly on every screen.

## What's Changed
* Fix widget rendering on HiDPI screens by @alice in https://github.com/octo-org/widgets/pull/10

**Full Changelog**: https://github.com/octo-org/widgets/compare/v1.0.0...v1.1.0
";

#[test]
fn test_update_from_file() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.write_file("entry.md", ENTRY)?;

  run_rail_changelog(&repo.path, &["update", "--from-file", "entry.md"])?;

  let doc = repo.read_changelog()?;
  assert_eq!(current_entry(&doc), ENTRY.trim());
  let end = doc.find(END).unwrap();
  assert!(doc[end..].contains("## 1.0.0\n\n- Initial release"));

  // Inserting the same entry again keeps a single copy
  run_rail_changelog(&repo.path, &["update", "--from-file", "entry.md"])?;
  assert_eq!(repo.read_changelog()?, doc);
  Ok(())
}

#[test]
fn test_update_with_github_notes() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.write_file("entry.md", ENTRY)?;
  repo.write_file("notes.md", NOTES)?;

  run_rail_changelog(
    &repo.path,
    &["update", "--from-file", "entry.md", "--github-notes", "notes.md"],
  )?;

  let doc = repo.read_changelog()?;
  let current = current_entry(&doc);
  assert!(current.starts_with("## 1.1.0\n\n### Highlights\n\nWidgets now render correctly"));
  assert!(current.contains("- Fix widget rendering on HiDPI screens [#10]"));
  assert!(!current.contains("What's Changed"));

  let output = run_rail_changelog(&repo.path, &["extract", "--version-only"])?;
  assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "1.1.0");
  Ok(())
}

#[test]
fn test_update_dry_run() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.write_file("entry.md", ENTRY)?;
  let before = repo.read_changelog()?;

  let output = run_rail_changelog(&repo.path, &["update", "--from-file", "entry.md", "--dry-run"])?;

  assert!(String::from_utf8_lossy(&output.stdout).contains("- Fix widget [#10]"));
  assert_eq!(repo.read_changelog()?, before);
  Ok(())
}

#[test]
fn test_update_replaces_same_version() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.write_file(
    "entry.md",
    "## 1.0.0\n\n- Initial release, now documented [#1](https://github.com/octo-org/widgets/pull/1) ([@alice](https://github.com/alice))\n- Late fix [#2](https://github.com/octo-org/widgets/pull/2) ([@bob](https://github.com/bob))\n",
  )?;

  run_rail_changelog(&repo.path, &["update", "--from-file", "entry.md"])?;

  let doc = repo.read_changelog()?;
  // Existing lines win over regenerated ones for the same PR
  assert!(doc.contains("- Initial release [#1]"));
  assert!(!doc.contains("now documented"));
  assert!(doc.contains("- Late fix [#2]"));
  assert_eq!(doc.matches("## 1.0.0").count(), 1);
  Ok(())
}
