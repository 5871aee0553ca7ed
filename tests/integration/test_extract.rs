//! Integration tests for `rail-changelog extract`

use crate::helpers::{START, TestRepo, run_rail_changelog, run_rail_changelog_raw};
use anyhow::Result;

#[test]
fn test_extract_current_entry() -> Result<()> {
  let repo = TestRepo::new()?;

  let output = run_rail_changelog(&repo.path, &["extract"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  assert!(stdout.starts_with("## 1.0.0\n\n- Initial release [#1]"));
  assert!(!stdout.contains("0.1.0"));
  Ok(())
}

#[test]
fn test_extract_version_only() -> Result<()> {
  let repo = TestRepo::new()?;

  let output = run_rail_changelog(&repo.path, &["extract", "--version-only"])?;

  assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "1.0.0");
  Ok(())
}

#[test]
fn test_extract_from_custom_path() -> Result<()> {
  let repo = TestRepo::new()?;
  let doc = repo.read_changelog()?.replace("## 1.0.0", "## 3.1.4");
  repo.write_file("docs/CHANGES.md", &doc)?;

  let output = run_rail_changelog(&repo.path, &["extract", "--version-only", "--changelog", "docs/CHANGES.md"])?;
  assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "3.1.4");

  repo.write_file("rail-changelog.toml", "[changelog]\npath = \"docs/CHANGES.md\"\n")?;
  let output = run_rail_changelog(&repo.path, &["extract", "--version-only"])?;
  assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "3.1.4");
  Ok(())
}

#[test]
fn test_extract_without_markers() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.write_changelog("# Changelog\n\n## 1.0.0\n")?;

  // Entry extraction never fails; it is empty
  let output = run_rail_changelog(&repo.path, &["extract"])?;
  assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "");

  let output = run_rail_changelog_raw(&repo.path, &["extract", "--version-only"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(String::from_utf8_lossy(&output.stderr).contains("Could not find previous version"));
  Ok(())
}

#[test]
fn test_duplicate_marker_is_reported() -> Result<()> {
  let repo = TestRepo::new()?;
  let doc = format!("{}\n{}\n", repo.read_changelog()?, START);
  repo.write_changelog(&doc)?;
  repo.write_file("entry.md", "## 1.1.0\n\n- Fix [#10](u) ([@a](b))\n")?;

  let output = run_rail_changelog_raw(&repo.path, &["update", "--from-file", "entry.md"])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(String::from_utf8_lossy(&output.stderr).contains("more than once"));
  assert_eq!(repo.read_changelog()?, doc);
  Ok(())
}

#[test]
fn test_extract_from_subdirectory() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.write_file("docs/index.md", "# Widgets\n")?;

  let output = run_rail_changelog(&repo.path.join("docs"), &["extract", "--version-only"])?;

  assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "1.0.0");
  Ok(())
}
