//! Integration tests for `rail-changelog publish`

#![cfg(unix)]

use crate::helpers::{END_SILENT, START_SILENT, TestRepo, changelog, current_entry, run_rail_changelog};
use anyhow::Result;

/// Repository whose current entry is a silent 1.1.0 placeholder, with gh answering for v1.1.0
fn setup(release_json: Option<&str>) -> Result<TestRepo> {
  let repo = TestRepo::new()?;
  repo.write_changelog(&changelog(
    &format!("{}\n\n## 1.1.0\n\n{}", START_SILENT, END_SILENT),
    "## 1.0.0\n\n- Initial release\n\n## 0.1.0\n\nFirst preview",
  ))?;

  let script = match release_json {
    Some(json) => format!(
      r#"case "$4" in
  repos/octo-org/widgets/releases/tags/v1.1.0)
    printf '%s\n' '{}'
    ;;
  *)
    echo "gh: Not Found (HTTP 404)" >&2
    exit 1
    ;;
esac"#,
      json
    ),
    None => "echo \"gh: Not Found (HTTP 404)\" >&2\nexit 1".to_string(),
  };
  let gh = repo.stub_tool("gh", &script)?;
  repo.write_config(&gh, &gh)?;

  Ok(repo)
}

#[test]
fn test_publish_replaces_placeholder() -> Result<()> {
  let repo = setup(Some(r###"{"tag_name":"v1.1.0","draft":false,"body":"## 1.1.0\r\n\r\n- Shipped"}"###))?;

  let output = run_rail_changelog(&repo.path, &["publish"])?;
  assert!(String::from_utf8_lossy(&output.stdout).contains("Replaced 1 silent entry"));

  let doc = repo.read_changelog()?;
  assert_eq!(current_entry(&doc), "## 1.1.0\n\n- Shipped");
  assert!(!doc.contains(START_SILENT));
  assert!(!doc.contains('\r'));
  Ok(())
}

#[test]
fn test_publish_dry_run() -> Result<()> {
  let repo = setup(Some(r#"{"tag_name":"v1.1.0","draft":false,"body":"B"}"#))?;
  let before = repo.read_changelog()?;

  let output = run_rail_changelog(&repo.path, &["publish", "--dry-run"])?;

  assert!(String::from_utf8_lossy(&output.stdout).contains("Would replace 1 silent entry"));
  assert_eq!(repo.read_changelog()?, before);
  Ok(())
}

#[test]
fn test_publish_skips_draft() -> Result<()> {
  let repo = setup(Some(r#"{"tag_name":"v1.1.0","draft":true,"body":"B"}"#))?;
  let before = repo.read_changelog()?;

  let output = run_rail_changelog(&repo.path, &["publish"])?;

  assert!(String::from_utf8_lossy(&output.stdout).contains("No silent entries"));
  assert_eq!(repo.read_changelog()?, before);
  Ok(())
}

#[test]
fn test_publish_without_release() -> Result<()> {
  let repo = setup(None)?;
  let before = repo.read_changelog()?;

  run_rail_changelog(&repo.path, &["publish"])?;

  assert_eq!(repo.read_changelog()?, before);
  Ok(())
}
