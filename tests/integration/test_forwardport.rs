//! Integration tests for `rail-changelog forwardport`

use crate::helpers::{END, TestRepo, changelog, current_entry, git, run_rail_changelog};
use anyhow::Result;

const PATCH: &str = "## 1.0.1\n\n- Patch fix [#5](https://github.com/octo-org/widgets/pull/5) ([@bob](https://github.com/bob))";
const HISTORY: &str = "## 1.0.0\n\n- Initial release [#1](https://github.com/octo-org/widgets/pull/1) ([@alice](https://github.com/alice))\n\n## 0.1.0\n\nFirst preview";

/// Repository with a 1.x maintenance branch that shipped v1.0.1
fn setup() -> Result<TestRepo> {
  let repo = TestRepo::new()?;
  repo.tag("v1.0.0")?;

  repo.checkout(&["-b", "1.x"])?;
  repo.write_changelog(&changelog(PATCH, HISTORY))?;
  repo.commit("Release 1.0.1")?;
  repo.tag("v1.0.1")?;

  Ok(repo)
}

fn head_branch(repo: &TestRepo) -> Result<String> {
  let output = git(&repo.path, &["rev-parse", "--abbrev-ref", "HEAD"])?;
  Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

#[test]
fn test_forwardport_without_divergence() -> Result<()> {
  let repo = setup()?;

  run_rail_changelog(&repo.path, &["forwardport", "v1.0.1", "--branch", "main", "--no-fetch"])?;

  assert_eq!(head_branch(&repo)?, "main");
  let doc = repo.read_changelog()?;
  assert_eq!(current_entry(&doc), PATCH);
  let end = doc.find(END).unwrap();
  assert!(doc[end..].starts_with(&format!("{}\n\n## 1.0.0", END)));
  assert_eq!(doc.matches("## 1.0.0").count(), 1);
  Ok(())
}

#[test]
fn test_forwardport_onto_newer_branch() -> Result<()> {
  let repo = setup()?;
  repo.checkout(&["main"])?;
  repo.write_changelog(&changelog(
    "## 2.0.0\n\n- Big change [#9](https://github.com/octo-org/widgets/pull/9) ([@alice](https://github.com/alice))",
    HISTORY,
  ))?;
  repo.commit("Release 2.0.0")?;
  repo.write_file(
    "rail-changelog.toml",
    "[repository]\nrepo = \"octo-org/widgets\"\ndefault_branch = \"main\"\n",
  )?;

  let output = run_rail_changelog(&repo.path, &["forwardport", "v1.0.1"])?;
  assert!(String::from_utf8_lossy(&output.stdout).contains("Updated CHANGELOG.md on main"));

  let doc = repo.read_changelog()?;
  assert!(current_entry(&doc).starts_with("## 2.0.0"));
  let i_200 = doc.find("## 2.0.0").unwrap();
  let i_101 = doc.find("## 1.0.1").unwrap();
  let i_100 = doc.find("## 1.0.0").unwrap();
  assert!(i_200 < i_101 && i_101 < i_100);
  assert!(doc.contains(&format!("{}\n\n## 1.0.0", PATCH)));
  Ok(())
}

#[test]
fn test_forwardport_already_merged() -> Result<()> {
  let repo = setup()?;
  repo.checkout(&["main"])?;
  let before = repo.read_changelog()?;

  let output = run_rail_changelog(&repo.path, &["forwardport", "v1.0.0", "--branch", "main", "--no-fetch"])?;

  assert!(String::from_utf8_lossy(&output.stdout).contains("already merged"));
  assert_eq!(repo.read_changelog()?, before);
  Ok(())
}

#[test]
fn test_forwardport_dry_run() -> Result<()> {
  let repo = setup()?;
  repo.checkout(&["main"])?;
  let before = repo.read_changelog()?;

  let output = run_rail_changelog(
    &repo.path,
    &["forwardport", "v1.0.1", "--branch", "main", "--no-fetch", "--dry-run"],
  )?;

  assert!(String::from_utf8_lossy(&output.stdout).contains("DRY RUN"));
  assert_eq!(repo.read_changelog()?, before);
  Ok(())
}

#[test]
fn test_forwardport_missing_anchor() -> Result<()> {
  let repo = setup()?;
  repo.checkout(&["main"])?;
  repo.write_changelog(&changelog("## 2.0.0\n\n- Rewrite", "## Older releases\n\nSee the wiki"))?;
  repo.commit("Rewrite history")?;
  let before = repo.read_changelog()?;

  let output = run_rail_changelog(&repo.path, &["forwardport", "v1.0.1", "--branch", "main", "--no-fetch"])?;

  assert!(String::from_utf8_lossy(&output.stdout).contains("Could not find \"## 1.0.0\""));
  assert_eq!(repo.read_changelog()?, before);
  Ok(())
}

#[test]
fn test_forwardport_twice_keeps_one_entry() -> Result<()> {
  let repo = setup()?;
  repo.checkout(&["main"])?;
  repo.write_changelog(&changelog("## 2.0.0\n\n- Big change", HISTORY))?;
  repo.commit("Release 2.0.0")?;

  run_rail_changelog(&repo.path, &["forwardport", "v1.0.1", "--branch", "main", "--no-fetch"])?;
  repo.commit("Forward-port 1.0.1 changelog")?;
  let once = repo.read_changelog()?;

  // The tag is still not merged into main, so only the entry itself can tell
  let output = run_rail_changelog(&repo.path, &["forwardport", "v1.0.1", "--branch", "main", "--no-fetch"])?;

  assert!(String::from_utf8_lossy(&output.stdout).contains("nothing to do"));
  assert_eq!(repo.read_changelog()?, once);
  assert_eq!(once.matches("## 1.0.1").count(), 1);
  Ok(())
}
