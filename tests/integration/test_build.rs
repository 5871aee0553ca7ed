//! Integration tests for `rail-changelog build` and `rail-changelog check`

use crate::helpers::{END, TestRepo, current_entry, run_rail_changelog, run_rail_changelog_raw};
use anyhow::Result;

#[cfg(unix)]
const ACTIVITY: &str = "
## main@{2024-10-01}...main@{2024-12-01}

([full changelog](https://github.com/octo-org/widgets/compare/v1.0.0...None))

### Bugs fixed

- Fix widget [#10](https://github.com/octo-org/widgets/pull/10) ([@alice](https://github.com/alice))
- Backport PR #50 on branch 1.x (foo) [#51](https://github.com/octo-org/widgets/pull/51) ([@meeseeksmachine](https://github.com/meeseeksmachine))

### Maintenance and upkeep improvements

- Bump version [#11](https://github.com/octo-org/widgets/pull/11) ([@github-actions](https://github.com/github-actions))
- [pre-commit.ci] pre-commit autoupdate [#12](https://github.com/octo-org/widgets/pull/12) ([@pre-commit-ci](https://github.com/apps/pre-commit-ci))

### Contributors to this release

@alice
";

/// Repository with a v1.0.0 tag, one later commit, and stubbed gh/github-activity
#[cfg(unix)]
fn setup(activity: &str) -> Result<TestRepo> {
  let repo = TestRepo::new()?;
  repo.tag("v1.0.0")?;
  repo.write_file("src/widget.txt", "fixed")?;
  repo.commit("Fix widget")?;

  std::fs::write(repo.scratch("activity.md"), activity)?;
  let activity = repo.stub_tool(
    "github-activity",
    &format!(
      "echo \"$@\" > '{}'\ncat '{}'",
      repo.scratch("args.txt").display(),
      repo.scratch("activity.md").display()
    ),
  )?;
  let gh = repo.stub_tool(
    "gh",
    r#"case "$4" in
  repos/octo-org/widgets/pulls/50)
    echo '{"title":"foo","html_url":"https://github.com/octo-org/widgets/pull/50","user":{"login":"bar","html_url":"https://github.com/bar"}}'
    ;;
  *)
    echo "gh: Not Found (HTTP 404)" >&2
    exit 1
    ;;
esac"#,
  )?;
  repo.write_config(&gh, &activity)?;

  Ok(repo)
}

#[test]
#[cfg(unix)]
fn test_build_writes_filtered_entry() -> Result<()> {
  let repo = setup(ACTIVITY)?;

  let output = run_rail_changelog(&repo.path, &["build", "1.1.0"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(stdout.contains("entry for 1.1.0"), "stdout: {}", stdout);

  let doc = repo.read_changelog()?;
  let current = current_entry(&doc);
  assert!(current.starts_with("## 1.1.0\n\n([Full Changelog](https://github.com/octo-org/widgets/compare/v1.0.0))"));
  assert!(current.contains("- Fix widget [#10]"));
  assert!(current.contains("- foo [#50](https://github.com/octo-org/widgets/pull/50) ([@bar](https://github.com/bar))"));
  assert!(!current.contains("meeseeksmachine"));
  assert!(!current.contains("github-actions"));
  assert!(!current.contains("pre-commit"));

  // Previous entry is now history
  let end = doc.find(END).unwrap();
  assert!(doc[end..].contains("## 1.0.0"));

  let args = std::fs::read_to_string(repo.scratch("args.txt"))?;
  assert!(args.contains("octo-org/widgets"));
  assert!(args.contains("--since v1.0.0"));
  assert!(args.contains("--branch main"));

  Ok(())
}

#[test]
#[cfg(unix)]
fn test_rebuild_preserves_manual_edits() -> Result<()> {
  let repo = setup(ACTIVITY)?;
  run_rail_changelog(&repo.path, &["build", "1.1.0"])?;

  let edited = repo
    .read_changelog()?
    .replace("- Fix widget [#10]", "- Fix widget rendering on HiDPI screens [#10]");
  repo.write_changelog(&edited)?;

  // A new PR lands before the next run
  let more = ACTIVITY.replace(
    "### Maintenance",
    "- Add gadget [#99](https://github.com/octo-org/widgets/pull/99) ([@bob](https://github.com/bob))\n\n### Maintenance",
  );
  std::fs::write(repo.scratch("activity.md"), more)?;
  run_rail_changelog(&repo.path, &["build", "1.1.0"])?;

  let doc = repo.read_changelog()?;
  assert!(doc.contains("- Fix widget rendering on HiDPI screens [#10]"));
  assert!(!doc.contains("- Fix widget [#10]"));
  assert!(current_entry(&doc).contains("- Add gadget [#99]"));
  assert_eq!(doc.matches("## 1.1.0").count(), 1);

  // Same input again changes nothing
  run_rail_changelog(&repo.path, &["build", "1.1.0"])?;
  assert_eq!(repo.read_changelog()?, doc);

  Ok(())
}

#[test]
#[cfg(unix)]
fn test_build_without_prs() -> Result<()> {
  let repo = setup("")?;

  run_rail_changelog(&repo.path, &["build", "1.1.0"])?;

  assert_eq!(current_entry(&repo.read_changelog()?), "## 1.1.0\n\nNo merged PRs");
  Ok(())
}

#[test]
#[cfg(unix)]
fn test_build_dry_run_leaves_file_alone() -> Result<()> {
  let repo = setup(ACTIVITY)?;
  let before = repo.read_changelog()?;

  let output = run_rail_changelog(&repo.path, &["build", "1.1.0", "--dry-run"])?;

  assert!(String::from_utf8_lossy(&output.stdout).contains("## 1.1.0"));
  assert_eq!(repo.read_changelog()?, before);
  Ok(())
}

#[test]
#[cfg(unix)]
fn test_build_silent_placeholder() -> Result<()> {
  let repo = setup(ACTIVITY)?;

  run_rail_changelog(&repo.path, &["build", "1.1.0", "--silent"])?;

  let doc = repo.read_changelog()?;
  assert!(current_entry(&doc).contains("<!-- START SILENT CHANGELOG ENTRY -->\n\n## 1.1.0"));
  assert!(!doc.contains("[#10]"));
  Ok(())
}

#[test]
#[cfg(unix)]
fn test_check_passes_then_catches_missing_pr() -> Result<()> {
  let repo = setup(ACTIVITY)?;
  run_rail_changelog(&repo.path, &["build", "1.1.0"])?;

  let output_path = repo.scratch("entry.md");
  let output_arg = output_path.display().to_string();
  run_rail_changelog(&repo.path, &["check", "1.1.0", "--output", &output_arg])?;
  assert!(std::fs::read_to_string(&output_path)?.contains("## 1.1.0"));

  let doc = repo.read_changelog()?;
  let without_10: String = doc
    .lines()
    .filter(|line| !line.contains("[#10]"))
    .map(|line| format!("{}\n", line))
    .collect();
  repo.write_changelog(&without_10)?;

  let output = run_rail_changelog_raw(&repo.path, &["check", "1.1.0"])?;
  assert_eq!(output.status.code(), Some(3));
  assert!(String::from_utf8_lossy(&output.stderr).contains("Missing PR #10"));
  Ok(())
}

#[test]
fn test_build_requires_repo() -> Result<()> {
  let repo = TestRepo::new()?;

  let output = run_rail_changelog_raw(&repo.path, &["build", "1.1.0", "--branch", "main"])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(String::from_utf8_lossy(&output.stderr).contains("Missing required setting: repo"));
  Ok(())
}
