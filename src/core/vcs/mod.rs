pub mod system_git;
mod system_git_ops;

pub use system_git::SystemGit;

use crate::core::error::RailResult;

/// History queries the entry formatter needs to bound an activity range
pub trait RefHistory {
  /// Most recent tag reachable from `source`, newest first by creation date.
  /// With `stable_only`, tags with pre-release suffixes are skipped.
  fn latest_tag(&self, source: &str, stable_only: bool) -> RailResult<Option<String>>;

  /// Root commit of the repository
  fn first_commit(&self, source: &str) -> RailResult<String>;
}

/// True when a tag ends in a plain `major.minor.patch` version
///
/// `v1.2.3` and `pkg@1.2.3` qualify; `v1.2.3rc1`, `1.2.3-beta.1` and `1.2` do not.
pub fn is_stable_tag(tag: &str) -> bool {
  let start = tag
    .char_indices()
    .rev()
    .take_while(|(_, c)| c.is_ascii_digit() || *c == '.')
    .last()
    .map(|(i, _)| i);

  let Some(start) = start else {
    return false;
  };

  match semver::Version::parse(tag[start..].trim_start_matches('.')) {
    Ok(version) => version.pre.is_empty() && version.build.is_empty(),
    Err(_) => false,
  }
}
