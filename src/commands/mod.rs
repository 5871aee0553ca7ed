//! CLI commands for rail-changelog
//!
//! ## Generating
//! - **build**: Generate the entry for a version and merge it into the changelog
//! - **check**: Verify the committed entry against freshly generated activity
//!
//! ## Editing
//! - **update**: Insert an externally written entry, e.g. a release body
//! - **extract**: Print the current entry or its version
//!
//! ## After a release
//! - **publish**: Replace silent placeholders whose releases are published
//! - **forwardport**: Carry a shipped entry onto the default branch
//!
//! All commands accept `&ChangelogContext` to avoid reloading config.

pub mod build;
pub mod check;
pub mod extract;
pub mod forwardport;
pub mod publish;
pub mod update;

pub use build::{EntryOptions, run_build};
pub use check::run_check;
pub use extract::run_extract;
pub use forwardport::run_forwardport;
pub use publish::run_publish;
pub use update::{EntrySource, run_update};
