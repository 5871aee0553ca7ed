//! Core building blocks shared by every command
//!
//! - **config**: rail-changelog.toml parsing
//! - **context**: repository root, config and changelog path, built once in main
//! - **error**: error types with contextual help messages and exit codes
//! - **vcs**: git operations (SystemGit) and the history queries entries need

pub mod config;
pub mod context;
pub mod error;
pub mod vcs;
