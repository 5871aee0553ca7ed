//! Error types for rail-changelog with contextual messages and exit codes
//!
//! Every fatal condition names the offending marker, version, or path. Document
//! errors are never auto-repaired: the changelog is a human-maintained file and
//! guessing risks corrupting it.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for rail-changelog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, invalid args, malformed changelog)
  User = 1,
  /// System error (git, hosting service, I/O)
  System = 2,
  /// Validation failure (changelog entry does not match PR activity)
  Validation = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for rail-changelog
#[derive(Debug)]
pub enum RailError {
  /// Malformed changelog document
  Document(DocumentError),

  /// Entry cross-check failures
  Validation(ValidationError),

  /// Release-hosting or activity collaborator errors
  Host(HostError),

  /// Git operation errors
  Git(GitError),

  /// Configuration errors
  Config(ConfigError),

  /// I/O errors
  Io(io::Error),

  /// A typed error wrapped with the operation that produced it
  Contextual { context: String, source: Box<RailError> },

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl RailError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    RailError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    RailError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  ///
  /// Messages absorb the context; typed errors are wrapped so callers can still
  /// match on them through [`RailError::root`].
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      RailError::Message { message, context, help } => RailError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      other => RailError::Contextual {
        context: ctx_str,
        source: Box::new(other),
      },
    }
  }

  /// Innermost error, skipping any context wrappers
  pub fn root(&self) -> &RailError {
    match self {
      RailError::Contextual { source, .. } => source.root(),
      other => other,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      RailError::Document(_) => ExitCode::User,
      RailError::Validation(_) => ExitCode::Validation,
      RailError::Host(_) => ExitCode::System,
      RailError::Git(_) => ExitCode::System,
      RailError::Config(_) => ExitCode::User,
      RailError::Io(_) => ExitCode::System,
      RailError::Contextual { source, .. } => source.exit_code(),
      RailError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      RailError::Document(e) => e.help_message(),
      RailError::Validation(e) => e.help_message(),
      RailError::Host(e) => e.help_message(),
      RailError::Git(e) => e.help_message(),
      RailError::Config(e) => e.help_message(),
      RailError::Contextual { source, .. } => source.help_message(),
      RailError::Message { help, .. } => help.clone(),
      RailError::Io(_) => None,
    }
  }
}

impl fmt::Display for RailError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      RailError::Document(e) => write!(f, "{}", e),
      RailError::Validation(e) => write!(f, "{}", e),
      RailError::Host(e) => write!(f, "{}", e),
      RailError::Git(e) => write!(f, "{}", e),
      RailError::Config(e) => write!(f, "{}", e),
      RailError::Io(e) => write!(f, "I/O error: {}", e),
      RailError::Contextual { context, source } => write!(f, "{}\n{}", source, context),
      RailError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for RailError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      RailError::Io(e) => Some(e),
      RailError::Contextual { source, .. } => Some(source.as_ref()),
      _ => None,
    }
  }
}

impl From<io::Error> for RailError {
  fn from(err: io::Error) -> Self {
    RailError::Io(err)
  }
}

impl From<DocumentError> for RailError {
  fn from(err: DocumentError) -> Self {
    RailError::Document(err)
  }
}

impl From<ValidationError> for RailError {
  fn from(err: ValidationError) -> Self {
    RailError::Validation(err)
  }
}

impl From<HostError> for RailError {
  fn from(err: HostError) -> Self {
    RailError::Host(err)
  }
}

impl From<toml_edit::de::Error> for RailError {
  fn from(err: toml_edit::de::Error) -> Self {
    RailError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<tempfile::PersistError> for RailError {
  fn from(err: tempfile::PersistError) -> Self {
    RailError::Io(err.error)
  }
}

/// Changelog document errors (missing or duplicated sentinels, bad headers)
#[derive(Debug)]
pub enum DocumentError {
  /// Start or end sentinel is absent
  MissingMarkers,

  /// A sentinel that must be unique appears more than once
  DuplicateMarker { marker: &'static str },

  /// The end sentinel precedes the start sentinel
  MisorderedMarkers,

  /// Silent placeholder start/end sentinels are not balanced
  UnbalancedPlaceholders { starts: usize, ends: usize },

  /// No `#+ <version>` header where one is required
  UnparsableVersion { excerpt: String },

  /// No header follows the end sentinel, so there is nothing to anchor on
  MissingAnchor,
}

impl DocumentError {
  fn help_message(&self) -> Option<String> {
    match self {
      DocumentError::MissingMarkers => Some(format!(
        "Add the markers around the current entry:\n  {}\n  {}",
        crate::changelog::START_MARKER,
        crate::changelog::END_MARKER
      )),
      DocumentError::DuplicateMarker { .. } => {
        Some("Keep a single marker pair; older entries belong below the end marker.".to_string())
      }
      DocumentError::MisorderedMarkers => Some(format!(
        "{} must come before {}.",
        crate::changelog::START_MARKER,
        crate::changelog::END_MARKER
      )),
      DocumentError::UnbalancedPlaceholders { .. } => Some(format!(
        "Every {} needs a matching {}.",
        crate::changelog::START_SILENT_MARKER,
        crate::changelog::END_SILENT_MARKER
      )),
      DocumentError::UnparsableVersion { .. } => {
        Some("Entries must start with a header such as `## 1.2.3`.".to_string())
      }
      DocumentError::MissingAnchor => None,
    }
  }
}

impl fmt::Display for DocumentError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      DocumentError::MissingMarkers => write!(f, "Missing insert marker for changelog"),
      DocumentError::DuplicateMarker { marker } => {
        write!(f, "Insert marker appears more than once in changelog: {}", marker)
      }
      DocumentError::MisorderedMarkers => write!(f, "Changelog end marker appears before the start marker"),
      DocumentError::UnbalancedPlaceholders { starts, ends } => write!(
        f,
        "Unbalanced silent changelog markers: {} start marker(s), {} end marker(s)",
        starts, ends
      ),
      DocumentError::UnparsableVersion { excerpt } => {
        write!(f, "Could not find version header in entry: {:?}", excerpt)
      }
      DocumentError::MissingAnchor => write!(f, "No anchor for previous entry below the end marker"),
    }
  }
}

/// Cross-check failures between a generated entry and the committed one
#[derive(Debug)]
pub enum ValidationError {
  /// The committed changelog has no entry for the version
  MissingVersionEntry { version: String },

  /// A PR from the activity source is missing from the changelog
  MissingPullRequest { number: u64 },

  /// The changelog references a PR the activity source does not know about
  UnexpectedPullRequest { number: u64, version: String },
}

impl ValidationError {
  fn help_message(&self) -> Option<String> {
    match self {
      ValidationError::MissingVersionEntry { .. } => {
        Some("Run `rail-changelog build` for this version first.".to_string())
      }
      ValidationError::MissingPullRequest { .. } => {
        Some("Re-run `rail-changelog build` to pick up newly merged PRs.".to_string())
      }
      ValidationError::UnexpectedPullRequest { .. } => None,
    }
  }
}

impl fmt::Display for ValidationError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ValidationError::MissingVersionEntry { version } => write!(f, "Did not find entry for {}", version),
      ValidationError::MissingPullRequest { number } => write!(f, "Missing PR #{} in changelog", number),
      ValidationError::UnexpectedPullRequest { number, version } => {
        write!(f, "PR #{} does not belong in changelog for {}", number, version)
      }
    }
  }
}

/// Release-hosting and activity collaborator errors
#[derive(Debug)]
pub enum HostError {
  /// External tool exited unsuccessfully
  CommandFailed { command: String, stderr: String },

  /// External tool could not be started
  ToolUnavailable { program: String, reason: String },

  /// Response could not be decoded
  InvalidResponse { resource: String, reason: String },
}

impl HostError {
  fn help_message(&self) -> Option<String> {
    match self {
      HostError::ToolUnavailable { program, .. } => Some(format!(
        "Install `{}` or point [tools] in rail-changelog.toml at it.",
        program
      )),
      HostError::CommandFailed { stderr, .. } if stderr.contains("401") || stderr.contains("403") => {
        Some("Check the token passed with --auth.".to_string())
      }
      _ => None,
    }
  }
}

impl fmt::Display for HostError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      HostError::CommandFailed { command, stderr } => write!(f, "Command failed: {}\n{}", command, stderr),
      HostError::ToolUnavailable { program, reason } => write!(f, "Could not run {}: {}", program, reason),
      HostError::InvalidResponse { resource, reason } => {
        write!(f, "Unexpected response for {}: {}", resource, reason)
      }
    }
  }
}

/// Git operation errors
#[derive(Debug)]
pub enum GitError {
  /// Git command failed
  CommandFailed { command: String, stderr: String },

  /// Repository not found
  RepoNotFound { path: PathBuf },
}

impl GitError {
  fn help_message(&self) -> Option<String> {
    match self {
      GitError::RepoNotFound { path } => Some(format!(
        "Run from inside a git checkout or check the path: {}",
        path.display()
      )),
      GitError::CommandFailed { stderr, .. } if stderr.contains("did not match any") => {
        Some("Fetch the branch or tag first: git fetch origin --tags".to_string())
      }
      _ => None,
    }
  }
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitError::CommandFailed { command, stderr } => {
        write!(f, "Git command failed: {}\n{}", command, stderr)
      }
      GitError::RepoNotFound { path } => {
        write!(f, "Git repository not found at: {}", path.display())
      }
    }
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// Repository identifier is not `owner/name`
  InvalidRepo { value: String },

  /// A value that has no default was not provided
  MissingField { field: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::InvalidRepo { .. } => Some("Use the form `owner/name`, e.g. `octo-org/widgets`.".to_string()),
      ConfigError::MissingField { field } => Some(format!(
        "Pass --{} or set it in rail-changelog.toml.",
        field.replace('_', "-")
      )),
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::InvalidRepo { value } => write!(f, "Invalid repository '{}'", value),
      ConfigError::MissingField { field } => write!(f, "Missing required setting: {}", field),
    }
  }
}

/// Result type alias for rail-changelog
pub type RailResult<T> = Result<T, RailError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> RailResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> RailResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<RailError>,
{
  fn context(self, ctx: impl Into<String>) -> RailResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> RailResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &RailError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
