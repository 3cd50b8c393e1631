use std::fmt;
use std::io;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::spec::PackageSpec;

/// Outcome of building one target. Every variant is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuildResult {
  Succeeded,
  BuildFailed,
  PostBuildChecksFailed,
  CascadedDueToMissingDependencies,
}

impl BuildResult {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Succeeded => "SUCCEEDED",
      Self::BuildFailed => "BUILD_FAILED",
      Self::PostBuildChecksFailed => "POST_BUILD_CHECKS_FAILED",
      Self::CascadedDueToMissingDependencies => "CASCADED_DUE_TO_MISSING_DEPENDENCIES",
    }
  }

  pub fn is_success(&self) -> bool {
    matches!(self, Self::Succeeded)
  }

  /// One-line operator message for a failed outcome.
  pub fn error_message(&self, spec: &PackageSpec) -> String {
    format!("Error: Building package {} failed with: {}", spec, self)
  }
}

impl fmt::Display for BuildResult {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Guidance printed after a failed build.
pub fn troubleshooting_message(spec: &PackageSpec) -> String {
  format!(
    "Please ensure you're using the latest port files, then\n\
     submit an issue including:\n  \
     Package: {}\n  \
     Version: {}\n\
     \n\
     Additionally, attach any relevant sections from the log files above.",
    spec,
    env!("CARGO_PKG_VERSION")
  )
}

/// Failures that are not build outcomes: caller bugs and store I/O.
#[derive(Debug, Error)]
pub enum BuildError {
  #[error("inconsistent arguments: building {spec} with the descriptor of `{descriptor}`")]
  NameMismatch { spec: PackageSpec, descriptor: String },

  #[error("failed to write package metadata {}: {source}", path.display())]
  Publish {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}
