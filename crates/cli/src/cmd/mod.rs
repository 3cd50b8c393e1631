mod build;
mod plan;

pub use build::{BuildArgs, cmd_build};
pub use plan::cmd_plan;

use std::path::Path;

use anyhow::{Context, Result};

use portsmith_lib::paths::{BuildPaths, default_triplet};
use portsmith_lib::spec::PackageSpec;

/// What a command reports back to `main`, which alone maps it to an exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
  Success,
  Failure,
}

impl Outcome {
  pub fn from_success(success: bool) -> Self {
    if success { Self::Success } else { Self::Failure }
  }
}

/// `--root` wins over `PORTSMITH_ROOT`, which wins over the current directory.
fn resolve_paths(root: Option<&Path>) -> Result<BuildPaths> {
  match root {
    Some(root) => Ok(BuildPaths::from_root(root)),
    None => BuildPaths::discover().context("Failed to determine the root directory"),
  }
}

/// Parse `input` and make sure its triplet is one the root knows about.
fn parse_spec(input: &str, paths: &BuildPaths) -> Result<PackageSpec> {
  let default = default_triplet().context("Invalid default triplet")?;
  let spec = PackageSpec::parse(input, &default).with_context(|| format!("Invalid package spec: {}", input))?;
  if !paths.is_valid_triplet(spec.triplet()) {
    anyhow::bail!(
      "Invalid triplet: {} (no {})",
      spec.triplet(),
      paths.triplet_file(spec.triplet()).display()
    );
  }
  Ok(spec)
}
