//! Single target build.
//!
//! Drives one target through the dependency gate, the toolchain, the
//! post-build checks and metadata publication, producing a [`BuildResult`].
//! The package store is only written after the checks pass.

use std::path::Path;
use std::time::Instant;

use tracing::{info, warn};

use crate::build::gate::{self, GateOutcome};
use crate::build::publish::publish;
use crate::build::toolchain::{ToolchainCommand, ToolchainInvoker};
use crate::build::types::{BuildError, BuildResult};
use crate::descriptor::SourceDescriptor;
use crate::lint::PostBuildVerifier;
use crate::paths::{BuildPaths, ToolchainSettings};
use crate::spec::PackageSpec;
use crate::status::StatusDb;
use crate::telemetry::Telemetry;

/// Collaborators a build talks to.
pub struct BuildServices<'a> {
  pub invoker: &'a dyn ToolchainInvoker,
  pub verifier: &'a dyn PostBuildVerifier,
  pub telemetry: &'a dyn Telemetry,
  pub toolchain: &'a ToolchainSettings,
}

/// Build `spec` from `descriptor`.
///
/// # Arguments
///
/// * `descriptor` - The source descriptor loaded from `port_dir`
/// * `spec` - The target being built; its name must match the descriptor
/// * `paths` - Filesystem layout
/// * `port_dir` - Directory holding the recipe
/// * `status` - Snapshot of installed packages, used read-only
/// * `services` - Toolchain, verifier and telemetry
///
/// # Errors
///
/// `NameMismatch` when `spec` and `descriptor` disagree (checked before
/// anything else), `Publish` when the metadata record cannot be written.
/// Every other outcome is a [`BuildResult`].
pub fn build_package(
  descriptor: &SourceDescriptor,
  spec: &PackageSpec,
  paths: &BuildPaths,
  port_dir: &Path,
  status: &StatusDb,
  services: &BuildServices<'_>,
) -> Result<BuildResult, BuildError> {
  if spec.name() != descriptor.name {
    return Err(BuildError::NameMismatch {
      spec: spec.clone(),
      descriptor: descriptor.name.clone(),
    });
  }

  let triplet = spec.triplet();
  if let GateOutcome::Unmet(dependency) = gate::check(descriptor, triplet, status) {
    info!(package = %spec, dependency = %dependency, "dependency not installed");
    return Ok(BuildResult::CascadedDueToMissingDependencies);
  }

  let command = ToolchainCommand::new(descriptor, triplet, port_dir, paths, services.toolchain);

  let started = Instant::now();
  let exit_code = services.invoker.execute(&command);
  let micros = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
  services.telemetry.record_duration(&format!("buildtimeus-{}", spec), micros);

  if exit_code != 0 {
    warn!(package = %spec, exit_code, "toolchain failed");
    services.telemetry.record_property("error", "build failed");
    services.telemetry.record_property("build_error", &spec.to_string());
    return Ok(BuildResult::BuildFailed);
  }

  let violations = services.verifier.run(spec, paths);
  if violations > 0 {
    warn!(package = %spec, violations, "post-build checks failed");
    return Ok(BuildResult::PostBuildChecksFailed);
  }

  publish(descriptor, triplet, paths)?;

  info!(package = %spec, micros, "build succeeded");
  Ok(BuildResult::Succeeded)
}
