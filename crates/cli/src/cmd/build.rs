//! Implementation of the `portsmith build` command.
//!
//! Builds a single package whose dependencies are already installed. A build
//! that cascades on a missing dependency lists everything that has to be
//! installed first.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Serialize;

use portsmith_lib::build::cascade::{missing_dependencies, render_missing_dependencies};
use portsmith_lib::build::execute::{BuildServices, build_package};
use portsmith_lib::build::toolchain::ProcessInvoker;
use portsmith_lib::build::{BuildResult, troubleshooting_message};
use portsmith_lib::descriptor::{PortsDir, load_port};
use portsmith_lib::lint::{LintVerifier, PostBuildVerifier};
use portsmith_lib::paths::{BuildPaths, ToolchainSettings};
use portsmith_lib::spec::PackageSpec;
use portsmith_lib::status::StatusDb;
use portsmith_lib::telemetry::TracingTelemetry;

use super::{Outcome, parse_spec, resolve_paths};
use crate::output::{OutputFormat, format_duration, print_error, print_info, print_json, print_stat, print_success};

pub struct BuildArgs<'a> {
  pub spec: &'a str,
  pub checks_only: bool,
  pub root: Option<&'a Path>,
  pub output: OutputFormat,
}

#[derive(Serialize)]
struct BuildReport<'a> {
  spec: &'a PackageSpec,
  result: BuildResult,
  #[serde(skip_serializing_if = "Option::is_none")]
  duration_ms: Option<u64>,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  missing: Vec<PackageSpec>,
}

#[derive(Serialize)]
struct ChecksReport<'a> {
  spec: &'a PackageSpec,
  violations: usize,
}

pub fn cmd_build(args: &BuildArgs<'_>) -> Result<Outcome> {
  let paths = resolve_paths(args.root)?;
  let spec = parse_spec(args.spec, &paths)?;

  if args.checks_only {
    return run_checks(&spec, &paths, args.output);
  }

  let port_dir = paths.port_dir(&spec);
  let descriptor = load_port(&port_dir).with_context(|| format!("Could not find package named {}", spec))?;
  let status = StatusDb::load(&paths.status_file).context("Failed to load the status database")?;

  let toolchain = ToolchainSettings::from_env();
  let services = BuildServices {
    invoker: &ProcessInvoker,
    verifier: &LintVerifier,
    telemetry: &TracingTelemetry,
    toolchain: &toolchain,
  };

  if !args.output.is_json() {
    print_info(&format!("Building package {}...", spec));
  }

  let start = Instant::now();
  let result = build_package(&descriptor, &spec, &paths, &port_dir, &status, &services)?;
  let elapsed = start.elapsed();

  let missing = match result {
    BuildResult::CascadedDueToMissingDependencies => {
      missing_dependencies(&descriptor, &spec, &PortsDir::new(&paths), &status, &paths)
        .context("Failed to compute the missing dependencies")?
    }
    _ => Vec::new(),
  };

  if args.output.is_json() {
    print_json(&BuildReport {
      spec: &spec,
      result,
      duration_ms: result
        .is_success()
        .then(|| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)),
      missing,
    })?;
    return Ok(Outcome::from_success(result.is_success()));
  }

  match result {
    BuildResult::Succeeded => {
      print_success(&format!("Building package {} succeeded", spec));
      print_stat("Duration", &format_duration(elapsed));
    }
    BuildResult::CascadedDueToMissingDependencies => {
      let message = render_missing_dependencies(&missing);
      let (headline, details) = message.split_once('\n').unwrap_or((message.as_str(), ""));
      print_error(headline);
      print!("{}", details);
    }
    BuildResult::BuildFailed | BuildResult::PostBuildChecksFailed => {
      print_error(&result.error_message(&spec));
      println!("{}", troubleshooting_message(&spec));
    }
  }

  Ok(Outcome::from_success(result.is_success()))
}

fn run_checks(spec: &PackageSpec, paths: &BuildPaths, output: OutputFormat) -> Result<Outcome> {
  let violations = LintVerifier.run(spec, paths);

  if output.is_json() {
    print_json(&ChecksReport { spec, violations })?;
  } else if violations == 0 {
    print_success(&format!("Post-build checks passed for {}", spec));
  } else {
    print_error(&format!("Found {} post-build check violation(s) for {}", violations, spec));
  }

  Ok(Outcome::from_success(violations == 0))
}
