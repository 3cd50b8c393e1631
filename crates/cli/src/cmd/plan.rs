//! Implementation of the `portsmith plan` command.
//!
//! Prints what installing the given specs would take, dependencies first,
//! without building anything.

use std::path::Path;

use anyhow::{Context, Result};

use portsmith_lib::descriptor::PortsDir;
use portsmith_lib::plan::{PlanKind, resolve_install_plan};
use portsmith_lib::status::StatusDb;

use super::{Outcome, parse_spec, resolve_paths};
use crate::output::{OutputFormat, print_info, print_json, symbols};

pub fn cmd_plan(specs: &[String], root: Option<&Path>, output: OutputFormat) -> Result<Outcome> {
  let paths = resolve_paths(root)?;
  let specs = specs
    .iter()
    .map(|input| parse_spec(input, &paths))
    .collect::<Result<Vec<_>>>()?;

  let status = StatusDb::load(&paths.status_file).context("Failed to load the status database")?;
  let plan = resolve_install_plan(&PortsDir::new(&paths), &specs, &status, &paths)
    .context("Failed to resolve the install plan")?;

  if output.is_json() {
    print_json(&plan)?;
    return Ok(Outcome::Success);
  }

  let pending = plan.iter().filter(|e| e.kind != PlanKind::AlreadyInstalled).count();
  if pending == 0 {
    print_info("All requested packages are already installed");
  }
  for entry in &plan {
    let action = match entry.kind {
      PlanKind::AlreadyInstalled => "already installed",
      PlanKind::Install => "install",
      PlanKind::BuildAndInstall => "build and install",
    };
    println!("  {} {} ({})", symbols::ARROW, entry.spec, action);
  }

  Ok(Outcome::Success)
}
