//! Diagnostics for builds that cascaded on missing dependencies.
//!
//! The build gate only reports that some direct dependency is missing. This
//! module runs the full install-plan resolver over the same direct
//! dependencies the gate checked, to tell the operator exactly which packages
//! have to be installed first.

use crate::descriptor::{PortCatalog, SourceDescriptor};
use crate::paths::BuildPaths;
use crate::plan::{InstallPlanEntry, PlanError, PlanKind, resolve_install_plan};
use crate::spec::PackageSpec;
use crate::status::StatusDb;

/// Unmet prerequisites of `spec`, in install order.
///
/// The roots of the plan are the direct dependencies of `descriptor`, the
/// descriptor the build was gated on, so a stale prebuilt record of `spec`
/// itself cannot hide a dependency the port gained since.
///
/// Must only be called after a build of `spec` cascaded. Panics if the
/// resolver finds nothing missing, since the gate and the resolver then
/// disagree about the same graph.
pub fn missing_dependencies(
  descriptor: &SourceDescriptor,
  spec: &PackageSpec,
  catalog: &dyn PortCatalog,
  status: &StatusDb,
  paths: &BuildPaths,
) -> Result<Vec<PackageSpec>, PlanError> {
  let roots = descriptor
    .dependencies()
    .iter()
    .map(|name| {
      PackageSpec::new(name, spec.triplet().clone()).map_err(|source| PlanError::InvalidDependency {
        parent: spec.clone(),
        name: name.clone(),
        source,
      })
    })
    .collect::<Result<Vec<_>, _>>()?;

  let plan = resolve_install_plan(catalog, &roots, status, paths)?;
  let missing = unmet_entries(plan, spec);
  assert!(
    !missing.is_empty(),
    "build of {spec} cascaded but the install plan has no missing dependencies"
  );
  Ok(missing)
}

fn unmet_entries(plan: Vec<InstallPlanEntry>, spec: &PackageSpec) -> Vec<PackageSpec> {
  plan
    .into_iter()
    .filter(|entry| &entry.spec != spec && entry.kind != PlanKind::AlreadyInstalled)
    .map(|entry| entry.spec)
    .collect()
}

pub fn render_missing_dependencies(missing: &[PackageSpec]) -> String {
  let mut out = String::from(
    "The build command requires all dependencies to be already installed.\nThe following dependencies are missing:\n\n",
  );
  for spec in missing {
    out.push_str("    ");
    out.push_str(&spec.to_string());
    out.push('\n');
  }
  out
}
