//! Install-plan resolution.
//!
//! Expands a set of requested targets into the full, transitive list of
//! targets that have to be present, ordered so that every dependency comes
//! before its dependents.
//!
//! This is deliberately a separate, more thorough algorithm than the build
//! gate in [`crate::build::gate`]: the gate only looks one level deep and stops
//! at the first miss, while the resolver walks the whole graph. Both read
//! dependencies through [`SourceDescriptor::dependencies`].

use std::collections::{BTreeSet, HashMap};

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::descriptor::{BinaryDescriptor, DescriptorError, PortCatalog, SourceDescriptor};
use crate::paths::BuildPaths;
use crate::spec::{PackageSpec, SpecError};
use crate::status::StatusDb;

#[derive(Debug, Error)]
pub enum PlanError {
  #[error("failed to load descriptor for {spec}: {source}")]
  Descriptor {
    spec: PackageSpec,
    #[source]
    source: DescriptorError,
  },

  #[error("invalid dependency `{name}` of {parent}: {source}")]
  InvalidDependency {
    parent: PackageSpec,
    name: String,
    #[source]
    source: SpecError,
  },

  #[error("dependency cycle detected between: {}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "))]
  Cycle(Vec<PackageSpec>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanKind {
  /// Present in the status database; not expanded further.
  AlreadyInstalled,
  /// A built package is already in the package store and only needs installing.
  Install,
  /// Must be built from its port.
  BuildAndInstall,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallPlanEntry {
  pub spec: PackageSpec,
  pub kind: PlanKind,
}

/// Resolve `specs` into an ordered install plan.
///
/// Dependencies inherit the triplet of the package that requires them.
pub fn resolve_install_plan(
  catalog: &dyn PortCatalog,
  specs: &[PackageSpec],
  status: &StatusDb,
  paths: &BuildPaths,
) -> Result<Vec<InstallPlanEntry>, PlanError> {
  let mut graph: DiGraph<InstallPlanEntry, ()> = DiGraph::new();
  let mut nodes: HashMap<PackageSpec, NodeIndex> = HashMap::new();
  let mut pending: Vec<(PackageSpec, Option<NodeIndex>)> = specs.iter().rev().map(|s| (s.clone(), None)).collect();

  while let Some((spec, dependent)) = pending.pop() {
    if let Some(&existing) = nodes.get(&spec) {
      if let Some(dependent) = dependent {
        graph.update_edge(existing, dependent, ());
      }
      continue;
    }

    let (kind, depends) = classify(catalog, &spec, status, paths)?;
    debug!(spec = %spec, kind = ?kind, "planned");

    let idx = graph.add_node(InstallPlanEntry {
      spec: spec.clone(),
      kind,
    });
    nodes.insert(spec.clone(), idx);
    if let Some(dependent) = dependent {
      graph.add_edge(idx, dependent, ());
    }

    for name in depends.iter().rev() {
      let dep = PackageSpec::new(name, spec.triplet().clone()).map_err(|source| PlanError::InvalidDependency {
        parent: spec.clone(),
        name: name.clone(),
        source,
      })?;
      pending.push((dep, Some(idx)));
    }
  }

  topological_order(&graph)
}

fn classify(
  catalog: &dyn PortCatalog,
  spec: &PackageSpec,
  status: &StatusDb,
  paths: &BuildPaths,
) -> Result<(PlanKind, Vec<String>), PlanError> {
  if status.is_installed(spec.name(), spec.triplet()) {
    return Ok((PlanKind::AlreadyInstalled, Vec::new()));
  }

  let descriptor_err = |source| PlanError::Descriptor {
    spec: spec.clone(),
    source,
  };

  let control = paths.package_control(spec);
  if control.is_file() {
    let binary = BinaryDescriptor::load(&control).map_err(descriptor_err)?;
    return Ok((PlanKind::Install, binary.depends));
  }

  let source: SourceDescriptor = catalog.load(spec.name()).map_err(descriptor_err)?;
  Ok((PlanKind::BuildAndInstall, source.dependencies().to_vec()))
}

/// Kahn's algorithm; among ready nodes the earliest discovered goes first.
fn topological_order(graph: &DiGraph<InstallPlanEntry, ()>) -> Result<Vec<InstallPlanEntry>, PlanError> {
  let mut in_degree: Vec<usize> = graph
    .node_indices()
    .map(|idx| graph.neighbors_directed(idx, Direction::Incoming).count())
    .collect();
  let mut ready: BTreeSet<NodeIndex> = graph.node_indices().filter(|idx| in_degree[idx.index()] == 0).collect();
  let mut ordered = Vec::with_capacity(graph.node_count());

  while let Some(idx) = ready.pop_first() {
    ordered.push(graph[idx].clone());
    for next in graph.neighbors_directed(idx, Direction::Outgoing) {
      in_degree[next.index()] -= 1;
      if in_degree[next.index()] == 0 {
        ready.insert(next);
      }
    }
  }

  if ordered.len() < graph.node_count() {
    let cycle = graph
      .node_indices()
      .filter(|idx| in_degree[idx.index()] > 0)
      .map(|idx| graph[idx].spec.clone())
      .collect();
    return Err(PlanError::Cycle(cycle));
  }

  Ok(ordered)
}
