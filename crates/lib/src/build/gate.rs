//! Fail-fast check of a target's direct dependencies.

use crate::descriptor::SourceDescriptor;
use crate::spec::Triplet;
use crate::status::StatusDb;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
  Satisfied,
  /// The first direct dependency, in declared order, that is not installed.
  Unmet(String),
}

/// Stops at the first dependency missing for `triplet`; it does not collect all of them.
pub fn check(descriptor: &SourceDescriptor, triplet: &Triplet, status: &StatusDb) -> GateOutcome {
  descriptor
    .dependencies()
    .iter()
    .find(|dep| !status.is_installed(dep, triplet))
    .map_or(GateOutcome::Satisfied, |dep| GateOutcome::Unmet(dep.clone()))
}
