//! Test utilities for portsmith-lib.
//!
//! In-memory stand-ins for the build collaborators so that orchestration can
//! be exercised without a native toolchain.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::build::toolchain::{ToolchainCommand, ToolchainInvoker};
use crate::descriptor::{DescriptorError, PortCatalog, SourceDescriptor};
use crate::lint::PostBuildVerifier;
use crate::paths::BuildPaths;
use crate::spec::PackageSpec;
use crate::telemetry::Telemetry;

/// Port catalog backed by a map of name to direct dependencies.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
  ports: HashMap<String, SourceDescriptor>,
}

impl MemoryCatalog {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with(mut self, name: &str, depends: &[&str]) -> Self {
    self.ports.insert(name.to_string(), SourceDescriptor::new(name, depends));
    self
  }
}

impl PortCatalog for MemoryCatalog {
  fn load(&self, name: &str) -> Result<SourceDescriptor, DescriptorError> {
    self
      .ports
      .get(name)
      .cloned()
      .ok_or_else(|| DescriptorError::NotFound(PathBuf::from("ports").join(name)))
  }
}

/// Returns a fixed exit code and remembers every command it was given.
#[derive(Debug)]
pub struct FakeInvoker {
  exit_code: i32,
  commands: RefCell<Vec<ToolchainCommand>>,
}

impl FakeInvoker {
  pub fn exiting(exit_code: i32) -> Self {
    Self {
      exit_code,
      commands: RefCell::new(Vec::new()),
    }
  }

  pub fn calls(&self) -> usize {
    self.commands.borrow().len()
  }

  pub fn last_command(&self) -> Option<ToolchainCommand> {
    self.commands.borrow().last().cloned()
  }
}

impl ToolchainInvoker for FakeInvoker {
  fn execute(&self, command: &ToolchainCommand) -> i32 {
    self.commands.borrow_mut().push(command.clone());
    self.exit_code
  }
}

/// Reports a fixed violation count.
#[derive(Debug, Default)]
pub struct FixedVerifier {
  violations: usize,
  calls: Cell<usize>,
}

impl FixedVerifier {
  pub fn reporting(violations: usize) -> Self {
    Self {
      violations,
      calls: Cell::new(0),
    }
  }

  pub fn calls(&self) -> usize {
    self.calls.get()
  }
}

impl PostBuildVerifier for FixedVerifier {
  fn run(&self, _spec: &PackageSpec, _paths: &BuildPaths) -> usize {
    self.calls.set(self.calls.get() + 1);
    self.violations
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TelemetryEvent {
  Duration(String),
  Property(String, String),
}

/// Collects telemetry events; durations are recorded without their value.
#[derive(Debug, Default)]
pub struct MemoryTelemetry {
  events: RefCell<Vec<TelemetryEvent>>,
}

impl MemoryTelemetry {
  pub fn events(&self) -> Vec<TelemetryEvent> {
    self.events.borrow().clone()
  }
}

impl Telemetry for MemoryTelemetry {
  fn record_duration(&self, key: &str, _micros: u64) {
    self.events.borrow_mut().push(TelemetryEvent::Duration(key.to_string()));
  }

  fn record_property(&self, key: &str, value: &str) {
    self
      .events
      .borrow_mut()
      .push(TelemetryEvent::Property(key.to_string(), value.to_string()));
  }
}
