//! Fire-and-forget build telemetry.
//!
//! Nothing recorded here influences a build outcome.

use tracing::info;

pub trait Telemetry {
  fn record_duration(&self, key: &str, micros: u64);
  fn record_property(&self, key: &str, value: &str);
}

/// Emits telemetry as structured `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingTelemetry;

impl Telemetry for TracingTelemetry {
  fn record_duration(&self, key: &str, micros: u64) {
    info!(metric = %key, micros, "telemetry duration");
  }

  fn record_property(&self, key: &str, value: &str) {
    info!(property = %key, value = %value, "telemetry property");
  }
}
