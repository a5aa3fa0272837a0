//! Telemetry Module
//!
//! Observability hooks the cache reports through. Absence of a real sink never
//! affects cache behaviour.

use tracing::{error, info};

use crate::error::CacheError;

/// Receives event and exception notifications from the cache subsystem.
pub trait Telemetry: Send + Sync {
    /// Records a named event with string properties.
    fn track_event(&self, name: &str, properties: &[(&str, &str)]);

    /// Records a failure before it is propagated to the caller.
    fn track_exception(&self, error: &CacheError);
}

/// Forwards telemetry to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingTelemetry;

impl Telemetry for TracingTelemetry {
    fn track_event(&self, name: &str, properties: &[(&str, &str)]) {
        info!(event = name, ?properties, "telemetry event");
    }

    fn track_exception(&self, error: &CacheError) {
        error!(error = %error, "telemetry exception");
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTelemetry;

impl Telemetry for NoopTelemetry {
    fn track_event(&self, _name: &str, _properties: &[(&str, &str)]) {}

    fn track_exception(&self, _error: &CacheError) {}
}
