//! Side-channel telemetry reporting.
//!
//! Sources and adapters can emit ad-hoc scalar datapoints and drawing
//! payloads alongside the main converted stream. The host supplies the
//! sink at construction time.

use std::sync::Arc;

/// Shared handle to a telemetry sink.
pub type SharedTelemetry = Arc<dyn TelemetrySink>;

/// Sink for ad-hoc side-channel data emitted during conversion.
pub trait TelemetrySink: std::fmt::Debug {
    /// Report a named scalar datapoint.
    fn send_scalar(&self, name: &str, value: f64);

    /// Report a named drawing payload.
    fn send_drawing(&self, name: &str, payload: &[u8]);
}

/// Telemetry sink that routes datapoints to the log.
#[derive(Debug, Default)]
pub struct LogTelemetry;

impl TelemetrySink for LogTelemetry {
    fn send_scalar(&self, name: &str, value: f64) {
        log::debug!("datapoint '{}' = {}", name, value);
    }

    fn send_drawing(&self, name: &str, payload: &[u8]) {
        log::debug!("drawing '{}' ({} bytes)", name, payload.len());
    }
}

/// Telemetry sink that drops everything.
#[derive(Debug, Default)]
pub struct NullTelemetry;

impl TelemetrySink for NullTelemetry {
    fn send_scalar(&self, _name: &str, _value: f64) {}

    fn send_drawing(&self, _name: &str, _payload: &[u8]) {}
}
