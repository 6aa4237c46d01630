//! Log sources: lazy producers of timestamped raw records, one topic each.
//!
//! A source is opened once, pulled to exhaustion with `read_next`, and
//! closed once. End-of-stream is `Ok(None)` and is a normal terminal
//! condition, not an error. Sources may block on I/O inside any call.

pub mod camera;
pub mod lidar;
pub mod position;

use std::path::Path;

use crate::config::SourceConfig;
use crate::core::types::{LogRecord, CAMERA_TOPIC, LIDAR_TOPIC, POSITION_TOPIC};
use crate::error::{Error, Result};
use crate::telemetry::SharedTelemetry;

pub use camera::{ImageDirCameraSource, SyntheticCameraSource};
pub use lidar::PointTableSource;
pub use position::{JsonTrackSource, SyntheticPositionSource};

/// Epoch of the recorded drive, microseconds. Position samples start here;
/// camera and lidar streams start half a second in.
pub const DRIVE_EPOCH_US: u64 = 1_668_741_575_000_000;

/// Start-of-stream metadata reported by [`LogSource::open`].
#[derive(Debug, Clone, Copy)]
pub struct SourceInfo {
    /// Timestamp of the first instant covered by this source, microseconds
    /// since epoch. Must not exceed the timestamp of any record the source
    /// later produces.
    pub start_timestamp_us: u64,
}

/// A lazy, finite, non-restartable producer of raw timestamped records for
/// one topic.
pub trait LogSource: std::fmt::Debug {
    /// Topic this source feeds.
    fn topic(&self) -> &str;

    /// Prepare the source for reading. Called exactly once, before any
    /// `read_next`. `path` is the session root; file-backed sources resolve
    /// their own subpath beneath it.
    fn open(&mut self, path: &Path) -> Result<SourceInfo>;

    /// Produce the next record, or `Ok(None)` once the stream is exhausted.
    /// Records must come out in non-decreasing timestamp order.
    fn read_next(&mut self) -> Result<Option<LogRecord>>;

    /// Release resources. Called exactly once, after the last `read_next`.
    fn close(&mut self) -> Result<()>;
}

/// Create a source from a config declaration.
///
/// Selection is by kind string so hosts can compose a session from
/// configuration alone.
pub fn create_source(
    config: &SourceConfig,
    telemetry: SharedTelemetry,
) -> Result<Box<dyn LogSource>> {
    let topic = |default: &str| {
        config
            .topic
            .clone()
            .unwrap_or_else(|| default.to_string())
    };
    match config.kind.as_str() {
        "synthetic_camera" => Ok(Box::new(SyntheticCameraSource::new(topic(CAMERA_TOPIC)))),
        "image_dir" => Ok(Box::new(ImageDirCameraSource::new(
            topic(CAMERA_TOPIC),
            config.path.clone(),
        ))),
        "point_table" => Ok(Box::new(PointTableSource::new(
            topic(LIDAR_TOPIC),
            config.path.clone(),
            telemetry,
        ))),
        "synthetic_position" => Ok(Box::new(SyntheticPositionSource::new(topic(
            POSITION_TOPIC,
        )))),
        "json_track" => Ok(Box::new(JsonTrackSource::new(
            topic(POSITION_TOPIC),
            config.path.clone(),
            telemetry,
        ))),
        other => Err(Error::InvalidFormat(format!(
            "unknown source kind '{}'",
            other
        ))),
    }
}
