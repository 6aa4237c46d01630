//! Position sample sources.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::core::types::{LogRecord, RecordPayload};
use crate::error::{Error, Result};
use crate::telemetry::SharedTelemetry;

use super::{LogSource, SourceInfo, DRIVE_EPOCH_US};

/// Start of the position stream, microseconds since epoch.
pub const POSITION_START_US: u64 = DRIVE_EPOCH_US;
/// Sample spacing (10 Hz).
pub const TICK_PERIOD_US: u64 = 100_000;
/// Synthetic stream length in ticks.
pub const SYNTHETIC_TICK_COUNT: u32 = 120;

/// Generates a synthetic planar-offset track: 120 ticks at 100 ms spacing,
/// tick `k` at offset `(k + 1, 0)` meters from the survey origin.
#[derive(Debug)]
pub struct SyntheticPositionSource {
    topic: String,
    counter: u32,
}

impl SyntheticPositionSource {
    /// Create a synthetic position source on the given topic.
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            counter: 0,
        }
    }
}

impl LogSource for SyntheticPositionSource {
    fn topic(&self) -> &str {
        &self.topic
    }

    fn open(&mut self, _path: &Path) -> Result<SourceInfo> {
        Ok(SourceInfo {
            start_timestamp_us: POSITION_START_US,
        })
    }

    fn read_next(&mut self) -> Result<Option<LogRecord>> {
        if self.counter == SYNTHETIC_TICK_COUNT {
            return Ok(None);
        }
        let timestamp_us = POSITION_START_US + u64::from(self.counter) * TICK_PERIOD_US;
        self.counter += 1;
        Ok(Some(LogRecord::new(
            self.topic.clone(),
            RecordPayload::PlanarOffset {
                x: f64::from(self.counter),
                y: 0.0,
            },
            timestamp_us,
        )))
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// One sample of a recorded JSON track.
#[derive(Debug, Clone, Deserialize)]
struct TrackSample {
    lat: f64,
    long: f64,
    #[serde(default)]
    x_velocity: f64,
    #[serde(default)]
    y_velocity: f64,
}

/// Replays a JSON array of `{lat, long}` records (optional `x_velocity`,
/// `y_velocity`), one geodetic fix per 100 ms tick.
#[derive(Debug)]
pub struct JsonTrackSource {
    topic: String,
    subpath: Option<PathBuf>,
    telemetry: SharedTelemetry,
    samples: Vec<TrackSample>,
    counter: usize,
}

impl JsonTrackSource {
    /// Create a source reading the track from `subpath` under the session
    /// root (default `track.json`).
    pub fn new(
        topic: impl Into<String>,
        subpath: Option<PathBuf>,
        telemetry: SharedTelemetry,
    ) -> Self {
        Self {
            topic: topic.into(),
            subpath,
            telemetry,
            samples: Vec::new(),
            counter: 0,
        }
    }
}

impl LogSource for JsonTrackSource {
    fn topic(&self) -> &str {
        &self.topic
    }

    fn open(&mut self, path: &Path) -> Result<SourceInfo> {
        let file_path = match &self.subpath {
            Some(subpath) => path.join(subpath),
            None => path.join("track.json"),
        };
        let file = File::open(&file_path).map_err(|e| Error::Fetch {
            resource: file_path.display().to_string(),
            reason: e.to_string(),
        })?;
        self.samples = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| Error::InvalidFormat(format!("{}: {}", file_path.display(), e)))?;
        self.telemetry
            .send_scalar("track samples", self.samples.len() as f64);
        log::info!(
            "position source: {} samples in {}",
            self.samples.len(),
            file_path.display()
        );
        Ok(SourceInfo {
            start_timestamp_us: POSITION_START_US,
        })
    }

    fn read_next(&mut self) -> Result<Option<LogRecord>> {
        if self.counter == self.samples.len() {
            return Ok(None);
        }
        let sample = &self.samples[self.counter];
        let timestamp_us = POSITION_START_US + self.counter as u64 * TICK_PERIOD_US;
        let record = LogRecord::new(
            self.topic.clone(),
            RecordPayload::GeodeticFix {
                latitude: sample.lat,
                longitude: sample.long,
                x_velocity: sample.x_velocity,
                y_velocity: sample.y_velocity,
            },
            timestamp_us,
        );
        self.counter += 1;
        Ok(Some(record))
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}
