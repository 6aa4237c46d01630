//! Lidar point-table source.
//!
//! Reads numbered `*.csv.gz` files from a directory: gzip-compressed
//! tables with named numeric columns `x,y,z,i`. The `i` (intensity)
//! column must be present but is discarded; the channel conversion
//! zero-fills intensity.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;

use crate::core::types::{LogRecord, RecordPayload};
use crate::error::{Error, Result};
use crate::telemetry::SharedTelemetry;

use super::{LogSource, SourceInfo, DRIVE_EPOCH_US};

/// Start of the lidar stream, microseconds since epoch.
pub const LIDAR_START_US: u64 = DRIVE_EPOCH_US + 500_000;
/// Cloud spacing (10 Hz).
pub const CLOUD_PERIOD_US: u64 = 100_000;
/// Capture skew of each cloud within its period.
pub const CLOUD_SKEW_US: u64 = 66_000;

/// Replays gzip-compressed point tables from a directory, sorted by file
/// name, one cloud per 100 ms tick.
#[derive(Debug)]
pub struct PointTableSource {
    topic: String,
    subpath: Option<PathBuf>,
    telemetry: SharedTelemetry,
    tables: Vec<PathBuf>,
    counter: usize,
}

impl PointTableSource {
    /// Create a source reading tables from `subpath` under the session root
    /// (default `lidar/`).
    pub fn new(
        topic: impl Into<String>,
        subpath: Option<PathBuf>,
        telemetry: SharedTelemetry,
    ) -> Self {
        Self {
            topic: topic.into(),
            subpath,
            telemetry,
            tables: Vec::new(),
            counter: 0,
        }
    }

    fn read_table(&self, path: &Path) -> Result<Vec<[f32; 3]>> {
        let file = File::open(path).map_err(|e| Error::Fetch {
            resource: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let decoder = GzDecoder::new(BufReader::new(file));
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(decoder);

        let headers = reader
            .headers()
            .map_err(|e| Error::InvalidFormat(format!("{}: {}", path.display(), e)))?
            .clone();
        let column = |name: &str| -> Result<usize> {
            headers.iter().position(|h| h == name).ok_or_else(|| {
                Error::InvalidFormat(format!("{}: missing column '{}'", path.display(), name))
            })
        };
        let x_col = column("x")?;
        let y_col = column("y")?;
        let z_col = column("z")?;
        // Intensity is part of the table format even though conversion
        // zero-fills it.
        column("i")?;

        let mut points = Vec::new();
        for (row, result) in reader.records().enumerate() {
            let record =
                result.map_err(|e| Error::InvalidFormat(format!("{}: {}", path.display(), e)))?;
            let field = |col: usize| -> Result<f32> {
                record
                    .get(col)
                    .and_then(|s| s.parse::<f32>().ok())
                    .ok_or_else(|| {
                        Error::InvalidFormat(format!(
                            "{}: bad numeric value in row {}",
                            path.display(),
                            row + 1
                        ))
                    })
            };
            points.push([field(x_col)?, field(y_col)?, field(z_col)?]);
        }
        Ok(points)
    }
}

impl LogSource for PointTableSource {
    fn topic(&self) -> &str {
        &self.topic
    }

    fn open(&mut self, path: &Path) -> Result<SourceInfo> {
        let dir = match &self.subpath {
            Some(subpath) => path.join(subpath),
            None => path.join("lidar"),
        };
        let entries = std::fs::read_dir(&dir).map_err(|e| Error::Fetch {
            resource: dir.display().to_string(),
            reason: e.to_string(),
        })?;
        let mut tables = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Error::Fetch {
                resource: dir.display().to_string(),
                reason: e.to_string(),
            })?;
            let entry_path = entry.path();
            if entry_path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(".csv.gz"))
            {
                tables.push(entry_path);
            }
        }
        tables.sort();
        log::info!("lidar source: {} clouds in {}", tables.len(), dir.display());
        self.tables = tables;
        Ok(SourceInfo {
            start_timestamp_us: LIDAR_START_US,
        })
    }

    fn read_next(&mut self) -> Result<Option<LogRecord>> {
        if self.counter == self.tables.len() {
            return Ok(None);
        }
        let path = self.tables[self.counter].clone();
        let points = self.read_table(&path)?;
        self.telemetry
            .send_scalar("lidar points", points.len() as f64);

        let timestamp_us =
            LIDAR_START_US + self.counter as u64 * CLOUD_PERIOD_US + CLOUD_SKEW_US;
        self.counter += 1;
        Ok(Some(LogRecord::new(
            self.topic.clone(),
            RecordPayload::PointCloud { points },
            timestamp_us,
        )))
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}
