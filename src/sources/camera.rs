//! Camera frame sources.

use std::path::{Path, PathBuf};

use crate::core::types::{LogRecord, RecordPayload};
use crate::error::{Error, Result};

use super::{LogSource, SourceInfo, DRIVE_EPOCH_US};

/// Start of the camera stream, microseconds since epoch.
pub const CAMERA_START_US: u64 = DRIVE_EPOCH_US + 500_000;
/// Synthetic stream length in frames.
pub const SYNTHETIC_FRAME_COUNT: u32 = 10;
/// Synthetic frame spacing (1 Hz).
pub const SYNTHETIC_FRAME_PERIOD_US: u64 = 1_000_000;
/// Synthetic frame width in pixels.
pub const SYNTHETIC_FRAME_WIDTH: u32 = 600;
/// Synthetic frame height in pixels.
pub const SYNTHETIC_FRAME_HEIGHT: u32 = 400;

/// Generates a short synthetic camera stream: 10 frames at 1 Hz, frame `i`
/// a solid 600x400 image with color channel `i % 3` saturated.
#[derive(Debug)]
pub struct SyntheticCameraSource {
    topic: String,
    counter: u32,
}

impl SyntheticCameraSource {
    /// Create a synthetic camera source on the given topic.
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            counter: 0,
        }
    }
}

impl LogSource for SyntheticCameraSource {
    fn topic(&self) -> &str {
        &self.topic
    }

    fn open(&mut self, _path: &Path) -> Result<SourceInfo> {
        Ok(SourceInfo {
            start_timestamp_us: CAMERA_START_US,
        })
    }

    fn read_next(&mut self) -> Result<Option<LogRecord>> {
        if self.counter == SYNTHETIC_FRAME_COUNT {
            return Ok(None);
        }
        let timestamp_us =
            CAMERA_START_US + u64::from(self.counter) * SYNTHETIC_FRAME_PERIOD_US;

        let size = (SYNTHETIC_FRAME_WIDTH * SYNTHETIC_FRAME_HEIGHT * 3) as usize;
        let mut pixels = vec![0u8; size];
        let lit_channel = (self.counter % 3) as usize;
        for pixel in pixels.chunks_exact_mut(3) {
            pixel[lit_channel] = 255;
        }

        self.counter += 1;
        Ok(Some(LogRecord::new(
            self.topic.clone(),
            RecordPayload::CameraFrame {
                pixels,
                width: SYNTHETIC_FRAME_WIDTH,
                height: SYNTHETIC_FRAME_HEIGHT,
            },
            timestamp_us,
        )))
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Replays per-frame image files from a directory, sorted by file name,
/// at a fixed frame period.
#[derive(Debug)]
pub struct ImageDirCameraSource {
    topic: String,
    subpath: Option<PathBuf>,
    frame_period_us: u64,
    frames: Vec<PathBuf>,
    counter: usize,
}

impl ImageDirCameraSource {
    /// Create a source reading frames from `subpath` under the session root
    /// (default `camera/`).
    pub fn new(topic: impl Into<String>, subpath: Option<PathBuf>) -> Self {
        Self {
            topic: topic.into(),
            subpath,
            frame_period_us: SYNTHETIC_FRAME_PERIOD_US,
            frames: Vec::new(),
            counter: 0,
        }
    }

    /// Override the frame period.
    pub fn with_frame_period_us(mut self, frame_period_us: u64) -> Self {
        self.frame_period_us = frame_period_us;
        self
    }
}

impl LogSource for ImageDirCameraSource {
    fn topic(&self) -> &str {
        &self.topic
    }

    fn open(&mut self, path: &Path) -> Result<SourceInfo> {
        let dir = match &self.subpath {
            Some(subpath) => path.join(subpath),
            None => path.join("camera"),
        };
        let entries = std::fs::read_dir(&dir).map_err(|e| Error::Fetch {
            resource: dir.display().to_string(),
            reason: e.to_string(),
        })?;
        let mut frames = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Error::Fetch {
                resource: dir.display().to_string(),
                reason: e.to_string(),
            })?;
            if entry.path().is_file() {
                frames.push(entry.path());
            }
        }
        frames.sort();
        log::info!("camera source: {} frames in {}", frames.len(), dir.display());
        self.frames = frames;
        Ok(SourceInfo {
            start_timestamp_us: CAMERA_START_US,
        })
    }

    fn read_next(&mut self) -> Result<Option<LogRecord>> {
        if self.counter == self.frames.len() {
            return Ok(None);
        }
        let frame_path = &self.frames[self.counter];
        let image = image::open(frame_path)
            .map_err(|e| {
                Error::InvalidFormat(format!("unreadable image {}: {}", frame_path.display(), e))
            })?
            .to_rgb8();
        let (width, height) = (image.width(), image.height());
        let timestamp_us = CAMERA_START_US + self.counter as u64 * self.frame_period_us;

        self.counter += 1;
        Ok(Some(LogRecord::new(
            self.topic.clone(),
            RecordPayload::CameraFrame {
                pixels: image.into_raw(),
                width,
                height,
            },
            timestamp_us,
        )))
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}
