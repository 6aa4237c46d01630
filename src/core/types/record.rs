//! Raw log records as produced by sources.

use serde::{Deserialize, Serialize};

/// Default topic carrying camera frames.
pub const CAMERA_TOPIC: &str = "camera";
/// Default topic carrying lidar point clouds.
pub const LIDAR_TOPIC: &str = "lidar";
/// Default topic carrying position samples.
pub const POSITION_TOPIC: &str = "position";

/// Raw payload of one recorded sample.
///
/// Each variant corresponds to a different input stream kind. Position
/// samples come in two shapes depending on how the drive was recorded:
/// planar offsets from a fixed survey origin, or geodetic fixes with
/// instantaneous velocity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RecordPayload {
    /// Uncompressed RGB8 camera frame, row-major
    CameraFrame {
        /// Pixel buffer, `width * height * 3` bytes
        pixels: Vec<u8>,
        /// Frame width in pixels
        width: u32,
        /// Frame height in pixels
        height: u32,
    },
    /// Point cloud in the right-handed capture frame
    PointCloud {
        /// `[x, y, z]` per point, meters
        points: Vec<[f32; 3]>,
    },
    /// Planar offset from the session's survey origin, meters
    PlanarOffset {
        /// East offset
        x: f64,
        /// North offset
        y: f64,
    },
    /// Geodetic fix with instantaneous velocity
    GeodeticFix {
        /// Latitude in degrees
        latitude: f64,
        /// Longitude in degrees (west-positive track convention)
        longitude: f64,
        /// Velocity along the track x axis, m/s
        x_velocity: f64,
        /// Velocity along the track y axis, m/s
        y_velocity: f64,
    },
}

impl RecordPayload {
    /// Short name of the payload kind, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            RecordPayload::CameraFrame { .. } => "camera_frame",
            RecordPayload::PointCloud { .. } => "point_cloud",
            RecordPayload::PlanarOffset { .. } => "planar_offset",
            RecordPayload::GeodeticFix { .. } => "geodetic_fix",
        }
    }

    /// Get the frame buffer if this is a camera frame.
    pub fn as_camera_frame(&self) -> Option<(&[u8], u32, u32)> {
        match self {
            RecordPayload::CameraFrame {
                pixels,
                width,
                height,
            } => Some((pixels, *width, *height)),
            _ => None,
        }
    }

    /// Get the point array if this is a point cloud.
    pub fn as_point_cloud(&self) -> Option<&[[f32; 3]]> {
        match self {
            RecordPayload::PointCloud { points } => Some(points),
            _ => None,
        }
    }
}

/// One timestamped raw sample read from a source.
///
/// Immutable once produced; ownership moves to the scheduler when the
/// source yields it.
#[derive(Debug, Clone)]
pub struct LogRecord {
    /// Topic this record belongs to
    pub topic: String,
    /// Raw sample payload
    pub payload: RecordPayload,
    /// Absolute timestamp in microseconds since epoch
    pub timestamp_us: u64,
}

impl LogRecord {
    /// Create a new record.
    #[inline]
    pub fn new(topic: impl Into<String>, payload: RecordPayload, timestamp_us: u64) -> Self {
        Self {
            topic: topic.into(),
            payload,
            timestamp_us,
        }
    }
}
