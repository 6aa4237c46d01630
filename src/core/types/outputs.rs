//! Converted per-channel outputs handed to the host.

use serde::{Deserialize, Serialize};

use super::pose::{Pose3D, Velocity};

/// Encoded camera image with mount pose.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraImage {
    /// JPEG-encoded image bytes
    pub image_bytes: Vec<u8>,
    /// Source frame width in pixels
    pub width: u32,
    /// Source frame height in pixels
    pub height: u32,
    /// Extrinsic camera mount pose
    pub pose: Pose3D,
}

/// Packed lidar cloud with mount pose.
///
/// `points` holds the wire layout: a 20-byte little-endian header followed
/// by row-major N×7 `f32` fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LidarCloud {
    /// Packed wire bytes (header + flattened rows)
    pub points: Vec<u8>,
    /// Extrinsic lidar mount pose
    pub pose: Pose3D,
}

/// One section of a pose sample.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PoseSection {
    /// Section pose
    pub pose: Pose3D,
}

/// Converted vehicle pose sample.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoseSample {
    /// Pose sections (a single section in the current conversions)
    pub sections: Vec<PoseSection>,
    /// Instantaneous velocity, when the recording carries one
    pub velocity: Option<Velocity>,
}

/// Converted output for one channel.
///
/// An immutable snapshot; the next conversion on the same channel replaces
/// it wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ChannelOutput {
    /// Encoded camera image
    Camera(CameraImage),
    /// Packed lidar cloud
    Lidar(LidarCloud),
    /// Vehicle pose sample
    Pose(PoseSample),
}

impl ChannelOutput {
    /// Get as a camera image if this is that kind.
    pub fn as_camera(&self) -> Option<&CameraImage> {
        match self {
            ChannelOutput::Camera(image) => Some(image),
            _ => None,
        }
    }

    /// Get as a lidar cloud if this is that kind.
    pub fn as_lidar(&self) -> Option<&LidarCloud> {
        match self {
            ChannelOutput::Lidar(cloud) => Some(cloud),
            _ => None,
        }
    }

    /// Get as a pose sample if this is that kind.
    pub fn as_pose(&self) -> Option<&PoseSample> {
        match self {
            ChannelOutput::Pose(sample) => Some(sample),
            _ => None,
        }
    }
}
