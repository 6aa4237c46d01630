//! Lidar channel adapter: frame conversion and wire packing.
//!
//! Wire layout: a 20-byte little-endian header (`u64` timestamp, two `u32`
//! reserved words, `u32` field count) followed by the row-major N×7 `f32`
//! array with columns `[x, y, z, intensity, channel, instance_id,
//! semantic_class]`.

use crate::config::LidarConfig;
use crate::core::types::{ChannelOutput, LidarCloud, Pose3D, LIDAR_TOPIC};
use crate::error::{Error, Result};
use crate::replay::Mailbox;

use super::{ChannelAdapter, LIDAR_CHANNEL};

/// Fields per packed point row.
pub const POINT_FIELD_COUNT: u32 = 7;
/// Packed wire header length in bytes.
pub const CLOUD_HEADER_LEN: usize = 20;

/// Pack an N×3 right-handed point array into the left-handed wire layout.
///
/// The four extra columns (intensity, channel, instance id, semantic
/// class) are zero-filled. Axis conversion: `x' = -y`, `y' = -x`,
/// `z' = z`.
pub fn pack_cloud(points: &[[f32; 3]]) -> Vec<u8> {
    let mut bytes =
        Vec::with_capacity(CLOUD_HEADER_LEN + points.len() * POINT_FIELD_COUNT as usize * 4);
    bytes.extend_from_slice(&0u64.to_le_bytes()); // timestamp (reserved)
    bytes.extend_from_slice(&0u32.to_le_bytes()); // reserved
    bytes.extend_from_slice(&0u32.to_le_bytes()); // reserved
    bytes.extend_from_slice(&POINT_FIELD_COUNT.to_le_bytes());

    for point in points {
        let row = [-point[1], -point[0], point[2], 0.0, 0.0, 0.0, 0.0];
        for value in row {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
    }
    bytes
}

/// Converts raw point clouds into packed wire clouds.
#[derive(Debug)]
pub struct LidarAdapter {
    topic: String,
    channel: String,
    extrinsic: Pose3D,
    last: Option<LidarCloud>,
}

impl LidarAdapter {
    /// Create an adapter on the default lidar topic/channel.
    pub fn new(config: &LidarConfig) -> Self {
        Self {
            topic: LIDAR_TOPIC.to_string(),
            channel: LIDAR_CHANNEL.to_string(),
            extrinsic: config.extrinsic,
            last: None,
        }
    }

    /// Rebind the adapter to a different topic/channel pair.
    pub fn with_ids(mut self, topic: impl Into<String>, channel: impl Into<String>) -> Self {
        self.topic = topic.into();
        self.channel = channel.into();
        self
    }
}

impl ChannelAdapter for LidarAdapter {
    fn topic(&self) -> &str {
        &self.topic
    }

    fn channel(&self) -> &str {
        &self.channel
    }

    fn update(&mut self, mailbox: &Mailbox) -> Result<()> {
        let payload = mailbox
            .latest_message(&self.topic)
            .ok_or_else(|| Error::MissingChannelData {
                topic: self.topic.clone(),
            })?;
        let points = payload.as_point_cloud().ok_or_else(|| {
            Error::InvalidFormat(format!(
                "topic '{}' carried a {} payload, expected point_cloud",
                self.topic,
                payload.kind()
            ))
        })?;

        self.last = Some(LidarCloud {
            points: pack_cloud(points),
            pose: self.extrinsic,
        });
        Ok(())
    }

    fn output(&self) -> Option<ChannelOutput> {
        self.last.clone().map(ChannelOutput::Lidar)
    }
}
