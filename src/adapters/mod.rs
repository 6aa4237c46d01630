//! Channel adapters: convert the latest raw record for a topic into a
//! channel's structured output.

pub mod camera;
pub mod lidar;
pub mod pose;

use crate::core::types::ChannelOutput;
use crate::error::Result;
use crate::replay::Mailbox;

pub use camera::CameraAdapter;
pub use lidar::LidarAdapter;
pub use pose::PoseAdapter;

/// Default camera output channel.
pub const CAMERA_CHANNEL: &str = "camera_0";
/// Default lidar output channel.
pub const LIDAR_CHANNEL: &str = "lidar_0";
/// Default pose output channel.
pub const POSE_CHANNEL: &str = "pose";

/// Converts raw records on one topic into one output channel.
///
/// `update` reads the latest raw record for the adapter's topic from the
/// mailbox and replaces the held conversion; it fails with
/// `Error::MissingChannelData` when no record for the topic has ever
/// arrived. `output` is side-effect-free and returns the same snapshot
/// until the next successful `update`.
pub trait ChannelAdapter {
    /// Topic this adapter reads from.
    fn topic(&self) -> &str;

    /// Channel this adapter feeds.
    fn channel(&self) -> &str;

    /// Convert the latest raw record for this adapter's topic.
    fn update(&mut self, mailbox: &Mailbox) -> Result<()>;

    /// Snapshot of the last successful conversion, `None` before the first.
    fn output(&self) -> Option<ChannelOutput>;
}
