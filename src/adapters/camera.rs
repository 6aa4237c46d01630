//! Camera channel adapter: JPEG encoding plus extrinsic mount pose.

use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;

use crate::config::CameraConfig;
use crate::core::types::{CameraImage, ChannelOutput, Pose3D, CAMERA_TOPIC};
use crate::error::{Error, Result};
use crate::replay::Mailbox;

use super::{ChannelAdapter, CAMERA_CHANNEL};

/// Converts raw RGB frames into JPEG camera images.
#[derive(Debug)]
pub struct CameraAdapter {
    topic: String,
    channel: String,
    extrinsic: Pose3D,
    jpeg_quality: u8,
    last: Option<CameraImage>,
}

impl CameraAdapter {
    /// Create an adapter on the default camera topic/channel.
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            topic: CAMERA_TOPIC.to_string(),
            channel: CAMERA_CHANNEL.to_string(),
            extrinsic: config.extrinsic,
            jpeg_quality: config.jpeg_quality,
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

impl ChannelAdapter for CameraAdapter {
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
        let (pixels, width, height) = payload.as_camera_frame().ok_or_else(|| {
            Error::InvalidFormat(format!(
                "topic '{}' carried a {} payload, expected camera_frame",
                self.topic,
                payload.kind()
            ))
        })?;

        let frame = RgbImage::from_raw(width, height, pixels.to_vec()).ok_or_else(|| {
            Error::InvalidFormat(format!(
                "frame buffer of {} bytes does not match {}x{}",
                pixels.len(),
                width,
                height
            ))
        })?;

        let mut image_bytes = Vec::new();
        let mut encoder = JpegEncoder::new_with_quality(&mut image_bytes, self.jpeg_quality);
        encoder
            .encode_image(&frame)
            .map_err(|e| Error::InvalidFormat(format!("jpeg encode: {}", e)))?;

        self.last = Some(CameraImage {
            image_bytes,
            width,
            height,
            pose: self.extrinsic,
        });
        Ok(())
    }

    fn output(&self) -> Option<ChannelOutput> {
        self.last.clone().map(ChannelOutput::Camera)
    }
}
