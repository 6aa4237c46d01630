//! Pose channel adapter.
//!
//! Handles both position recording shapes: planar offsets are translated
//! by the configured survey origin, geodetic fixes are projected to UTM
//! with the heading taken from the velocity vector.

use crate::config::{PlanarOrigin, PoseConfig};
use crate::core::types::{
    ChannelOutput, Pose3D, PoseSample, PoseSection, RecordPayload, Velocity, POSITION_TOPIC,
};
use crate::error::{Error, Result};
use crate::geo::{latlong_to_utm, velocity_heading};
use crate::replay::Mailbox;
use crate::telemetry::SharedTelemetry;

use super::{ChannelAdapter, POSE_CHANNEL};

/// Converts raw position samples into pose samples.
pub struct PoseAdapter {
    topic: String,
    channel: String,
    origin: PlanarOrigin,
    telemetry: SharedTelemetry,
    last: Option<PoseSample>,
}

impl PoseAdapter {
    /// Create an adapter on the default position topic / pose channel.
    pub fn new(config: &PoseConfig, telemetry: SharedTelemetry) -> Self {
        Self {
            topic: POSITION_TOPIC.to_string(),
            channel: POSE_CHANNEL.to_string(),
            origin: config.origin,
            telemetry,
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

impl ChannelAdapter for PoseAdapter {
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

        let sample = match payload {
            RecordPayload::PlanarOffset { x, y } => {
                self.telemetry.send_scalar("x offset", *x);
                self.telemetry.send_scalar("y offset", *y);
                PoseSample {
                    sections: vec![PoseSection {
                        pose: Pose3D::new(
                            x + self.origin.x,
                            y + self.origin.y,
                            0.0,
                            0.0,
                            0.0,
                            0.0,
                        ),
                    }],
                    velocity: None,
                }
            }
            RecordPayload::GeodeticFix {
                latitude,
                longitude,
                x_velocity,
                y_velocity,
            } => {
                let utm = latlong_to_utm(*latitude, *longitude);
                let heading = velocity_heading(*x_velocity, *y_velocity);
                PoseSample {
                    sections: vec![PoseSection {
                        pose: Pose3D::new(utm.easting_m, utm.northing_m, 0.0, 0.0, 0.0, heading),
                    }],
                    velocity: Some(Velocity::planar(*x_velocity, *y_velocity)),
                }
            }
            other => {
                return Err(Error::InvalidFormat(format!(
                    "topic '{}' carried a {} payload, expected a position sample",
                    self.topic,
                    other.kind()
                )))
            }
        };

        self.last = Some(sample);
        Ok(())
    }

    fn output(&self) -> Option<ChannelOutput> {
        self.last.clone().map(ChannelOutput::Pose)
    }
}
