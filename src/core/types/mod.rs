//! Value types: raw records, poses, and converted channel outputs.

mod outputs;
mod pose;
mod record;

pub use outputs::{CameraImage, ChannelOutput, LidarCloud, PoseSample, PoseSection};
pub use pose::{Pose3D, Velocity};
pub use record::{LogRecord, RecordPayload, CAMERA_TOPIC, LIDAR_TOPIC, POSITION_TOPIC};
