//! Session configuration.
//!
//! Loads from a TOML file with serde defaults; every table can be omitted.
//! The historical mount poses and survey origin are preserved as defaults
//! so an empty config replays byte-identically to older conversions.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::types::Pose3D;
use crate::error::{Error, Result};

/// Top-level replay configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// Channel-name allowlist; an empty list enables every channel.
    pub channels: Vec<String>,
    /// Source declarations, in registration (merge tie-break) order.
    pub sources: Vec<SourceConfig>,
    /// Camera channel settings
    pub camera: CameraConfig,
    /// Lidar channel settings
    pub lidar: LidarConfig,
    /// Pose channel settings
    pub pose: PoseConfig,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            channels: Vec::new(),
            sources: vec![
                SourceConfig::of_kind("synthetic_camera"),
                SourceConfig::of_kind("synthetic_position"),
            ],
            camera: CameraConfig::default(),
            lidar: LidarConfig::default(),
            pose: PoseConfig::default(),
        }
    }
}

impl ReplayConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| Error::Fetch {
            resource: path.display().to_string(),
            reason: e.to_string(),
        })?;
        basic_toml::from_str(&contents)
            .map_err(|e| Error::InvalidFormat(format!("config {}: {}", path.display(), e)))
    }
}

/// One source declaration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceConfig {
    /// Source kind: `synthetic_camera`, `image_dir`, `point_table`,
    /// `synthetic_position`, or `json_track`.
    pub kind: String,
    /// Input path for file-backed kinds, relative to the session path.
    /// Defaults per kind (`camera/`, `lidar/`, `track.json`).
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Topic override; defaults per kind.
    #[serde(default)]
    pub topic: Option<String>,
}

impl SourceConfig {
    /// Declaration with a kind and per-kind defaults for everything else.
    pub fn of_kind(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            path: None,
            topic: None,
        }
    }
}

/// Camera channel settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Extrinsic camera mount pose
    pub extrinsic: Pose3D,
    /// JPEG encoding quality, 1-100
    pub jpeg_quality: u8,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            // Historical mount point of the recorded rig.
            extrinsic: Pose3D::new(0.0, -10.0, 2.0, 0.0, -0.05, 1.0),
            jpeg_quality: 90,
        }
    }
}

/// Lidar channel settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LidarConfig {
    /// Extrinsic lidar mount pose
    pub extrinsic: Pose3D,
}

impl Default for LidarConfig {
    fn default() -> Self {
        Self {
            extrinsic: Pose3D::identity(),
        }
    }
}

/// Fixed survey origin for planar-offset position recordings.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct PlanarOrigin {
    /// Origin easting in meters
    pub x: f64,
    /// Origin northing in meters
    pub y: f64,
}

/// Pose channel settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PoseConfig {
    /// Survey origin added to planar-offset samples
    pub origin: PlanarOrigin,
}

impl Default for PoseConfig {
    fn default() -> Self {
        Self {
            origin: PlanarOrigin {
                x: 587_502.201_664_793_9,
                y: 4_140_476.188_198_31,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_config() {
        let config = ReplayConfig::default();
        assert_eq!(config.sources.len(), 2);
        assert_eq!(config.sources[0].kind, "synthetic_camera");
        assert!(config.channels.is_empty());
        assert_eq!(config.camera.jpeg_quality, 90);
        assert_relative_eq!(config.camera.extrinsic.y, -10.0);
        assert_relative_eq!(config.pose.origin.x, 587_502.201_664_793_9);
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            channels = ["pose"]

            [[sources]]
            kind = "json_track"
            path = "gps/track.json"

            [camera]
            jpeg_quality = 75

            [pose]
            origin = { x = 100.0, y = 200.0 }
        "#;
        let config: ReplayConfig = basic_toml::from_str(toml).unwrap();
        assert_eq!(config.channels, vec!["pose".to_string()]);
        assert_eq!(config.sources.len(), 1);
        assert_eq!(config.sources[0].kind, "json_track");
        assert_eq!(
            config.sources[0].path.as_deref(),
            Some(Path::new("gps/track.json"))
        );
        assert_eq!(config.camera.jpeg_quality, 75);
        // Omitted tables keep their defaults.
        assert_relative_eq!(config.camera.extrinsic.z, 2.0);
        assert_relative_eq!(config.pose.origin.y, 200.0);
    }
}
