//! SmritiReplay - Drive log replay engine
//!
//! Replays heterogeneous recorded sensor streams (camera frames, lidar
//! point clouds, position samples) as a single time-ordered stream, paced
//! to a host-supplied playback offset, converting each record into its
//! channel's structured output.
//!
//! # Architecture
//!
//! The crate is organized into 4 logical layers:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                    replay/                          │  ← Orchestration
//! │           (session, scheduler, mailbox)             │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │              sources/   adapters/                   │  ← Streams
//! │      (record producers, channel conversion)         │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │              geo   config   telemetry               │  ← Services
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                     core/                           │  ← Foundation
//! │                    (types)                          │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Replay model
//!
//! Every source yields a lazy, finite, timestamp-ordered record stream
//! for one topic. The scheduler merges the streams by timestamp (ties by
//! registration order) and never surfaces a record past the host's target
//! offset; a record pulled too early is parked in a single lookahead slot.
//! Each surfaced record lands in the session mailbox, the adapter for its
//! topic converts it, and the host is told which channel became ready.
//!
//! Execution is single-threaded and pull-based: sources may block on I/O
//! inside a `read` call, nothing runs between calls, and the mailbox
//! needs no locking.

// ============================================================================
// Layer 1: Core foundation (no internal deps)
// ============================================================================
pub mod core;

// ============================================================================
// Layer 2: Services (depends on core)
// ============================================================================
pub mod config;
pub mod error;
pub mod geo;
pub mod telemetry;

// ============================================================================
// Layer 3: Streams (depends on core, services)
// ============================================================================
pub mod adapters;
pub mod sources;

// ============================================================================
// Layer 4: Replay orchestration (depends on all layers)
// ============================================================================
pub mod replay;

// ============================================================================
// Convenience re-exports (flat namespace for common use)
// ============================================================================

// Core types
pub use core::types::{CameraImage, ChannelOutput, LidarCloud, PoseSample, PoseSection};
pub use core::types::{LogRecord, Pose3D, RecordPayload, Velocity};
pub use core::types::{CAMERA_TOPIC, LIDAR_TOPIC, POSITION_TOPIC};

// Services
pub use config::{CameraConfig, LidarConfig, PlanarOrigin, PoseConfig, ReplayConfig, SourceConfig};
pub use error::{Error, Result};
pub use geo::{latlong_to_utm, velocity_heading, UtmCoordinate};
pub use telemetry::{LogTelemetry, NullTelemetry, SharedTelemetry, TelemetrySink};

// Sources
pub use sources::{
    create_source, ImageDirCameraSource, JsonTrackSource, LogSource, PointTableSource,
    SourceInfo, SyntheticCameraSource, SyntheticPositionSource,
};

// Adapters
pub use adapters::{
    CameraAdapter, ChannelAdapter, LidarAdapter, PoseAdapter, CAMERA_CHANNEL, LIDAR_CHANNEL,
    POSE_CHANNEL,
};

// Replay
pub use replay::{DriveSession, Mailbox, Poll, ReadOutput, ReplayScheduler};
