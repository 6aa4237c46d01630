//! Replay Session Scenarios
//!
//! End-to-end tests of the drive session: pacing, merge ordering,
//! exhaustion, and per-channel conversion, using the synthetic sources
//! and small file-backed recordings. Verifies:
//! - Ready-events are independent of how offset jumps are batched
//! - Pacing replies are idempotent at a fixed target offset
//! - Exhaustion is terminal
//! - The 120-tick position / 10-frame camera drive converts completely
//!
//! Run with: `cargo test --test replay_session`

use std::io::Write as _;
use std::path::Path;
use std::sync::Arc;

use flate2::write::GzEncoder;
use flate2::Compression;
use tempfile::TempDir;

use smriti_replay::{
    ChannelAdapter, DriveSession, Error, LogRecord, LogSource, NullTelemetry, PoseAdapter,
    PoseConfig, ReadOutput, ReplayConfig, Result, SourceConfig, SourceInfo,
    SyntheticCameraSource, SyntheticPositionSource,
};

// ============================================================================
// Test Helpers
// ============================================================================

const STEP_US: u64 = 100_000;

/// Session over the default synthetic drive (camera + position).
fn synthetic_session() -> DriveSession {
    let config = ReplayConfig::default();
    DriveSession::from_config(&config, Arc::new(NullTelemetry)).unwrap()
}

/// Drive a session to exhaustion, stepping the target offset by `step_us`
/// on every call. Returns the `(channel, offset)` ready events in order.
fn drive_to_exhaustion(session: &mut DriveSession, step_us: u64) -> Vec<(String, u64)> {
    let mut events = Vec::new();
    let mut target_offset_us = 0u64;
    for _ in 0..5_000 {
        let output = session.read(target_offset_us).unwrap();
        if !output.data_remaining {
            return events;
        }
        for channel in &output.channels_ready {
            events.push((channel.clone(), output.offset_reached_us));
        }
        target_offset_us += step_us;
    }
    panic!("session did not exhaust");
}

/// Source that always fails its first read.
#[derive(Debug)]
struct FailingSource;

impl LogSource for FailingSource {
    fn topic(&self) -> &str {
        "position"
    }

    fn open(&mut self, _path: &Path) -> Result<SourceInfo> {
        Ok(SourceInfo {
            start_timestamp_us: 0,
        })
    }

    fn read_next(&mut self) -> Result<Option<LogRecord>> {
        Err(Error::Fetch {
            resource: "remote://drive/positions".to_string(),
            reason: "connection reset".to_string(),
        })
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

// ============================================================================
// End-To-End Synthetic Drive
// ============================================================================

#[test]
fn test_synthetic_drive_converts_every_record() {
    let mut session = synthetic_session();
    let anchor_us = session.open(Path::new(".")).unwrap();
    // Position stream starts half a second before the camera stream.
    assert_eq!(anchor_us, 1_668_741_575_000_000);

    let events = drive_to_exhaustion(&mut session, STEP_US);

    let pose_events = events.iter().filter(|(c, _)| c == "pose").count();
    let camera_events = events.iter().filter(|(c, _)| c == "camera_0").count();
    assert_eq!(pose_events, 120);
    assert_eq!(camera_events, 10);
    assert_eq!(events.len(), 130);

    // Ready offsets never go backwards across the whole session.
    for pair in events.windows(2) {
        assert!(pair[0].1 <= pair[1].1);
    }

    // The exhaustion reply is terminal and shape-stable.
    for _ in 0..3 {
        let output = session.read(20_000_000).unwrap();
        assert_eq!(
            output,
            ReadOutput {
                offset_reached_us: 0,
                data_remaining: false,
                channels_ready: Vec::new(),
            }
        );
    }

    session.close().unwrap();
}

#[test]
fn test_ready_events_independent_of_batching() {
    // Fine-grained schedule: 100 ms steps.
    let mut stepped = synthetic_session();
    stepped.open(Path::new(".")).unwrap();
    let fine = drive_to_exhaustion(&mut stepped, STEP_US);

    // Coarse schedule: one giant jump past the end of the drive.
    let mut jumped = synthetic_session();
    jumped.open(Path::new(".")).unwrap();
    let coarse = drive_to_exhaustion(&mut jumped, 20_000_000);

    assert_eq!(fine, coarse);
}

#[test]
fn test_converted_outputs_reachable_after_ready() {
    let mut session = synthetic_session();
    session.open(Path::new(".")).unwrap();

    // Nothing is converted before the first read.
    assert!(session.convert("camera_0").is_none());
    assert!(session.convert("pose").is_none());

    drive_to_exhaustion(&mut session, STEP_US);

    let camera = session.convert("camera_0").unwrap().as_camera().unwrap();
    assert_eq!((camera.width, camera.height), (600, 400));
    // JPEG SOI marker.
    assert_eq!(&camera.image_bytes[..2], &[0xFF, 0xD8]);

    let pose = session.convert("pose").unwrap().as_pose().unwrap();
    assert_eq!(pose.sections.len(), 1);

    // No lidar source in this drive: channel never becomes ready.
    assert!(session.convert("lidar_0").is_none());
}

// ============================================================================
// Pacing
// ============================================================================

#[test]
fn test_paced_read_is_idempotent() {
    // Camera-only drive: the first frame sits at offset zero, the second a
    // full second later.
    let sources: Vec<Box<dyn LogSource>> =
        vec![Box::new(SyntheticCameraSource::new("camera"))];
    let adapters: Vec<Box<dyn ChannelAdapter>> = Vec::new();
    let mut session = DriveSession::new(sources, adapters);
    session.open(Path::new(".")).unwrap();

    // Frame 0 is consumed silently (no adapter); frame 1 is beyond the
    // target, so the session reports "not ready" at the requested offset.
    let first = session.read(500_000).unwrap();
    assert_eq!(
        first,
        ReadOutput {
            offset_reached_us: 500_000,
            data_remaining: true,
            channels_ready: Vec::new(),
        }
    );

    // Identical request, identical reply, no source activity in between.
    for _ in 0..3 {
        assert_eq!(session.read(500_000).unwrap(), first);
    }

    // A smaller target is just as stable.
    let smaller = session.read(400_000).unwrap();
    assert_eq!(smaller.offset_reached_us, 400_000);
    assert!(smaller.data_remaining);
    assert!(smaller.channels_ready.is_empty());
}

#[test]
fn test_parked_record_released_by_larger_target() {
    let sources: Vec<Box<dyn LogSource>> =
        vec![Box::new(SyntheticPositionSource::new("position"))];
    let adapters: Vec<Box<dyn ChannelAdapter>> = vec![Box::new(PoseAdapter::new(
        &PoseConfig::default(),
        Arc::new(NullTelemetry),
    ))];
    let mut session = DriveSession::new(sources, adapters);
    session.open(Path::new(".")).unwrap();

    // Tick 0 at offset 0 converts immediately.
    let output = session.read(0).unwrap();
    assert_eq!(output.channels_ready, vec!["pose".to_string()]);
    assert_eq!(output.offset_reached_us, 0);

    // Tick 1 (100 ms) is pulled, found too far at 50 ms, and parked.
    assert!(session.read(50_000).unwrap().channels_ready.is_empty());

    // The larger target releases the parked record, not a fresh pull.
    let released = session.read(100_000).unwrap();
    assert_eq!(released.channels_ready, vec!["pose".to_string()]);
    assert_eq!(released.offset_reached_us, 100_000);
}

// ============================================================================
// Merge Ordering
// ============================================================================

#[test]
fn test_equal_timestamps_deliver_in_registration_order() {
    // Two position streams with identical tick timing; only the
    // registration order can decide who goes first.
    let sources: Vec<Box<dyn LogSource>> = vec![
        Box::new(SyntheticPositionSource::new("position")),
        Box::new(SyntheticPositionSource::new("position_aux")),
    ];
    let adapters: Vec<Box<dyn ChannelAdapter>> = vec![
        Box::new(PoseAdapter::new(
            &PoseConfig::default(),
            Arc::new(NullTelemetry),
        )),
        Box::new(
            PoseAdapter::new(&PoseConfig::default(), Arc::new(NullTelemetry))
                .with_ids("position_aux", "pose_aux"),
        ),
    ];
    let mut session = DriveSession::new(sources, adapters);
    session.open(Path::new(".")).unwrap();

    let mut ready = Vec::new();
    for _ in 0..6 {
        let output = session.read(u64::MAX).unwrap();
        ready.extend(output.channels_ready);
    }
    assert_eq!(
        ready,
        vec!["pose", "pose_aux", "pose", "pose_aux", "pose", "pose_aux"]
    );
}

#[test]
fn test_unmatched_topics_consumed_silently() {
    // A ghost stream with no adapter shares every tick timestamp with the
    // position stream. Reads must never come back empty-handed while
    // in-range data remains.
    let sources: Vec<Box<dyn LogSource>> = vec![
        Box::new(SyntheticPositionSource::new("ghost")),
        Box::new(SyntheticPositionSource::new("position")),
    ];
    let adapters: Vec<Box<dyn ChannelAdapter>> = vec![Box::new(PoseAdapter::new(
        &PoseConfig::default(),
        Arc::new(NullTelemetry),
    ))];
    let mut session = DriveSession::new(sources, adapters);
    session.open(Path::new(".")).unwrap();

    let mut events = 0;
    loop {
        let output = session.read(u64::MAX).unwrap();
        if !output.data_remaining {
            break;
        }
        assert_eq!(output.channels_ready.len(), 1, "no empty ready-sets");
        assert_eq!(output.channels_ready[0], "pose");
        events += 1;
    }
    assert_eq!(events, 120);
}

// ============================================================================
// Failure Policy
// ============================================================================

#[test]
fn test_source_fetch_error_fails_the_read() {
    let sources: Vec<Box<dyn LogSource>> = vec![Box::new(FailingSource)];
    let mut session = DriveSession::new(sources, Vec::new());
    session.open(Path::new(".")).unwrap();

    let err = session.read(0).unwrap_err();
    assert!(matches!(err, Error::Fetch { .. }));
}

#[test]
fn test_lifecycle_misuse_is_rejected() {
    let mut session = synthetic_session();
    assert!(matches!(
        session.read(0).unwrap_err(),
        Error::InvalidState(_)
    ));
    assert!(matches!(
        session.close().unwrap_err(),
        Error::InvalidState(_)
    ));

    session.open(Path::new(".")).unwrap();
    assert!(matches!(
        session.open(Path::new(".")).unwrap_err(),
        Error::InvalidState(_)
    ));

    session.close().unwrap();
    assert!(matches!(
        session.read(0).unwrap_err(),
        Error::InvalidState(_)
    ));
    assert!(matches!(
        session.close().unwrap_err(),
        Error::InvalidState(_)
    ));
}

// ============================================================================
// File-Backed Drive
// ============================================================================

fn write_point_table(path: &Path, rows: &[[f32; 4]]) {
    let file = std::fs::File::create(path).unwrap();
    let mut encoder = GzEncoder::new(file, Compression::default());
    writeln!(encoder, "x,y,z,i").unwrap();
    for row in rows {
        writeln!(encoder, "{},{},{},{}", row[0], row[1], row[2], row[3]).unwrap();
    }
    encoder.finish().unwrap();
}

/// Lay out a small recorded drive: two camera frames, two lidar clouds,
/// and a three-sample GPS track.
fn write_recorded_drive(root: &Path) {
    let camera_dir = root.join("camera");
    std::fs::create_dir(&camera_dir).unwrap();
    for i in 0..2u32 {
        let img = image::RgbImage::from_pixel(6, 4, image::Rgb([(i * 100) as u8, 0, 0]));
        img.save(camera_dir.join(format!("{:02}.png", i))).unwrap();
    }

    let lidar_dir = root.join("lidar");
    std::fs::create_dir(&lidar_dir).unwrap();
    write_point_table(&lidar_dir.join("00.csv.gz"), &[[1.0, 2.0, 3.0, 0.9]]);
    write_point_table(
        &lidar_dir.join("01.csv.gz"),
        &[[4.0, 5.0, 6.0, 0.1], [7.0, 8.0, 9.0, 0.2]],
    );

    std::fs::write(
        root.join("track.json"),
        r#"[
            {"lat": 0.0, "long": 0.0, "x_velocity": 1.0, "y_velocity": 0.0},
            {"lat": 0.0001, "long": 0.0001},
            {"lat": 0.0002, "long": 0.0002}
        ]"#,
    )
    .unwrap();
}

#[test]
fn test_recorded_drive_end_to_end() {
    let temp = TempDir::new().unwrap();
    write_recorded_drive(temp.path());

    let mut config = ReplayConfig::default();
    config.sources = vec![
        SourceConfig::of_kind("image_dir"),
        SourceConfig::of_kind("point_table"),
        SourceConfig::of_kind("json_track"),
    ];

    let mut session = DriveSession::from_config(&config, Arc::new(NullTelemetry)).unwrap();
    session.open(temp.path()).unwrap();
    let events = drive_to_exhaustion(&mut session, STEP_US);

    let count = |channel: &str| events.iter().filter(|(c, _)| c == channel).count();
    assert_eq!(count("camera_0"), 2);
    assert_eq!(count("lidar_0"), 2);
    assert_eq!(count("pose"), 3);

    // The last lidar cloud is two rows of seven little-endian floats
    // behind the 20-byte header.
    let cloud = session.convert("lidar_0").unwrap().as_lidar().unwrap();
    assert_eq!(cloud.points.len(), 20 + 2 * 7 * 4);
    let field_count = u32::from_le_bytes(cloud.points[16..20].try_into().unwrap());
    assert_eq!(field_count, 7);

    // Geodetic conversions carry a velocity section.
    let pose = session.convert("pose").unwrap().as_pose().unwrap();
    assert_eq!(pose.sections.len(), 1);
    assert!(pose.velocity.is_some());

    session.close().unwrap();
}
