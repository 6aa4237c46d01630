//! Drive session orchestration.
//!
//! The host-facing lifecycle object: open once, call `read` repeatedly
//! with a non-decreasing target offset until no data remains, query
//! converted outputs with `convert`, close once.

use std::path::Path;

use crate::adapters::{CameraAdapter, ChannelAdapter, LidarAdapter, PoseAdapter};
use crate::config::ReplayConfig;
use crate::core::types::ChannelOutput;
use crate::error::{Error, Result};
use crate::replay::{Mailbox, Poll, ReplayScheduler};
use crate::sources::{create_source, LogSource};
use crate::telemetry::SharedTelemetry;

/// Result of one `read` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOutput {
    /// Offset of the converted record, or the requested target when no
    /// record was ready, microseconds from the session anchor
    pub offset_reached_us: u64,
    /// False once every source is exhausted and nothing is parked
    pub data_remaining: bool,
    /// Channels whose output was refreshed by this call (at most one)
    pub channels_ready: Vec<String>,
}

enum SessionState {
    Unopened,
    Open,
    Closed,
}

/// A replay session over one recorded drive.
///
/// Owns the sources (via the scheduler once opened), the channel
/// adapters, and the shared mailbox.
pub struct DriveSession {
    state: SessionState,
    pending_sources: Vec<Box<dyn LogSource>>,
    scheduler: Option<ReplayScheduler>,
    adapters: Vec<Box<dyn ChannelAdapter>>,
    mailbox: Mailbox,
}

impl DriveSession {
    /// Create a session from explicit sources and adapters.
    ///
    /// Source order is the merge tie-break order.
    pub fn new(
        sources: Vec<Box<dyn LogSource>>,
        adapters: Vec<Box<dyn ChannelAdapter>>,
    ) -> Self {
        Self {
            state: SessionState::Unopened,
            pending_sources: sources,
            scheduler: None,
            adapters,
            mailbox: Mailbox::new(),
        }
    }

    /// Create a session from configuration.
    ///
    /// Sources come from the config's `[[sources]]` list; one adapter per
    /// known channel is registered, filtered by the channel allowlist.
    pub fn from_config(config: &ReplayConfig, telemetry: SharedTelemetry) -> Result<Self> {
        let mut sources = Vec::with_capacity(config.sources.len());
        for declaration in &config.sources {
            sources.push(create_source(declaration, telemetry.clone())?);
        }

        let enabled = |channel: &str| {
            config.channels.is_empty() || config.channels.iter().any(|name| name == channel)
        };
        let mut adapters: Vec<Box<dyn ChannelAdapter>> = Vec::new();
        let camera = CameraAdapter::new(&config.camera);
        if enabled(camera.channel()) {
            adapters.push(Box::new(camera));
        }
        let lidar = LidarAdapter::new(&config.lidar);
        if enabled(lidar.channel()) {
            adapters.push(Box::new(lidar));
        }
        let pose = PoseAdapter::new(&config.pose, telemetry);
        if enabled(pose.channel()) {
            adapters.push(Box::new(pose));
        }

        Ok(Self::new(sources, adapters))
    }

    /// Open every source and fix the session anchor.
    ///
    /// Returns the anchor: the minimum start timestamp reported across
    /// sources, microseconds since epoch.
    pub fn open(&mut self, path: &Path) -> Result<u64> {
        match self.state {
            SessionState::Unopened => {}
            SessionState::Open => return Err(Error::InvalidState("open called twice")),
            SessionState::Closed => return Err(Error::InvalidState("open after close")),
        }

        let mut sources = std::mem::take(&mut self.pending_sources);
        let mut anchor_us = u64::MAX;
        for source in &mut sources {
            let info = source.open(path)?;
            log::info!(
                "source '{}' starts at {} us",
                source.topic(),
                info.start_timestamp_us
            );
            anchor_us = anchor_us.min(info.start_timestamp_us);
        }
        if anchor_us == u64::MAX {
            anchor_us = 0;
        }

        self.scheduler = Some(ReplayScheduler::new(sources, anchor_us));
        self.state = SessionState::Open;
        log::info!("drive session open, anchor {} us", anchor_us);
        Ok(anchor_us)
    }

    /// Advance replay up to `target_offset_us`.
    ///
    /// Converts at most one record per call. Records on topics with no
    /// registered adapter are consumed silently and the next record is
    /// pulled, so an empty ready-set only means the merge is paced out or
    /// exhausted.
    pub fn read(&mut self, target_offset_us: u64) -> Result<ReadOutput> {
        match self.state {
            SessionState::Open => {}
            SessionState::Unopened => return Err(Error::InvalidState("read before open")),
            SessionState::Closed => return Err(Error::InvalidState("read after close")),
        }
        let scheduler = self
            .scheduler
            .as_mut()
            .ok_or(Error::InvalidState("read before open"))?;

        loop {
            match scheduler.poll(target_offset_us)? {
                Poll::Pending => {
                    return Ok(ReadOutput {
                        offset_reached_us: target_offset_us,
                        data_remaining: true,
                        channels_ready: Vec::new(),
                    });
                }
                Poll::Drained => {
                    return Ok(ReadOutput {
                        offset_reached_us: 0,
                        data_remaining: false,
                        channels_ready: Vec::new(),
                    });
                }
                Poll::Ready(record) => {
                    let offset_us = scheduler.offset_us(&record);
                    let topic = record.topic.clone();
                    self.mailbox.put_message(record.topic, record.payload);

                    if let Some(adapter) = self
                        .adapters
                        .iter_mut()
                        .find(|adapter| adapter.topic() == topic)
                    {
                        adapter.update(&self.mailbox)?;
                        let channel = adapter.channel().to_string();
                        if let Some(output) = adapter.output() {
                            self.mailbox.put_output(channel.clone(), output);
                        }
                        return Ok(ReadOutput {
                            offset_reached_us: offset_us,
                            data_remaining: true,
                            channels_ready: vec![channel],
                        });
                    }
                    log::debug!("no adapter for topic '{}', record consumed", topic);
                }
            }
        }
    }

    /// Latest converted output for a channel, if any conversion has run.
    pub fn convert(&self, channel: &str) -> Option<&ChannelOutput> {
        self.mailbox.latest_output(channel)
    }

    /// Close every source. Call exactly once, after the last `read`.
    pub fn close(&mut self) -> Result<()> {
        match self.state {
            SessionState::Open => {}
            SessionState::Unopened => return Err(Error::InvalidState("close before open")),
            SessionState::Closed => return Err(Error::InvalidState("close called twice")),
        }
        if let Some(scheduler) = self.scheduler.as_mut() {
            scheduler.close_all()?;
        }
        self.state = SessionState::Closed;
        log::info!("drive session closed");
        Ok(())
    }
}
