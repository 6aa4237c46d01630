//! Shared per-session state between the scheduler and the channel adapters.

use std::collections::HashMap;

use crate::core::types::{ChannelOutput, RecordPayload};

/// Latest-value store for one drive session.
///
/// Tracks the latest raw record per topic and the latest converted output
/// per channel. Entries are overwritten in place, last-write-wins; no
/// history is retained. The store lives for the session and is discarded
/// at teardown, never cleared.
#[derive(Debug, Default)]
pub struct Mailbox {
    latest_messages: HashMap<String, RecordPayload>,
    latest_outputs: HashMap<String, ChannelOutput>,
}

impl Mailbox {
    /// Create an empty mailbox.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the latest raw payload for a topic.
    pub fn put_message(&mut self, topic: impl Into<String>, payload: RecordPayload) {
        self.latest_messages.insert(topic.into(), payload);
    }

    /// Latest raw payload for a topic, if any record has arrived.
    pub fn latest_message(&self, topic: &str) -> Option<&RecordPayload> {
        self.latest_messages.get(topic)
    }

    /// Store the latest converted output for a channel.
    pub fn put_output(&mut self, channel: impl Into<String>, output: ChannelOutput) {
        self.latest_outputs.insert(channel.into(), output);
    }

    /// Latest converted output for a channel, if any conversion has run.
    pub fn latest_output(&self, channel: &str) -> Option<&ChannelOutput> {
        self.latest_outputs.get(channel)
    }
}
