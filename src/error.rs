//! Error types for the replay engine.

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Replay engine error types.
///
/// Source exhaustion is not represented here: a drained source reports
/// `Ok(None)` from `read_next` and the session surfaces it as
/// `data_remaining = false`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Raw-data fetch failed (file open or read)
    #[error("Fetch failed for {resource}: {reason}")]
    Fetch {
        /// Path or key of the resource that could not be fetched
        resource: String,
        /// Underlying failure description
        reason: String,
    },

    /// Malformed persisted input (unreadable image, bad JSON, bad point table)
    #[error("Invalid log format: {0}")]
    InvalidFormat(String),

    /// A channel adapter was updated before any record arrived on its topic
    #[error("No record received on topic '{topic}' before channel conversion was requested")]
    MissingChannelData {
        /// Topic the adapter reads from
        topic: String,
    },

    /// Session lifecycle misuse (read before open, open twice, use after close)
    #[error("Invalid session state: {0}")]
    InvalidState(&'static str),
}
