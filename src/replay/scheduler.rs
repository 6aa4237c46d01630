//! Time-ordered k-way merge with offset-paced delivery.
//!
//! Sources have no native peek, so the merge keeps one head record per
//! source and the pacing contract keeps one global lookahead record: a
//! record pulled from the merge but beyond the requested target offset is
//! parked until a later request reaches it.

use crate::core::types::LogRecord;
use crate::error::Result;
use crate::sources::LogSource;

/// Outcome of one scheduler poll.
#[derive(Debug)]
pub enum Poll {
    /// A record whose offset is within the requested target.
    Ready(LogRecord),
    /// The next record lies beyond the requested target offset.
    Pending,
    /// Every source is exhausted and the lookahead slot is empty.
    Drained,
}

/// One source plus its merge head.
struct SourceSlot {
    source: Box<dyn LogSource>,
    head: Option<LogRecord>,
    live: bool,
}

/// Merges all sources into one ascending-timestamp stream and paces
/// delivery against a target offset.
///
/// Timestamp ties break by source registration order. The lookahead slot
/// holds at most one record; while it is occupied with a record beyond the
/// target, repeated polls at the same or a smaller target return
/// `Pending` without touching any source.
pub struct ReplayScheduler {
    slots: Vec<SourceSlot>,
    lookahead: Option<LogRecord>,
    anchor_us: u64,
}

impl ReplayScheduler {
    /// Create a scheduler over opened sources with the session anchor.
    pub fn new(sources: Vec<Box<dyn LogSource>>, anchor_us: u64) -> Self {
        Self {
            slots: sources
                .into_iter()
                .map(|source| SourceSlot {
                    source,
                    head: None,
                    live: true,
                })
                .collect(),
            lookahead: None,
            anchor_us,
        }
    }

    /// Session anchor in microseconds since epoch.
    pub fn anchor_us(&self) -> u64 {
        self.anchor_us
    }

    /// Offset of a record relative to the session anchor.
    #[inline]
    pub fn offset_us(&self, record: &LogRecord) -> u64 {
        record.timestamp_us.saturating_sub(self.anchor_us)
    }

    /// Poll for the next record with offset at most `target_offset_us`.
    pub fn poll(&mut self, target_offset_us: u64) -> Result<Poll> {
        if let Some(parked) = &self.lookahead {
            if self.offset_us(parked) > target_offset_us {
                return Ok(Poll::Pending);
            }
        }
        if let Some(parked) = self.lookahead.take() {
            return Ok(Poll::Ready(parked));
        }

        match self.next_merged()? {
            None => Ok(Poll::Drained),
            Some(record) => {
                if self.offset_us(&record) > target_offset_us {
                    self.lookahead = Some(record);
                    Ok(Poll::Pending)
                } else {
                    Ok(Poll::Ready(record))
                }
            }
        }
    }

    /// Close every source. Call exactly once, after the last poll.
    pub fn close_all(&mut self) -> Result<()> {
        for slot in &mut self.slots {
            slot.source.close()?;
        }
        Ok(())
    }

    /// Pull the globally-earliest head across all live sources.
    fn next_merged(&mut self) -> Result<Option<LogRecord>> {
        for slot in &mut self.slots {
            if slot.live && slot.head.is_none() {
                match slot.source.read_next()? {
                    Some(record) => slot.head = Some(record),
                    None => slot.live = false,
                }
            }
        }

        // Stable first-minimum scan: ties keep registration order.
        let mut best: Option<(usize, u64)> = None;
        for (index, slot) in self.slots.iter().enumerate() {
            if let Some(head) = &slot.head {
                match best {
                    Some((_, best_ts)) if head.timestamp_us >= best_ts => {}
                    _ => best = Some((index, head.timestamp_us)),
                }
            }
        }

        Ok(best.and_then(|(index, _)| self.slots[index].head.take()))
    }
}
