//! Replay orchestration: shared session state, the paced merge scheduler,
//! and the host-facing drive session.

pub mod mailbox;
pub mod scheduler;
pub mod session;

pub use mailbox::Mailbox;
pub use scheduler::{Poll, ReplayScheduler};
pub use session::{DriveSession, ReadOutput};
