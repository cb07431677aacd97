//! The three acquisition protocols and the trait that runs them.
//!
//! Each protocol is a plain struct bound to one or two resources. The
//! scenario moves the struct into a spawned task and takes the value
//! returned from [`Worker::run`] as that worker's terminal outcome. Nothing
//! here owns execution machinery and nothing mutates another worker's state;
//! the only sharing is the resources themselves and the reporter.

mod deadlock;
mod livelock;
mod starvation;

pub use deadlock::DeadlockWorker;
pub use livelock::LivelockWorker;
pub use starvation::StarvationWorker;

use std::fmt;

use async_trait::async_trait;

use crate::error::ResourceError;
use crate::reporter::Reporter;

/// Terminal state of one worker's protocol run.
///
/// There is no "running" variant: a worker that has not returned yet simply
/// has no outcome, and the coordinator only reads outcomes after joining.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The protocol ran to the end.
    Completed,
    /// Gave up waiting while keeping its first resource locked (protocol A).
    Deadlocked,
    /// Exhausted the round budget without progress (protocol B).
    Livelocked,
    /// Denied resource access by the priority policy (protocol C).
    Starved,
    /// A contract violation or panic ended the worker early.
    Failed(String),
}

impl Outcome {
    /// True for [`Outcome::Failed`].
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Completed => write!(f, "completed"),
            Outcome::Deadlocked => write!(f, "deadlocked"),
            Outcome::Livelocked => write!(f, "livelocked"),
            Outcome::Starved => write!(f, "starved"),
            Outcome::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// A synthetic worker executing one acquisition protocol.
///
/// `run` drives the protocol to a terminal [`Outcome`]. Acquisition timeouts
/// are handled inside the protocol (they are the detection signal, not
/// errors); only resource contract violations escape as `Err`, and the
/// scenario converts those into [`Outcome::Failed`] for that worker alone.
#[async_trait]
pub trait Worker: Send + 'static {
    /// Worker name used in log lines and the verdict.
    fn name(&self) -> &str;

    /// Execute the protocol to a terminal outcome.
    async fn run(&mut self, reporter: &Reporter) -> Result<Outcome, ResourceError>;
}
