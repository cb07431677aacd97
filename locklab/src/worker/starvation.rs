//! Protocol C: a priority policy that never lets low priority in.
//!
//! Priority 1 acquires the shared resource, holds it for a while, releases
//! it, and cycles. Everything below priority 1 models a scheduler that
//! always favors the high-priority worker: it announces that it wants the
//! resource, then defers without ever attempting the acquisition. After the
//! attempt budget the deferred workers report starvation. The denial is
//! policy, not a lost race; that distinction is the point of the scenario.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ResourceError;
use crate::reporter::Reporter;
use crate::resource::{AcquireOutcome, ExclusiveResource};
use crate::timing::Timing;
use crate::worker::{Outcome, Worker};

/// Worker whose access to the shared resource is decided by priority.
#[derive(Debug)]
pub struct StarvationWorker {
    name: String,
    resource: Arc<ExclusiveResource>,
    priority: u32,
    timing: Timing,
    attempts: u32,
}

impl StarvationWorker {
    /// New worker with the given priority (1 is highest).
    pub fn new(
        name: impl Into<String>,
        resource: Arc<ExclusiveResource>,
        priority: u32,
        timing: Timing,
    ) -> Self {
        Self {
            name: name.into(),
            resource,
            priority,
            timing,
            attempts: 0,
        }
    }

    /// Scheduling priority of this worker.
    pub fn priority(&self) -> u32 {
        self.priority
    }

    /// Attempts spent so far.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}

#[async_trait]
impl Worker for StarvationWorker {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&mut self, reporter: &Reporter) -> Result<Outcome, ResourceError> {
        let Timing {
            poll_interval,
            acquire_timeout,
            hold_delay,
            deferral_delay,
            starvation_attempts,
            ..
        } = self.timing;

        while self.attempts < starvation_attempts {
            // Low priority announces the want too; the announcement with no
            // acquisition behind it is the visible starvation.
            reporter.progress(format!(
                "{}: attempting to lock {}",
                self.name,
                self.resource.name()
            ));

            if self.priority == 1 {
                match self
                    .resource
                    .acquire(&self.name, acquire_timeout, poll_interval)
                    .await?
                {
                    AcquireOutcome::Acquired => {
                        reporter
                            .progress(format!("{}: locked {}", self.name, self.resource.name()));
                        tokio::time::sleep(hold_delay).await;
                        self.resource.release(&self.name)?;
                        reporter
                            .progress(format!("{}: released {}", self.name, self.resource.name()));
                    }
                    AcquireOutcome::TimedOut { waited } => {
                        // Only reachable when several high-priority workers
                        // share the resource. Skip the cycle; a timeout is a
                        // signal, not a failure.
                        reporter.diagnostic(format!(
                            "{}: could not lock {} within {:?}, skipping this cycle",
                            self.name,
                            self.resource.name(),
                            waited
                        ));
                    }
                }
            } else {
                tokio::time::sleep(deferral_delay).await;
            }

            self.attempts += 1;
        }

        if self.priority > 1 {
            reporter.progress(format!(
                "{}: starved (never got access to {})",
                self.name,
                self.resource.name()
            ));
            Ok(Outcome::Starved)
        } else {
            reporter.progress(format!("{}: finished work", self.name));
            Ok(Outcome::Completed)
        }
    }
}
