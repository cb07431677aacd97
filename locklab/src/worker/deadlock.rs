//! Protocol A: fixed-order double acquisition that freezes on conflict.
//!
//! The worker acquires its two resources in the order it was given them and
//! never retries. When the second acquisition times out it keeps the first
//! resource locked forever: that refusal to back off is what turns two
//! workers with opposite orders into a mutual freeze. The configuration,
//! not the worker, decides the orders; the worker just follows them.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::ResourceError;
use crate::reporter::Reporter;
use crate::resource::{AcquireOutcome, ExclusiveResource};
use crate::timing::Timing;
use crate::worker::{Outcome, Worker};

/// Worker that acquires two resources in a fixed order and never backs off.
#[derive(Debug)]
pub struct DeadlockWorker {
    name: String,
    first: Arc<ExclusiveResource>,
    second: Arc<ExclusiveResource>,
    timing: Timing,
}

impl DeadlockWorker {
    /// New worker that will acquire `first` then `second`, in that order.
    pub fn new(
        name: impl Into<String>,
        first: Arc<ExclusiveResource>,
        second: Arc<ExclusiveResource>,
        timing: Timing,
    ) -> Self {
        Self {
            name: name.into(),
            first,
            second,
            timing,
        }
    }

    fn report_blocked(&self, blocked: &ExclusiveResource, waited: Duration, reporter: &Reporter) {
        reporter.diagnostic(format!(
            "ERROR: {} could not lock {} within {:?}",
            self.name,
            blocked.name(),
            waited
        ));
        if let Some(holder) = blocked.holder() {
            reporter.diagnostic(format!(
                "  reason: {} is already held by {}",
                blocked.name(),
                holder
            ));
        }
    }
}

#[async_trait]
impl Worker for DeadlockWorker {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&mut self, reporter: &Reporter) -> Result<Outcome, ResourceError> {
        let Timing {
            poll_interval,
            acquire_timeout,
            work_delay,
            ..
        } = self.timing;

        reporter.progress(format!(
            "{}: attempting to lock {}",
            self.name,
            self.first.name()
        ));
        match self
            .first
            .acquire(&self.name, acquire_timeout, poll_interval)
            .await?
        {
            AcquireOutcome::Acquired => {
                reporter.progress(format!("{}: locked {}", self.name, self.first.name()));
            }
            AcquireOutcome::TimedOut { waited } => {
                self.report_blocked(&self.first, waited, reporter);
                return Ok(Outcome::Deadlocked);
            }
        }

        // Models discovering mid-task that the second resource is needed.
        tokio::time::sleep(work_delay).await;

        reporter.progress(format!(
            "{}: attempting to lock {}",
            self.name,
            self.second.name()
        ));
        match self
            .second
            .acquire(&self.name, acquire_timeout, poll_interval)
            .await?
        {
            AcquireOutcome::Acquired => {
                reporter.progress(format!("{}: locked {}", self.name, self.second.name()));
            }
            AcquireOutcome::TimedOut { waited } => {
                // The first resource stays locked; the opposite-order
                // counterpart waiting on it now times out too.
                self.report_blocked(&self.second, waited, reporter);
                return Ok(Outcome::Deadlocked);
            }
        }

        self.second.release(&self.name)?;
        self.first.release(&self.name)?;
        reporter.progress(format!("{}: finished work", self.name));
        Ok(Outcome::Completed)
    }
}
