//! Protocol B: the acquire/retreat/retry cycle that never gets anywhere.
//!
//! Unlike the deadlock protocol, this worker gives its first resource back
//! whenever the second one cannot be had, then backs off and starts over.
//! Two such workers with opposite orders keep yielding to each other in
//! lockstep: plenty of activity, no progress. The round budget bounds the
//! demonstration instead of letting it spin forever.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ResourceError;
use crate::reporter::Reporter;
use crate::resource::{AcquireOutcome, ExclusiveResource};
use crate::timing::Timing;
use crate::worker::{Outcome, Worker};

/// Worker that releases and retries instead of holding on.
#[derive(Debug)]
pub struct LivelockWorker {
    name: String,
    first: Arc<ExclusiveResource>,
    second: Arc<ExclusiveResource>,
    timing: Timing,
    rounds: u32,
}

impl LivelockWorker {
    /// New worker that will try `first` then `second` each round.
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
            rounds: 0,
        }
    }

    /// Number of rounds that ended without progress.
    pub fn rounds(&self) -> u32 {
        self.rounds
    }
}

#[async_trait]
impl Worker for LivelockWorker {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&mut self, reporter: &Reporter) -> Result<Outcome, ResourceError> {
        let Timing {
            poll_interval,
            acquire_timeout,
            work_delay,
            round_backoff,
            livelock_rounds,
            ..
        } = self.timing;

        while self.rounds < livelock_rounds {
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
                AcquireOutcome::TimedOut { waited } => {
                    reporter.diagnostic(format!(
                        "{}: could not lock {} within {:?}",
                        self.name,
                        self.first.name(),
                        waited
                    ));
                }
                AcquireOutcome::Acquired => {
                    reporter.progress(format!("{}: locked {}", self.name, self.first.name()));
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
                            reporter
                                .progress(format!("{}: locked {}", self.name, self.second.name()));
                            self.second.release(&self.name)?;
                            self.first.release(&self.name)?;
                            reporter.progress(format!("{}: finished work", self.name));
                            return Ok(Outcome::Completed);
                        }
                        AcquireOutcome::TimedOut { waited } => {
                            reporter.diagnostic(format!(
                                "{}: could not lock {} within {:?}",
                                self.name,
                                self.second.name(),
                                waited
                            ));
                            // Retreat. The deadlock protocol would keep
                            // holding here.
                            self.first.release(&self.name)?;
                            reporter.progress(format!(
                                "{}: released {} and will retry",
                                self.name,
                                self.first.name()
                            ));
                        }
                    }
                }
            }

            self.rounds += 1;
            tokio::time::sleep(round_backoff).await;
        }

        reporter.progress(format!(
            "{}: no progress after {} rounds",
            self.name, self.rounds
        ));
        Ok(Outcome::Livelocked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn fast() -> Timing {
        Timing {
            poll_interval: Duration::from_millis(10),
            acquire_timeout: Duration::from_millis(80),
            work_delay: Duration::from_millis(25),
            round_backoff: Duration::from_millis(10),
            hold_delay: Duration::from_millis(40),
            deferral_delay: Duration::from_millis(20),
            livelock_rounds: 3,
            starvation_attempts: 4,
        }
    }

    #[tokio::test]
    async fn uncontended_worker_completes_in_the_first_round() {
        let first = Arc::new(ExclusiveResource::new("Resource A"));
        let second = Arc::new(ExclusiveResource::new("Resource B"));
        let mut worker = LivelockWorker::new(
            "Process 1",
            Arc::clone(&first),
            Arc::clone(&second),
            fast(),
        );

        let outcome = worker
            .run(&Reporter::quiet())
            .await
            .expect("no contract violations");

        assert_eq!(outcome, Outcome::Completed);
        assert_eq!(worker.rounds(), 0, "success must not count as a spent round");
        assert!(!first.is_locked());
        assert!(!second.is_locked());
    }

    #[tokio::test]
    async fn permanently_blocked_second_resource_exhausts_the_round_budget() {
        let first = Arc::new(ExclusiveResource::new("Resource A"));
        let second = Arc::new(ExclusiveResource::new("Resource B"));
        second
            .acquire("someone else", Duration::from_secs(1), Duration::from_millis(10))
            .await
            .expect("valid owner name");

        let mut worker = LivelockWorker::new(
            "Process 1",
            Arc::clone(&first),
            Arc::clone(&second),
            fast(),
        );
        let outcome = worker
            .run(&Reporter::quiet())
            .await
            .expect("no contract violations");

        assert_eq!(outcome, Outcome::Livelocked);
        assert_eq!(worker.rounds(), 3, "exactly the round budget must be spent");
        assert!(
            !first.is_locked(),
            "the first resource must be released after every failed round"
        );
        assert_eq!(second.holder().as_deref(), Some("someone else"));
    }

    #[tokio::test]
    async fn blocked_first_resource_still_spends_rounds_holding_nothing() {
        let first = Arc::new(ExclusiveResource::new("Resource A"));
        let second = Arc::new(ExclusiveResource::new("Resource B"));
        first
            .acquire("someone else", Duration::from_secs(1), Duration::from_millis(10))
            .await
            .expect("valid owner name");

        let mut worker = LivelockWorker::new(
            "Process 1",
            Arc::clone(&first),
            Arc::clone(&second),
            fast(),
        );
        let outcome = worker
            .run(&Reporter::quiet())
            .await
            .expect("no contract violations");

        assert_eq!(outcome, Outcome::Livelocked);
        assert_eq!(worker.rounds(), 3);
        assert!(!second.is_locked(), "the second resource was never touched");
    }
}
