//! Named exclusive locks with bounded-wait acquisition.
//!
//! An [`ExclusiveResource`] is the unit the hazard protocols contend for. It
//! is deliberately not an RAII lock: protocols acquire and release manually,
//! hold across sleeps, and in the deadlock protocol intentionally never
//! release. Acquisition is a polling loop rather than a blocking wait, so a
//! stuck worker turns into a [`TimedOut`](AcquireOutcome::TimedOut) result
//! instead of hanging forever. That result is the detection signal the
//! scenarios are built around.
//!
//! The internal mutex guards only the instantaneous ownership transition and
//! is never held across an await point.

use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::error::ResourceError;

/// Ownership state of a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
enum LockState {
    Free,
    Held { owner: String },
}

/// Result of a bounded-wait acquisition.
///
/// A timeout is an expected, frequent outcome in these scenarios, so it is a
/// variant here rather than an error: protocol code branches on it the same
/// way it branches on success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcquireOutcome {
    /// The caller now exclusively holds the resource.
    Acquired,
    /// The window elapsed without the resource becoming available.
    TimedOut {
        /// Total time spent polling before giving up.
        waited: Duration,
    },
}

impl AcquireOutcome {
    /// True when the acquisition succeeded.
    pub fn is_acquired(&self) -> bool {
        matches!(self, AcquireOutcome::Acquired)
    }
}

/// A named lockable unit with strict, non-reentrant mutual exclusion.
#[derive(Debug)]
pub struct ExclusiveResource {
    name: String,
    state: Mutex<LockState>,
}

impl ExclusiveResource {
    /// Create a free resource with the given display name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Mutex::new(LockState::Free),
        }
    }

    /// Display name of this resource.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Snapshot of the current holder, if any.
    ///
    /// Diagnostic only: by the time the caller looks at the value the
    /// ownership may already have changed.
    pub fn holder(&self) -> Option<String> {
        match &*self.lock_state() {
            LockState::Free => None,
            LockState::Held { owner } => Some(owner.clone()),
        }
    }

    /// True when some worker currently holds the resource.
    pub fn is_locked(&self) -> bool {
        matches!(&*self.lock_state(), LockState::Held { .. })
    }

    /// Try to take ownership within `timeout`, polling every `poll_interval`.
    ///
    /// The first attempt happens immediately; afterwards the caller sleeps
    /// `poll_interval` between attempts until the cumulative elapsed time
    /// reaches `timeout`. Re-acquiring a resource the caller already holds is
    /// ordinary contention and will time out like any other blocked attempt.
    ///
    /// An empty (or whitespace-only) owner name is a caller-contract error.
    pub async fn acquire(
        &self,
        owner: &str,
        timeout: Duration,
        poll_interval: Duration,
    ) -> Result<AcquireOutcome, ResourceError> {
        if owner.trim().is_empty() {
            return Err(ResourceError::EmptyOwner {
                resource: self.name.clone(),
            });
        }

        let start = Instant::now();
        while start.elapsed() < timeout {
            if self.try_acquire(owner) {
                tracing::debug!("'{}' acquired '{}'", owner, self.name);
                return Ok(AcquireOutcome::Acquired);
            }
            tokio::time::sleep(poll_interval).await;
        }

        let waited = start.elapsed();
        tracing::debug!(
            "'{}' gave up on '{}' after {:?}",
            owner,
            self.name,
            waited
        );
        Ok(AcquireOutcome::TimedOut { waited })
    }

    /// Give up ownership.
    ///
    /// Fails if the resource is free or held by a different worker; both are
    /// protocol bugs that the calling worker reports as a `Failed` outcome.
    pub fn release(&self, owner: &str) -> Result<(), ResourceError> {
        let mut state = self.lock_state();
        match &*state {
            LockState::Free => {
                return Err(ResourceError::NotLocked {
                    resource: self.name.clone(),
                });
            }
            LockState::Held { owner: holder } => {
                if holder != owner {
                    return Err(ResourceError::NotOwner {
                        resource: self.name.clone(),
                        owner: owner.to_string(),
                        holder: holder.clone(),
                    });
                }
            }
        }
        *state = LockState::Free;
        tracing::debug!("'{}' released '{}'", owner, self.name);
        Ok(())
    }

    fn try_acquire(&self, owner: &str) -> bool {
        let mut state = self.lock_state();
        match &*state {
            LockState::Free => {
                *state = LockState::Held {
                    owner: owner.to_string(),
                };
                true
            }
            LockState::Held { .. } => false,
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, LockState> {
        // A panicking holder only ever poisons an instantaneous transition;
        // the state itself stays coherent.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}
