//! Delay and budget knobs for the hazard protocols.

use std::time::Duration;

// ============================================================================
// Reference constants
// ============================================================================
//
// The hazards are probabilistic by construction: these values make them
// likely under a normal scheduler, not guaranteed under every schedule.
// Tests substitute millisecond-scale values to keep runs short.

/// Pause between polling attempts inside a bounded-wait acquire.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// How long a bounded-wait acquire keeps polling before giving up.
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Simulated work between acquiring the first and the second resource.
pub const DEFAULT_WORK_DELAY: Duration = Duration::from_secs(1);

/// Pause between livelock rounds.
pub const DEFAULT_ROUND_BACKOFF: Duration = Duration::from_millis(500);

/// How long a high-priority starvation worker holds the shared resource.
pub const DEFAULT_HOLD_DELAY: Duration = Duration::from_secs(3);

/// How long a low-priority starvation worker defers per attempt.
pub const DEFAULT_DEFERRAL_DELAY: Duration = Duration::from_secs(2);

/// Round budget before a livelock worker reports no progress.
pub const DEFAULT_LIVELOCK_ROUNDS: u32 = 3;

/// Attempt budget before a starvation worker reaches its terminal outcome.
pub const DEFAULT_STARVATION_ATTEMPTS: u32 = 4;

/// Every delay and budget used by the engine, bundled so a whole scenario can
/// be sped up or slowed down in one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Pause between polling attempts inside `acquire`.
    pub poll_interval: Duration,
    /// Bounded-wait window for a single acquisition.
    pub acquire_timeout: Duration,
    /// Simulated work between the first and second acquisition.
    pub work_delay: Duration,
    /// Pause between livelock rounds.
    pub round_backoff: Duration,
    /// Hold time per high-priority starvation attempt.
    pub hold_delay: Duration,
    /// Deferral sleep per low-priority starvation attempt.
    pub deferral_delay: Duration,
    /// Number of livelock rounds before giving up.
    pub livelock_rounds: u32,
    /// Number of starvation attempts before the terminal outcome.
    pub starvation_attempts: u32,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
            work_delay: DEFAULT_WORK_DELAY,
            round_backoff: DEFAULT_ROUND_BACKOFF,
            hold_delay: DEFAULT_HOLD_DELAY,
            deferral_delay: DEFAULT_DEFERRAL_DELAY,
            livelock_rounds: DEFAULT_LIVELOCK_ROUNDS,
            starvation_attempts: DEFAULT_STARVATION_ATTEMPTS,
        }
    }
}
