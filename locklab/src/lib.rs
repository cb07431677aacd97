//! # Locklab
//!
//! Concurrency hazard demonstrations: synthetic workers contend for
//! exclusively-lockable resources and run deliberately flawed acquisition
//! protocols until deadlock, livelock or starvation manifests.
//!
//! ## Why Synthetic Hazards?
//!
//! The classic coordination failures are easy to describe and hard to show.
//! Each scenario here is a minimal population of workers whose protocol is
//! *designed* to fail in one specific way, so the failure can be watched,
//! reported and asserted on:
//!
//! - **Deadlock**: two workers take the same two resources in opposite
//!   order and cross-block.
//! - **Livelock**: workers retreat and retry in lockstep, busy but never
//!   progressing.
//! - **Starvation**: a priority policy keeps low-priority workers away from
//!   the resource indefinitely.
//!
//! Every worker always reaches a terminal [`Outcome`]; the run as a whole
//! always produces a [`ScenarioVerdict`]. Hazards are reported, never raised
//! as errors.
//!
//! ## Core Components
//!
//! - [`ExclusiveResource`]: a named lock acquired by timed polling
//! - [`Worker`]: one concurrent participant running its protocol to a
//!   terminal [`Outcome`]
//! - [`Scenario`]: assembles workers (directly or from a [`ConfigFile`]),
//!   races them and aggregates the verdict
//! - [`Reporter`]: shared progress/diagnostic channels safe for concurrent
//!   writers
//! - [`Timing`]: every delay and budget in one place, shrinkable for tests
//!
//! ## Quick Start
//!
//! ```ignore
//! use locklab::{ConfigFile, Reporter, Scenario, ScenarioKind, Timing};
//!
//! let config = ConfigFile::load("config/config.json")?;
//! let scenario = Scenario::from_config(
//!     ScenarioKind::Deadlock,
//!     &config,
//!     Timing::default(),
//!     Reporter::stdio(),
//! )?;
//! let verdict = scenario.run().await;
//! println!("{verdict}");
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]

// =============================================================================
// Core Modules
// =============================================================================

/// Configuration documents describing resources and worker populations.
pub mod config;

/// Error types for configuration and resource contract violations.
pub mod error;

/// Shared progress and diagnostic output channels.
pub mod reporter;

/// Exclusively-lockable resources with timed, polling acquisition.
pub mod resource;

/// Scenario assembly, execution and verdicts.
pub mod scenario;

/// Delay and budget knobs shared by every protocol.
pub mod timing;

/// Worker protocols and their terminal outcomes.
pub mod worker;

// =============================================================================
// Public API Re-exports
// =============================================================================

// Config module re-exports
pub use config::{
    ConfigFile, PairProcessDef, PairSection, PriorityProcessDef, PrioritySection, ResourceDef,
};

// Error module re-exports
pub use error::{ConfigError, ResourceError, ValidationError};

// Reporter module re-exports
pub use reporter::Reporter;

// Resource module re-exports
pub use resource::{AcquireOutcome, ExclusiveResource};

// Scenario module re-exports
pub use scenario::{Scenario, ScenarioKind, ScenarioVerdict, aggregate};

// Timing module re-exports
pub use timing::Timing;

// Worker module re-exports
pub use worker::{DeadlockWorker, LivelockWorker, Outcome, StarvationWorker, Worker};
