//! Error types for scenario construction and resource contracts.

use thiserror::Error;

/// Errors raised while loading or building a scenario from configuration.
///
/// All of these are fatal to scenario construction: they are surfaced before
/// any worker starts and leave no partial state behind.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("failed to read configuration file '{path}': {source}")]
    Io {
        /// Path that was being read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Configuration document is not valid JSON or misses required fields.
    #[error("invalid configuration document: {0}")]
    Parse(#[from] serde_json::Error),

    /// The section for the requested scenario kind is absent.
    #[error("missing '{section}' section in configuration")]
    MissingSection {
        /// Name of the absent section.
        section: &'static str,
    },

    /// A process definition references a resource key that is not defined.
    #[error("resource '{key}' is not defined for process '{process}'")]
    UnknownResource {
        /// Name of the process with the dangling reference.
        process: String,
        /// The resource key that could not be resolved.
        key: String,
    },

    /// A definition failed entity-level validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Contract violations in individual configuration entries.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Resource definitions must carry a non-empty display name.
    #[error("resource '{key}' must have a non-empty name")]
    EmptyResourceName {
        /// Key of the offending resource definition.
        key: String,
    },

    /// Process definitions must carry a non-empty name.
    #[error("process definition at index {index} must have a non-empty name")]
    EmptyWorkerName {
        /// Position of the offending definition in the process list.
        index: usize,
    },

    /// Starvation priorities start at 1 (highest).
    #[error("process '{process}' has invalid priority {priority} (must be >= 1)")]
    InvalidPriority {
        /// Name of the offending process.
        process: String,
        /// The rejected priority value.
        priority: u32,
    },
}

/// Contract violations on an [`ExclusiveResource`](crate::ExclusiveResource).
///
/// These are programming errors inside a protocol, not expected runtime
/// events. A worker that hits one converts it into a `Failed` outcome for
/// itself only; sibling workers are unaffected. Acquisition timeouts are
/// *not* errors and are reported through
/// [`AcquireOutcome`](crate::AcquireOutcome) instead.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// Owner names must be non-empty (and not whitespace-only).
    #[error("resource '{resource}': owner name must be non-empty")]
    EmptyOwner {
        /// Resource on which the call was made.
        resource: String,
    },

    /// Release was called on a resource that is not locked.
    #[error("resource '{resource}' is not locked")]
    NotLocked {
        /// Resource on which the call was made.
        resource: String,
    },

    /// Release was called by a worker that is not the current holder.
    #[error("resource '{resource}' is held by '{holder}', not '{owner}'")]
    NotOwner {
        /// Resource on which the call was made.
        resource: String,
        /// The worker that attempted the release.
        owner: String,
        /// The worker that actually holds the resource.
        holder: String,
    },
}
