//! Serialized textual output shared by every worker in a scenario.
//!
//! Workers run concurrently but their narration must stay readable: one
//! mutex guards both output channels so every line lands whole, never
//! interleaved with a sibling's line. The two channels let an enclosing
//! shell render normal progress and diagnostics differently; the engine
//! itself does not care whether anyone is listening, so write failures are
//! swallowed rather than allowed to crash a worker mid-protocol.

use std::fmt;
use std::io::Write;
use std::sync::{Arc, Mutex};

struct Channels {
    progress: Box<dyn Write + Send>,
    diagnostic: Box<dyn Write + Send>,
}

/// Cloneable handle to the scenario's single output serialization point.
///
/// Constructed once per scenario run and handed to every component that
/// logs. Cloning shares the underlying channels.
#[derive(Clone)]
pub struct Reporter {
    channels: Arc<Mutex<Channels>>,
}

impl Reporter {
    /// Reporter over arbitrary sinks, for tests and embedding.
    pub fn new(
        progress: impl Write + Send + 'static,
        diagnostic: impl Write + Send + 'static,
    ) -> Self {
        Self {
            channels: Arc::new(Mutex::new(Channels {
                progress: Box::new(progress),
                diagnostic: Box::new(diagnostic),
            })),
        }
    }

    /// Reporter over the process's stdout (progress) and stderr
    /// (diagnostics), the channel layout the enclosing shell expects.
    pub fn stdio() -> Self {
        Self::new(std::io::stdout(), std::io::stderr())
    }

    /// Reporter that discards everything.
    pub fn quiet() -> Self {
        Self::new(std::io::sink(), std::io::sink())
    }

    /// Append one line (plus newline) to the normal channel.
    ///
    /// A multi-line string is written as a single atomic block.
    pub fn progress(&self, line: impl fmt::Display) {
        let mut channels = self.lock_channels();
        let _ = writeln!(channels.progress, "{line}");
        let _ = channels.progress.flush();
    }

    /// Append one line (plus newline) to the diagnostic channel.
    pub fn diagnostic(&self, line: impl fmt::Display) {
        let mut channels = self.lock_channels();
        let _ = writeln!(channels.diagnostic, "{line}");
        let _ = channels.diagnostic.flush();
    }

    fn lock_channels(&self) -> std::sync::MutexGuard<'_, Channels> {
        // A writer that panicked mid-line must not silence everyone else.
        self.channels.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl fmt::Debug for Reporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reporter").finish_non_exhaustive()
    }
}
