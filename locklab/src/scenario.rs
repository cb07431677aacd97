//! Scenario assembly, execution and verdicts.
//!
//! A scenario is built in two phases: the configuration section is validated
//! in full, then resources and workers are constructed. Running it spawns
//! every worker as its own task, waits for all of them (join-to-completion;
//! nothing is ever cancelled), and aggregates the terminal outcomes into a
//! [`ScenarioVerdict`]. Worker failures, including panics, never abort the
//! join: the verdict is produced from whatever outcomes exist.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::{ConfigFile, ResourceDef};
use crate::error::ConfigError;
use crate::reporter::Reporter;
use crate::resource::ExclusiveResource;
use crate::timing::Timing;
use crate::worker::{DeadlockWorker, LivelockWorker, Outcome, StarvationWorker, Worker};

/// The hazard a scenario demonstrates.
///
/// Deadlock and livelock read the same configuration section (they contend
/// over the same resource pairs); starvation has its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioKind {
    /// Opposite-order double acquisition that cross-blocks.
    Deadlock,
    /// Acquire/retreat/retry cycles without progress.
    Livelock,
    /// A priority policy that never lets low priority in.
    Starvation,
}

impl ScenarioKind {
    /// Name of the configuration section this kind reads.
    pub fn section(&self) -> &'static str {
        match self {
            ScenarioKind::Deadlock | ScenarioKind::Livelock => "deadlock_livelock",
            ScenarioKind::Starvation => "starvation",
        }
    }

    /// Lower-case hazard name for summary lines.
    pub fn hazard(&self) -> &'static str {
        match self {
            ScenarioKind::Deadlock => "deadlock",
            ScenarioKind::Livelock => "livelock",
            ScenarioKind::Starvation => "starvation",
        }
    }

    /// True when `outcome` is the hazard this scenario targets.
    pub fn is_hazard(&self, outcome: &Outcome) -> bool {
        matches!(
            (self, outcome),
            (ScenarioKind::Deadlock, Outcome::Deadlocked)
                | (ScenarioKind::Livelock, Outcome::Livelocked)
                | (ScenarioKind::Starvation, Outcome::Starved)
        )
    }
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScenarioKind::Deadlock => write!(f, "Deadlock"),
            ScenarioKind::Livelock => write!(f, "Livelock"),
            ScenarioKind::Starvation => write!(f, "Starvation"),
        }
    }
}

/// A configured population of workers ready to run.
pub struct Scenario {
    kind: ScenarioKind,
    reporter: Reporter,
    workers: Vec<Box<dyn Worker>>,
}

impl fmt::Debug for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scenario")
            .field("kind", &self.kind)
            .field("workers", &self.workers.len())
            .finish_non_exhaustive()
    }
}

impl Scenario {
    /// Empty scenario for direct assembly.
    pub fn new(kind: ScenarioKind, reporter: Reporter) -> Self {
        Self {
            kind,
            reporter,
            workers: Vec::new(),
        }
    }

    /// Add a worker. Construction order is the order the verdict reports.
    pub fn worker(mut self, worker: impl Worker) -> Self {
        self.workers.push(Box::new(worker));
        self
    }

    /// Number of workers currently assembled.
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Build a scenario from the matching section of a configuration
    /// document.
    ///
    /// The section is validated in full before any resource or worker is
    /// constructed; on error nothing is left behind and no worker has
    /// started.
    pub fn from_config(
        kind: ScenarioKind,
        config: &ConfigFile,
        timing: Timing,
        reporter: Reporter,
    ) -> Result<Self, ConfigError> {
        let mut scenario = Scenario::new(kind, reporter);
        match kind {
            ScenarioKind::Deadlock | ScenarioKind::Livelock => {
                let section =
                    config
                        .deadlock_livelock
                        .as_ref()
                        .ok_or(ConfigError::MissingSection {
                            section: kind.section(),
                        })?;
                section.validate()?;

                let resources = build_resources(&section.resources);
                for process in &section.processes {
                    let first = lookup(&resources, &process.name, &process.resource1)?;
                    let second = lookup(&resources, &process.name, &process.resource2)?;
                    scenario.workers.push(match kind {
                        ScenarioKind::Livelock => {
                            Box::new(LivelockWorker::new(&process.name, first, second, timing))
                        }
                        _ => Box::new(DeadlockWorker::new(&process.name, first, second, timing)),
                    });
                }
            }
            ScenarioKind::Starvation => {
                let section = config
                    .starvation
                    .as_ref()
                    .ok_or(ConfigError::MissingSection {
                        section: kind.section(),
                    })?;
                section.validate()?;

                let resources = build_resources(&section.resources);
                for process in &section.processes {
                    let resource = lookup(&resources, &process.name, &process.resource)?;
                    scenario.workers.push(Box::new(StarvationWorker::new(
                        &process.name,
                        resource,
                        process.priority,
                        timing,
                    )));
                }
            }
        }
        tracing::debug!(
            "built {} scenario with {} workers",
            kind,
            scenario.workers.len()
        );
        Ok(scenario)
    }

    /// Run every worker to its terminal outcome and aggregate the verdict.
    ///
    /// All workers are spawned essentially simultaneously; the race between
    /// them is the mechanism that produces (or fails to produce) the hazard.
    pub async fn run(self) -> ScenarioVerdict {
        let Scenario {
            kind,
            reporter,
            workers,
        } = self;
        let start = Instant::now();
        tracing::info!("running {} scenario with {} workers", kind, workers.len());

        let mut handles = Vec::new();
        for worker in workers {
            let name = worker.name().to_string();
            let task_reporter = reporter.clone();
            let handle = tokio::spawn(async move {
                let mut worker = worker;
                match worker.run(&task_reporter).await {
                    Ok(outcome) => outcome,
                    Err(err) => {
                        task_reporter
                            .diagnostic(format!("{}: contract violation: {}", worker.name(), err));
                        Outcome::Failed(err.to_string())
                    }
                }
            });
            handles.push((name, handle));
        }

        // Workers finish in arbitrary order; keep outcomes slotted by
        // construction index so the verdict reads in construction order.
        let mut slots: Vec<Option<(String, Outcome)>> = Vec::new();
        slots.resize_with(handles.len(), || None);

        let mut pending: Vec<_> = handles
            .into_iter()
            .enumerate()
            .map(|(index, (name, handle))| {
                Box::pin(async move {
                    let joined = handle.await;
                    (index, name, joined)
                })
            })
            .collect();

        while !pending.is_empty() {
            let ((index, name, joined), _, remaining) =
                futures::future::select_all(pending).await;
            pending = remaining;

            let outcome = match joined {
                Ok(outcome) => outcome,
                Err(_) => {
                    reporter.diagnostic(format!("{name}: worker task panicked"));
                    Outcome::Failed("worker task panicked".to_string())
                }
            };
            tracing::debug!("worker '{}' finished: {}", name, outcome);
            slots[index] = Some((name, outcome));
        }

        let outcomes: Vec<(String, Outcome)> = slots.into_iter().flatten().collect();
        let mut verdict = aggregate(kind, &outcomes);
        verdict.wall_time = start.elapsed();
        tracing::info!("{} scenario finished: {}", kind, verdict.summary());
        verdict
    }
}

/// Scan terminal outcomes for the scenario's targeted hazard.
///
/// `affected` preserves the order the outcomes are given in.
pub fn aggregate(kind: ScenarioKind, outcomes: &[(String, Outcome)]) -> ScenarioVerdict {
    let affected: Vec<String> = outcomes
        .iter()
        .filter(|(_, outcome)| kind.is_hazard(outcome))
        .map(|(name, _)| name.clone())
        .collect();

    ScenarioVerdict {
        kind,
        hazard_detected: !affected.is_empty(),
        affected,
        outcomes: outcomes.to_vec(),
        wall_time: Duration::ZERO,
    }
}

/// Aggregate of final worker outcomes for one scenario run.
#[derive(Debug, Clone)]
pub struct ScenarioVerdict {
    /// The hazard this scenario was demonstrating.
    pub kind: ScenarioKind,
    /// Whether any worker terminated in the targeted hazard outcome.
    pub hazard_detected: bool,
    /// Names of hazard-affected workers, in construction order.
    pub affected: Vec<String>,
    /// Every worker's terminal outcome, in construction order.
    pub outcomes: Vec<(String, Outcome)>,
    /// Wall-clock duration of the whole run.
    pub wall_time: Duration,
}

impl ScenarioVerdict {
    /// Number of workers that completed normally.
    pub fn completed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| *outcome == Outcome::Completed)
            .count()
    }

    /// Number of workers that failed on a contract violation or panic.
    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| outcome.is_failure())
            .count()
    }

    /// One-line verdict enumerating affected workers, or stating that none
    /// were affected.
    pub fn summary(&self) -> String {
        if self.hazard_detected {
            format!(
                "{} detected, affecting: {}",
                self.kind,
                self.affected.join(", ")
            )
        } else {
            format!("No {} detected; no workers were affected", self.kind.hazard())
        }
    }
}

impl fmt::Display for ScenarioVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== {} Scenario Report ===", self.kind)?;
        writeln!(f, "Workers: {}", self.outcomes.len())?;
        writeln!(f, "Wall Time: {:?}", self.wall_time)?;
        writeln!(f)?;

        for (name, outcome) in &self.outcomes {
            let marker = if self.kind.is_hazard(outcome) || outcome.is_failure() {
                "❌"
            } else {
                "✅"
            };
            writeln!(f, "{marker} {name}: {outcome}")?;
        }
        writeln!(f)?;

        write!(f, "{}", self.summary())
    }
}

fn build_resources(
    defs: &BTreeMap<String, ResourceDef>,
) -> BTreeMap<String, Arc<ExclusiveResource>> {
    defs.iter()
        .map(|(key, def)| (key.clone(), Arc::new(ExclusiveResource::new(&def.name))))
        .collect()
}

fn lookup(
    resources: &BTreeMap<String, Arc<ExclusiveResource>>,
    process: &str,
    key: &str,
) -> Result<Arc<ExclusiveResource>, ConfigError> {
    // Validation already proved the key exists; keep the lookup total anyway.
    resources
        .get(key)
        .cloned()
        .ok_or_else(|| ConfigError::UnknownResource {
            process: process.to_string(),
            key: key.to_string(),
        })
}
