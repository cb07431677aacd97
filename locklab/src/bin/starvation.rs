//! Binary target for the starvation demonstration.
//!
//! High-priority workers cycle through the shared resource while the
//! priority policy makes everyone else defer without ever attempting an
//! acquisition. Low-priority workers exhaust their attempt budget and
//! report starvation.

use locklab::{ConfigFile, Reporter, Scenario, ScenarioKind, Timing};

fn main() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .try_init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config/config.json".to_string());

    let config = match ConfigFile::load(&path) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("failed to load {path}: {err}");
            std::process::exit(1);
        }
    };

    let reporter = Reporter::stdio();
    let scenario = match Scenario::from_config(
        ScenarioKind::Starvation,
        &config,
        Timing::default(),
        reporter.clone(),
    ) {
        Ok(scenario) => scenario,
        Err(err) => {
            eprintln!("invalid configuration in {path}: {err}");
            std::process::exit(1);
        }
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_time()
        .build()
        .expect("Failed to build runtime");

    let verdict = runtime.block_on(scenario.run());
    reporter.progress(&verdict);
}
