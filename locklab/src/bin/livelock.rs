//! Binary target for the livelock demonstration.
//!
//! Workers acquire their first resource, fail on the second, back off in
//! lockstep and retry. They stay busy for the whole round budget without
//! making progress, then give up and report livelock.

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
        ScenarioKind::Livelock,
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
