//! Map Event-State Replay.
//!
//! Spielt ein Interaktions-Szenario (JSON) gegen einen aufzeichnenden Renderer ab
//! und gibt pro Schritt aus, welche Quellen geflusht wurden.

use anyhow::{Context, Result};
use map_event_state::{replay, InteractionOptions};
use std::path::PathBuf;

fn main() -> Result<()> {
    ReplayRunner::run()
}

struct ReplayRunner;

impl ReplayRunner {
    fn run() -> Result<()> {
        // Logger initialisieren
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();

        log::info!(
            "Map Event-State Replay v{} startet...",
            env!("CARGO_PKG_VERSION")
        );

        let scenario_path = std::env::args_os()
            .nth(1)
            .map(PathBuf::from)
            .context("Aufruf: map-event-state-replay <szenario.json>")?;

        let options = InteractionOptions::load_from_file(&InteractionOptions::config_path());
        let scenario = replay::load_scenario(&scenario_path)?;
        let report = replay::run(&scenario, options);

        let output = serde_json::to_string_pretty(&report)
            .context("Report konnte nicht serialisiert werden")?;
        println!("{output}");
        Ok(())
    }
}
