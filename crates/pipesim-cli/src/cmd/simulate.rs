use crate::output::print_json;
use anyhow::{Context, Result};
use chrono::Utc;
use pipesim_core::config::SimConfig;
use pipesim_core::Simulation;
use std::path::{Path, PathBuf};

pub struct SimulateArgs {
    pub ticks: u32,
    pub seed: Option<u64>,
    pub incident: bool,
    pub out: Option<PathBuf>,
}

pub fn run(config_path: &Path, args: SimulateArgs) -> Result<()> {
    let mut config = SimConfig::load_or_default(config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))?;
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let mut sim = Simulation::new(config)?;
    if args.incident {
        sim.store_mut()
            .report_incident("offline", "held open for the whole run");
    }

    let mut completed = 0u32;
    for _ in 0..args.ticks {
        if sim.cycle(Utc::now()).completed.is_some() {
            completed += 1;
        }
    }
    tracing::info!(cycles = args.ticks, completed, "simulation finished");

    let snapshot = sim.store().snapshot();
    match args.out {
        Some(path) => {
            pipesim_core::io::write_json(&path, &snapshot)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("wrote {}", path.display());
            Ok(())
        }
        None => print_json(&snapshot),
    }
}
