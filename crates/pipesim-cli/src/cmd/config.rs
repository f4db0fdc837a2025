use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use pipesim_core::config::SimConfig;
use std::path::{Path, PathBuf};

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Write a default config file if none exists
    Init {
        /// Where to write it (defaults to --config)
        #[arg(long)]
        path: Option<PathBuf>,
    },

    /// Print the effective config
    Show,

    /// Validate the config file
    Validate,
}

pub fn run(config_path: &Path, subcommand: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcommand {
        ConfigSubcommand::Init { path } => init(path.as_deref().unwrap_or(config_path)),
        ConfigSubcommand::Show => {
            let config = load(config_path)?;
            if json {
                print_json(&config)
            } else {
                print!("{}", config.to_yaml()?);
                Ok(())
            }
        }
        ConfigSubcommand::Validate => {
            load(config_path)?.validate()?;
            println!("{} is valid", config_path.display());
            Ok(())
        }
    }
}

fn load(path: &Path) -> anyhow::Result<SimConfig> {
    SimConfig::load_or_default(path).with_context(|| format!("failed to load {}", path.display()))
}

fn init(path: &Path) -> anyhow::Result<()> {
    let data = SimConfig::default().to_yaml()?;
    let written = pipesim_core::io::create_file(path, data.as_bytes())
        .with_context(|| format!("failed to write {}", path.display()))?;
    if written {
        println!("created {}", path.display());
    } else {
        println!("{} already exists; left unchanged", path.display());
    }
    Ok(())
}
