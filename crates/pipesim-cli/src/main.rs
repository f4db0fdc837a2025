mod cmd;
mod output;

use clap::{Parser, Subcommand};
use cmd::config::ConfigSubcommand;
use pipesim_core::config::DEFAULT_CONFIG_FILE;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "pipesim",
    about = "Synthetic delivery-pipeline activity: commits, pull requests, deployments, incidents",
    version,
    propagate_version = true
)]
struct Cli {
    /// Config file (missing file means defaults)
    #[arg(long, global = true, env = "PIPESIM_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP surface and the simulation clock until Ctrl-C
    Serve {
        /// Port to listen on
        #[arg(long, env = "PIPESIM_PORT", default_value = "3000")]
        port: u16,
        /// Address to bind
        #[arg(long, env = "PIPESIM_HOST", default_value = "0.0.0.0")]
        host: String,
        /// Webhook URL notified on each deployment completion
        #[arg(long, env = "PIPESIM_WEBHOOK_URL")]
        webhook_url: Option<String>,
        /// Milliseconds between half-ticks
        #[arg(long, env = "PIPESIM_TICK_INTERVAL_MS")]
        tick_interval_ms: Option<u64>,
        /// Seed for reproducible runs
        #[arg(long, env = "PIPESIM_SEED")]
        seed: Option<u64>,
    },

    /// Run cycles offline and print the resulting collections as JSON
    Simulate {
        /// Number of cycles (two half-ticks each)
        #[arg(long, default_value = "10")]
        ticks: u32,
        /// Seed for reproducible runs
        #[arg(long, env = "PIPESIM_SEED")]
        seed: Option<u64>,
        /// Keep an incident open for the whole run
        #[arg(long)]
        incident: bool,
        /// Write the snapshot to this file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// List issues assigned to a user on a running server
    Issues {
        /// Base URL of the server
        #[arg(long, env = "PIPESIM_URL", default_value = "http://localhost:3000")]
        url: String,
        /// Assignee to filter by (default: the creator author)
        #[arg(long)]
        assignee: Option<String>,
    },

    /// Manage the config file
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Serve {
            port,
            host,
            webhook_url,
            tick_interval_ms,
            seed,
        } => cmd::serve::run(
            &cli.config,
            cmd::serve::ServeArgs {
                host,
                port,
                webhook_url,
                tick_interval_ms,
                seed,
            },
        ),
        Commands::Simulate {
            ticks,
            seed,
            incident,
            out,
        } => cmd::simulate::run(
            &cli.config,
            cmd::simulate::SimulateArgs {
                ticks,
                seed,
                incident,
                out,
            },
        ),
        Commands::Issues { url, assignee } => {
            cmd::issues::run(&url, assignee.as_deref(), cli.json)
        }
        Commands::Config { subcommand } => cmd::config::run(&cli.config, subcommand, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
