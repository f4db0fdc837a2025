use anyhow::{Context, Result};
use pipesim_core::config::SimConfig;
use std::path::Path;

pub struct ServeArgs {
    pub host: String,
    pub port: u16,
    pub webhook_url: Option<String>,
    pub tick_interval_ms: Option<u64>,
    pub seed: Option<u64>,
}

/// Layer flag overrides on top of the file config.
fn resolve_config(path: &Path, args: &ServeArgs) -> Result<SimConfig> {
    let mut config = SimConfig::load_or_default(path)
        .with_context(|| format!("failed to load {}", path.display()))?;
    if let Some(url) = &args.webhook_url {
        config.webhook_url = Some(url.clone());
    }
    if let Some(ms) = args.tick_interval_ms {
        config.tick_interval_ms = ms;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    config.validate()?;
    Ok(config)
}

pub fn run(config_path: &Path, args: ServeArgs) -> Result<()> {
    let config = resolve_config(config_path, &args)?;
    let rt = tokio::runtime::Runtime::new()?;

    rt.block_on(async move {
        let addr = format!("{}:{}", args.host, args.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;
        let actual_port = listener.local_addr()?.port();
        println!("pipesim → http://localhost:{actual_port}");

        pipesim_server::serve_on(listener, config, async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
    })
}
