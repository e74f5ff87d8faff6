use anyhow::Result;
use bridge_server::{ApiServer, SsdpResponder};
use clap::Parser;
use hueshim_core::BridgeConfig;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Emulated Philips Hue bridge for legacy discovery clients
#[derive(Debug, Parser)]
#[command(name = "hueshim", version)]
struct Cli {
    /// Path to the TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,hueshim=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    tracing::info!("Starting HueShim - emulated Hue bridge");

    let config_path = match cli.config {
        Some(path) => path,
        None => default_config_path()?,
    };

    let config = if config_path.exists() {
        tracing::info!("Loading config from {}", config_path.display());
        BridgeConfig::load(&config_path)?
    } else {
        tracing::info!("No config file at {}, using defaults", config_path.display());
        BridgeConfig::default()
    };

    let resolved = Arc::new(config.resolve()?);
    tracing::info!(
        "Advertising bridge at http://{}:{}/description.xml",
        resolved.advertise_ip,
        resolved.advertise_port
    );

    // The HTTP side comes up first so discovery never points at a
    // LOCATION that is not being served yet
    let mut api_server = ApiServer::new(resolved.clone());
    api_server.start().await?;

    let mut responder = SsdpResponder::new(resolved);
    responder.start()?;

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");

    responder.stop();
    api_server.stop().await;

    Ok(())
}

/// Get the config file path (platform-specific)
fn default_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Failed to get config directory"))?
        .join("hueshim");

    Ok(config_dir.join("hueshim.toml"))
}
