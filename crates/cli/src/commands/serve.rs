//! `askdesk serve` — Start the HTTP server.

use std::path::Path;

use tracing::{info, warn};

pub async fn run(
    config_path: Option<&Path>,
    host_override: Option<String>,
    port_override: Option<u16>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = super::load_config(config_path)?;

    if let Some(host) = host_override {
        config.gateway.host = host;
    }
    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    println!("📚 Askdesk");
    println!("   Listening: {}:{}", config.gateway.host, config.gateway.port);
    println!("   Model:     {}", config.provider.model);
    println!("   History:   {}", config.history.path.display());
    if !config.has_api_key() {
        println!("   ⚠️  No API key: knowledge-base misses will answer with an error");
        warn!("Serving without an API key");
    }

    info!(
        host = %config.gateway.host,
        port = config.gateway.port,
        model = %config.provider.model,
        "Starting Askdesk gateway"
    );

    askdesk_gateway::start(config).await?;

    Ok(())
}
