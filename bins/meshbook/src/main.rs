//! MeshBook node binary
//!
//! Entry point for a single replica: loads and validates configuration,
//! builds the book and replica node, synchronizes against peers, and
//! serves the HTTP surface until Ctrl+C.

use anyhow::{Context, Result};
use book::{BookConfig, OrderBook};
use cli::{Cli, Commands};
use config::{generate_default_config, load_config, save_config, validate_config};
use observability::{init_logging, LogFormat};
use replica::{ReplicaNode, Transport};
use server::{
    build_state, create_router, wire_book_events, HttpGossipTransport, HttpServer, ServerConfig,
};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{error, info, warn};
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    match cli.command {
        Commands::Start {
            config,
            http,
            log_format,
        } => {
            init_logging("meshbook", log_format)?;
            start_node(config, http).await
        }
        Commands::Validate { config } => {
            init_logging("meshbook", LogFormat::Compact)?;
            validate_command(config)
        }
        Commands::Init { output } => {
            init_logging("meshbook", LogFormat::Compact)?;
            init_command(output)
        }
    }
}

async fn start_node<P: AsRef<Path>>(config_path: P, http_override: Option<u16>) -> Result<()> {
    let config = load_config(&config_path)?;

    let report = validate_config(&config);
    for warning in &report.warnings {
        warn!(field = %warning.field, message = %warning.message, "Configuration warning");
    }
    if !report.is_valid() {
        for err in &report.errors {
            error!("{err}");
        }
        anyhow::bail!("Cannot start node due to configuration errors");
    }

    let http_port = http_override.unwrap_or(config.node.http_port);
    let peer_id = config
        .node
        .peer_id
        .clone()
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    info!(
        peer_id = %peer_id,
        pair = %config.market.pair,
        http_port,
        peers = config.peers.seeds.len(),
        "Starting node"
    );

    let (events, _) = broadcast::channel(256);

    let mut book = OrderBook::new(
        BookConfig::new(config.market.pair.clone()).with_precisions(
            config.market.price_precision,
            config.market.quantity_precision,
        ),
    );
    wire_book_events(&mut book, &events);

    let transport: Arc<dyn Transport> = Arc::new(HttpGossipTransport::new(
        config.peers.seeds.clone(),
        Duration::from_millis(config.peers.request_timeout_ms),
    ));
    let mut node = ReplicaNode::new(peer_id, book, transport);

    match node.sync_with_peers().await {
        Ok(true) => info!("Book synchronized from a peer snapshot"),
        Ok(false) => info!("No peer snapshot available; starting with an empty book"),
        Err(err) => {
            // A peer serving a different pair means this node is pointed
            // at the wrong mesh; refuse to start.
            return Err(err).context("Peer snapshot could not be loaded");
        }
    }

    let state = build_state(node, events);
    let router = create_router(state);
    let server = HttpServer::new(
        ServerConfig::new(config.node.host.clone(), http_port),
        router,
    );

    server.run_with_ctrl_c().await?;
    Ok(())
}

fn validate_command<P: AsRef<Path>>(config_path: P) -> Result<()> {
    let config = load_config(&config_path)?;
    let report = validate_config(&config);

    println!("\n=== Configuration Validation Report ===\n");

    if !report.warnings.is_empty() {
        println!("Warnings ({}):", report.warnings.len());
        for warning in &report.warnings {
            println!("  [warn] [{}] {}", warning.field, warning.message);
        }
        println!();
    }

    if !report.errors.is_empty() {
        println!("Errors ({}):", report.errors.len());
        for err in &report.errors {
            println!("  [error] {err}");
        }
        println!();
        anyhow::bail!("Configuration validation failed");
    }

    println!("[ok] Configuration is valid!");
    println!();
    println!("Pair: {}", config.market.pair);
    println!("Price precision: {}", config.market.price_precision);
    println!("Quantity precision: {}", config.market.quantity_precision);
    println!("Peers: {}", config.peers.seeds.len());

    Ok(())
}

fn init_command<P: AsRef<Path>>(output_path: P) -> Result<()> {
    let output_path = output_path.as_ref();
    info!(?output_path, "Writing default configuration");

    let config = generate_default_config();

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {parent:?}"))?;
        }
    }
    save_config(&config, output_path)?;

    println!("[ok] Configuration file created!");
    println!();
    println!("Location: {output_path:?}");
    println!();
    println!("Next steps:");
    println!("  1. Edit the file: set the market pair and add peer seeds");
    println!("  2. Run 'meshbook validate --config {output_path:?}'");
    println!("  3. Run 'meshbook start --config {output_path:?}'");

    Ok(())
}
