//! Loading and saving node configuration

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info, instrument};

use crate::substitution::substitute_env_vars;
use crate::{MarketSection, NodeConfig, NodeSection, PeerSection};

/// Load a node configuration from a YAML file
///
/// `${VAR}` and `$VAR` placeholders are expanded from the environment
/// before the document is parsed; unresolved placeholders are left in
/// place for the validator to flag.
#[instrument(skip(path))]
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<NodeConfig> {
    let path = path.as_ref();
    info!("Loading configuration from: {:?}", path);

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {path:?}"))?;
    debug!("Config file content length: {} bytes", content.len());

    let substituted = substitute_env_vars(&content);

    let config: NodeConfig = serde_yaml::from_str(&substituted)
        .with_context(|| "Failed to parse YAML configuration")?;

    info!(pair = %config.market.pair, "Configuration loaded");
    Ok(config)
}

/// A starter configuration with every field at its default
pub fn generate_default_config() -> NodeConfig {
    NodeConfig {
        node: NodeSection::default(),
        market: MarketSection {
            pair: "BTC-USD".to_string(),
            price_precision: crate::default_price_precision(),
            quantity_precision: crate::default_quantity_precision(),
        },
        peers: PeerSection::default(),
    }
}

/// Write a configuration to a YAML file
#[instrument(skip(config))]
pub fn save_config<P: AsRef<Path> + std::fmt::Debug>(config: &NodeConfig, path: P) -> Result<()> {
    let path = path.as_ref();
    info!("Saving configuration to: {:?}", path);

    let yaml = serde_yaml::to_string(config)
        .with_context(|| "Failed to serialize configuration to YAML")?;
    fs::write(path, yaml).with_context(|| format!("Failed to write config file: {path:?}"))?;

    Ok(())
}
