//! Node configuration for MeshBook
//!
//! Configuration is a single YAML document describing the node identity,
//! the market the book trades, and the gossip peers. Loading performs
//! `${VAR}` / `$VAR` environment substitution; validation produces a
//! report of errors and warnings rather than failing on the first problem.

use serde::{Deserialize, Serialize};

pub mod defaults;
pub mod parser;
pub mod substitution;
pub mod validator;

pub use defaults::*;
pub use parser::*;
pub use substitution::*;
pub use validator::*;

/// Top-level node configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NodeConfig {
    /// Node identity and listen address
    #[serde(default)]
    pub node: NodeSection,
    /// The market this node's book trades
    pub market: MarketSection,
    /// Gossip peer settings
    #[serde(default)]
    pub peers: PeerSection,
}

/// Node identity and listen address
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NodeSection {
    /// Replica identifier on the mesh; generated when absent
    #[serde(default)]
    pub peer_id: Option<String>,
    /// Host to bind the HTTP server to
    #[serde(default = "default_host")]
    pub host: String,
    /// HTTP port (REST, SSE, and the gossip endpoint)
    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

impl Default for NodeSection {
    fn default() -> Self {
        Self {
            peer_id: None,
            host: default_host(),
            http_port: default_http_port(),
        }
    }
}

/// Market parameters enforced by the book
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MarketSection {
    /// Pair symbol, BASE-QUOTE (e.g., "BTC-USD"); required
    pub pair: String,
    /// Decimal places for all price rounding
    #[serde(default = "default_price_precision")]
    pub price_precision: u32,
    /// Decimal places for all quantity rounding
    #[serde(default = "default_quantity_precision")]
    pub quantity_precision: u32,
}

/// Gossip peer settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PeerSection {
    /// Base URLs of known peers (e.g., "http://10.0.0.2:8080")
    #[serde(default)]
    pub seeds: Vec<String>,
    /// Per-peer request timeout for gossip deliveries
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for PeerSection {
    fn default() -> Self {
        Self {
            seeds: Vec::new(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_yaml_applies_defaults() {
        let config: NodeConfig =
            serde_yaml::from_str("market:\n  pair: BTC-USD\n").expect("minimal config");

        assert_eq!(config.market.pair, "BTC-USD");
        assert_eq!(config.market.price_precision, 2);
        assert_eq!(config.market.quantity_precision, 8);
        assert_eq!(config.node.host, "0.0.0.0");
        assert_eq!(config.node.http_port, 8080);
        assert!(config.peers.seeds.is_empty());
    }

    #[test]
    fn test_full_yaml_round_trip() {
        let yaml = r#"
node:
  peer_id: alpha
  host: 127.0.0.1
  http_port: 9000
market:
  pair: ETH-USDT
  price_precision: 4
  quantity_precision: 6
peers:
  seeds:
    - http://10.0.0.2:8080
  request_timeout_ms: 500
"#;
        let config: NodeConfig = serde_yaml::from_str(yaml).expect("full config");
        assert_eq!(config.node.peer_id.as_deref(), Some("alpha"));
        assert_eq!(config.peers.seeds.len(), 1);
        assert_eq!(config.peers.request_timeout_ms, 500);

        let dumped = serde_yaml::to_string(&config).expect("serializes");
        let reparsed: NodeConfig = serde_yaml::from_str(&dumped).expect("reparses");
        assert_eq!(reparsed.market.pair, "ETH-USDT");
    }
}
