//! Configuration validation
//!
//! Validation never stops at the first problem: the whole document is
//! checked and a report of errors and warnings comes back, so an operator
//! fixes one round of mistakes instead of five.

use common::TradingPair;
use thiserror::Error;
use url::Url;

use crate::substitution::has_unresolved_env_vars;
use crate::NodeConfig;

/// `rust_decimal` supports at most 28 fractional digits.
const MAX_PRECISION: u32 = 28;

#[derive(Error, Debug, Clone)]
pub enum ValidationError {
    #[error("Market pair is required")]
    MissingPair,

    #[error("Invalid pair symbol '{0}'. Must be BASE-QUOTE (e.g., BTC-USD)")]
    InvalidPair(String),

    #[error("{field} must be at most {max} decimal places, got {got}")]
    PrecisionTooLarge { field: String, max: u32, got: u32 },

    #[error("Peer seed '{url}' is not a valid URL: {message}")]
    InvalidSeedUrl { url: String, message: String },

    #[error("Peer seed '{url}' must use http or https")]
    UnsupportedSeedScheme { url: String },

    #[error("Unresolved environment placeholder in {field}")]
    UnresolvedEnvVar { field: String },
}

#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
}

/// Everything wrong (and questionable) about a configuration
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn warn(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ValidationWarning {
            field: field.into(),
            message: message.into(),
        });
    }
}

/// Validate a node configuration
pub fn validate_config(config: &NodeConfig) -> ValidationReport {
    let mut report = ValidationReport::default();

    validate_market(config, &mut report);
    validate_node(config, &mut report);
    validate_peers(config, &mut report);

    report
}

fn validate_market(config: &NodeConfig, report: &mut ValidationReport) {
    let pair = config.market.pair.trim();
    if pair.is_empty() {
        report.errors.push(ValidationError::MissingPair);
    } else if has_unresolved_env_vars(pair) {
        report.errors.push(ValidationError::UnresolvedEnvVar {
            field: "market.pair".into(),
        });
    } else if TradingPair::parse(pair).is_none() {
        report
            .errors
            .push(ValidationError::InvalidPair(pair.to_string()));
    }

    for (field, got) in [
        ("market.price_precision", config.market.price_precision),
        (
            "market.quantity_precision",
            config.market.quantity_precision,
        ),
    ] {
        if got > MAX_PRECISION {
            report.errors.push(ValidationError::PrecisionTooLarge {
                field: field.into(),
                max: MAX_PRECISION,
                got,
            });
        }
    }
}

fn validate_node(config: &NodeConfig, report: &mut ValidationReport) {
    if config.node.http_port == 0 {
        report.warn(
            "node.http_port",
            "port 0 binds an ephemeral port; peers cannot be configured against it",
        );
    }
    if let Some(peer_id) = &config.node.peer_id {
        if peer_id.trim().is_empty() {
            report.warn(
                "node.peer_id",
                "empty peer_id is ignored; a random identifier will be generated",
            );
        }
    }
}

fn validate_peers(config: &NodeConfig, report: &mut ValidationReport) {
    if config.peers.seeds.is_empty() {
        report.warn(
            "peers.seeds",
            "no peers configured; the node runs in single-node mode",
        );
    }

    for seed in &config.peers.seeds {
        if has_unresolved_env_vars(seed) {
            report.errors.push(ValidationError::UnresolvedEnvVar {
                field: format!("peers.seeds ({seed})"),
            });
            continue;
        }
        match Url::parse(seed) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
            Ok(_) => {
                report.errors.push(ValidationError::UnsupportedSeedScheme {
                    url: seed.clone(),
                });
            }
            Err(err) => {
                report.errors.push(ValidationError::InvalidSeedUrl {
                    url: seed.clone(),
                    message: err.to_string(),
                });
            }
        }
    }

    if config.peers.request_timeout_ms == 0 {
        report.warn(
            "peers.request_timeout_ms",
            "a zero timeout makes every gossip delivery fail immediately",
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate_default_config;

    #[test]
    fn test_default_config_is_valid() {
        let report = validate_config(&generate_default_config());
        assert!(report.is_valid());
        // Single-node mode is worth a warning, not a failure.
        assert!(report.warnings.iter().any(|w| w.field == "peers.seeds"));
    }

    #[test]
    fn test_missing_pair_is_an_error() {
        let mut config = generate_default_config();
        config.market.pair = String::new();

        let report = validate_config(&config);
        assert!(!report.is_valid());
        assert!(matches!(report.errors[0], ValidationError::MissingPair));
    }

    #[test]
    fn test_malformed_pair_is_an_error() {
        let mut config = generate_default_config();
        config.market.pair = "BTCUSD".into();

        let report = validate_config(&config);
        assert!(matches!(report.errors[0], ValidationError::InvalidPair(_)));
    }

    #[test]
    fn test_precision_beyond_decimal_scale() {
        let mut config = generate_default_config();
        config.market.quantity_precision = 40;

        let report = validate_config(&config);
        assert!(matches!(
            report.errors[0],
            ValidationError::PrecisionTooLarge { .. }
        ));
    }

    #[test]
    fn test_seed_urls_are_checked() {
        let mut config = generate_default_config();
        config.peers.seeds = vec![
            "http://10.0.0.2:8080".into(),
            "ftp://10.0.0.3".into(),
            "not a url".into(),
        ];

        let report = validate_config(&config);
        assert_eq!(report.errors.len(), 2);
    }

    #[test]
    fn test_unresolved_placeholder_is_an_error() {
        let mut config = generate_default_config();
        config.market.pair = "${PAIR}".into();

        let report = validate_config(&config);
        assert!(matches!(
            report.errors[0],
            ValidationError::UnresolvedEnvVar { .. }
        ));
    }
}
