use clap::{Parser, Subcommand};
use observability::LogFormat;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "meshbook")]
#[command(about = "MeshBook - a peer-to-peer limit order book node")]
#[command(version = "0.1.0")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the node with the given configuration
    Start {
        /// Path to the configuration file
        #[arg(short, long, default_value = "meshbook.yaml")]
        config: PathBuf,

        /// Override the HTTP port
        #[arg(long)]
        http: Option<u16>,

        /// Log output format (pretty, json, compact)
        #[arg(long, default_value = "pretty")]
        log_format: LogFormat,
    },

    /// Validate a configuration without starting the node
    Validate {
        /// Path to the configuration file
        #[arg(short, long, default_value = "meshbook.yaml")]
        config: PathBuf,
    },

    /// Write a default configuration file
    Init {
        /// Output path for the new configuration file
        #[arg(short, long, default_value = "meshbook.yaml")]
        output: PathBuf,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
