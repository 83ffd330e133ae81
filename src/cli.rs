//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

/// Hoko - deeplink routing, push payload and configuration tooling
#[derive(Parser)]
#[command(name = "hoko")]
#[command(version)]
#[command(about = "Resolve, generate and inspect Hoko deeplinks", long_about = None)]
pub struct Cli {
    /// Configuration file (default: hoko.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    /// Enable SDK logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Match a URL against the configured routes
    Resolve {
        /// Deeplink URL, e.g. hoko://product/42?ref=mail
        url: String,
    },

    /// Generate a deeplink for a configured route
    ///
    /// Usage: generate product/:product_id -p product_id=42 -q ref=mail
    Generate {
        /// Route pattern
        route: String,

        /// Route parameter (key=value), repeatable
        #[arg(long = "param", short = 'p')]
        params: Vec<String>,

        /// Query parameter (key=value), repeatable
        #[arg(long = "query", short = 'q')]
        query: Vec<String>,
    },

    /// Handle a push notification payload from a JSON file ("-" for stdin)
    Push {
        /// Payload file path
        file_path: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Configuration management commands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: hoko.example.toml)
        output_path: Option<String>,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },
}
