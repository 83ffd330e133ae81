//! CLI interface module
//!
//! Local tooling around the SDK: resolve and generate deeplinks against the
//! routes listed in the configuration, replay push payloads, generate config.

pub mod commands;

use std::collections::BTreeMap;
use std::fmt;

use crate::Hoko;
use crate::cli::{Commands, ConfigCommands};
use crate::config::HokoConfig;
use crate::deeplinking::Deeplink;
use crate::errors::HokoError;
use commands::{config_generate, generate_deeplink, handle_push, resolve_url};

/// Token used when `HOKO_TOKEN` is not set
pub const LOCAL_TOKEN: &str = "local";

#[derive(Debug)]
pub enum CliError {
    SdkError(String),
    ParseError(String),
    CommandError(String),
}

impl CliError {
    /// Format as simple output
    pub fn format_simple(&self) -> String {
        match self {
            CliError::SdkError(msg) => format!("SDK error: {}", msg),
            CliError::ParseError(msg) => format!("Parse error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    /// Format as colored output
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::SdkError(msg) => format!("{} {}", "SDK error:".red().bold(), msg.white()),
            CliError::ParseError(msg) => {
                format!("{} {}", "Parse error:".yellow().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<HokoError> for CliError {
    fn from(err: HokoError) -> Self {
        CliError::SdkError(err.format_simple())
    }
}

/// Parse a list of `key=value` arguments
pub fn parse_key_values(pairs: &[String]) -> Result<BTreeMap<String, String>, CliError> {
    let mut map = BTreeMap::new();
    for pair in pairs {
        let (key, value) = pair.split_once('=').ok_or_else(|| {
            CliError::ParseError(format!("Expected key=value, got '{}'", pair))
        })?;
        let key = key.trim();
        if key.is_empty() {
            return Err(CliError::ParseError(format!("Empty key in '{}'", pair)));
        }
        map.insert(key.to_string(), value.to_string());
    }
    Ok(map)
}

/// Print a deeplink as pretty JSON
pub fn print_deeplink(deeplink: &Deeplink) {
    match serde_json::to_string_pretty(deeplink) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize deeplink: {}", e),
    }
}

/// Build the SDK and map the configured routes to the printing handler
pub fn build_sdk(config: HokoConfig, token: &str) -> Result<Hoko, CliError> {
    let routes = config.deeplinking.routes.clone();
    let hoko = Hoko::builder(token).config(config).build()?;

    for route in &routes {
        hoko.deeplinking().map_route(route, print_deeplink)?;
    }
    Ok(hoko)
}

/// Run a CLI command from clap-parsed input
pub async fn run_cli_command(
    cmd: Commands,
    config: HokoConfig,
    token: &str,
) -> Result<(), CliError> {
    // config generate does not need an SDK instance
    if let Commands::Config { action } = cmd {
        let ConfigCommands::Generate { output_path, force } = action;
        return config_generate(output_path, force);
    }

    let hoko = build_sdk(config, token)?;
    let result = match cmd {
        Commands::Resolve { url } => resolve_url(&hoko, &url),
        Commands::Generate {
            route,
            params,
            query,
        } => generate_deeplink(&hoko, &route, &params, &query),
        Commands::Push { file_path } => handle_push(&hoko, &file_path),
        Commands::Config { .. } => Ok(()),
    };

    hoko.shutdown().await;
    result
}
