use clap::Parser;

use hoko::cli::Cli;
use hoko::config::HokoConfig;
use hoko::interfaces::cli::{LOCAL_TOKEN, run_cli_command};
use hoko::system::logging;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut config = HokoConfig::load(cli.config.as_deref());
    if cli.verbose {
        config.logging.verbose = true;
    }
    let guard = logging::init_logging(&config.logging);

    let token = std::env::var("HOKO_TOKEN").unwrap_or_else(|_| LOCAL_TOKEN.to_string());

    if let Err(e) = run_cli_command(cli.command, config, &token).await {
        eprintln!("{}", e.format_colored());
        drop(guard);
        std::process::exit(1);
    }
    drop(guard);
}
