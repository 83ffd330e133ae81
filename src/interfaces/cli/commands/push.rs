//! push command

use std::io::Read;

use colored::Colorize;

use crate::Hoko;
use crate::interfaces::cli::CliError;
use crate::push::parse_notification;

fn read_payload(file_path: &str) -> Result<String, CliError> {
    if file_path == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| CliError::CommandError(format!("Failed to read stdin: {}", e)))?;
        return Ok(buf);
    }

    std::fs::read_to_string(file_path)
        .map_err(|e| CliError::CommandError(format!("Failed to read {}: {}", file_path, e)))
}

/// Read a push payload and hand it to the SDK
pub fn handle_push(hoko: &Hoko, file_path: &str) -> Result<(), CliError> {
    let raw = read_payload(file_path)?;
    let payload: serde_json::Value = serde_json::from_str(&raw)
        .map_err(|e| CliError::ParseError(format!("Invalid JSON payload: {}", e)))?;

    let notification = parse_notification(&payload)?;
    if let Some(ref alert) = notification.alert {
        println!("{} {}", "Alert:".bold(), alert);
    }
    if notification.is_silent() {
        println!("{}", "Silent notification".dimmed());
    }

    let handled = hoko
        .push_notifications()
        .handle_remote_notification(&payload)?;

    match (notification.deeplink, handled) {
        (Some(_), true) => println!("{}", "Deeplink handled".green()),
        (Some(url), false) => println!("{} {}", "No route matches".yellow(), url),
        (None, _) => println!("{}", "Notification carries no deeplink".yellow()),
    }
    Ok(())
}
