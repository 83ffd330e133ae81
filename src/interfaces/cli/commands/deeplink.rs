//! resolve / generate commands

use colored::Colorize;

use crate::Hoko;
use crate::interfaces::cli::{CliError, parse_key_values, print_deeplink};

/// Match a URL against the configured routes and print the result
pub fn resolve_url(hoko: &Hoko, url: &str) -> Result<(), CliError> {
    match hoko.deeplinking().resolve(url) {
        Some(deeplink) => {
            print_deeplink(&deeplink);
            Ok(())
        }
        None => Err(CliError::CommandError(format!(
            "No configured route matches {}",
            url
        ))),
    }
}

/// Generate a deeplink for a configured route
pub fn generate_deeplink(
    hoko: &Hoko,
    route: &str,
    params: &[String],
    query: &[String],
) -> Result<(), CliError> {
    let route_parameters = parse_key_values(params)?;
    let query_parameters = parse_key_values(query)?;

    let deeplink = hoko
        .deeplinking()
        .generate_deeplink(route, route_parameters, query_parameters)?;

    println!("{}", deeplink.url.green());
    Ok(())
}
