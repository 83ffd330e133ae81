//! CLI command implementations

mod config_gen;
mod deeplink;
mod push;

pub use config_gen::config_generate;
pub use deeplink::{generate_deeplink, resolve_url};
pub use push::handle_push;
