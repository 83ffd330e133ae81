//! Hoko - Deeplinking, push notifications and the analytics around them
//!
//! The [`Hoko`] facade wires three modules behind a single setup call:
//! - `deeplinking`: map routes to handlers, handle incoming deeplinks, generate deeplinks
//! - `push`: handle notifications carrying a mapped deeplink, manage device tokens
//! - `analytics`: identify users and track key events through a buffered upload queue
//!
//! # Features
//! - **cli**: `hoko` command-line tool (default)
//!
//! # Architecture
//! - `config`: TOML + environment configuration
//! - `network`: backend transport (HTTP or null)
//! - `system`: logging and debug mode inference
//! - `interfaces`: command-line interface

pub mod analytics;
pub mod config;
pub mod deeplinking;
pub mod errors;
mod hoko;
#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "cli")]
pub mod interfaces;
pub mod network;
pub mod push;
pub mod system;

pub use hoko::{Hoko, HokoBuilder};
