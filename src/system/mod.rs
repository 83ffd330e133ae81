//! System-level modules
//!
//! - Logging initialization and the process-wide verbose switch
//! - Debug mode inference

pub mod debug_mode;
pub mod logging;
