//! Logging system initialization
//!
//! Installs the tracing subscriber used by the SDK and owns the process-wide
//! verbose switch. The switch is a reloadable level filter sitting in front
//! of the configured `EnvFilter`: with verbose off nothing is emitted, with
//! verbose on records pass through to the configured level.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing_appender::rolling;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, fmt, reload};

use crate::config::{LogFormat, LoggingConfig};

static VERBOSE: AtomicBool = AtomicBool::new(false);
static VERBOSE_HANDLE: OnceLock<reload::Handle<LevelFilter, Registry>> = OnceLock::new();

fn gate(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::TRACE
    } else {
        LevelFilter::OFF
    }
}

/// Enable or disable SDK logging
///
/// Takes effect immediately for every thread. Safe to call before
/// [`init_logging`]; the value is picked up when the subscriber is installed.
pub fn set_verbose(verbose: bool) {
    VERBOSE.store(verbose, Ordering::SeqCst);
    if let Some(handle) = VERBOSE_HANDLE.get()
        && let Err(e) = handle.modify(|filter| *filter = gate(verbose))
    {
        eprintln!("[WARN] Failed to update log verbosity: {}", e);
    }
}

/// Current state of the verbose switch
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

fn build_writer(config: &LoggingConfig) -> Box<dyn std::io::Write + Send + Sync> {
    let Some(log_file) = config.file.as_deref().filter(|f| !f.is_empty()) else {
        return Box::new(std::io::stdout());
    };

    if config.enable_rotation {
        let path = std::path::Path::new(log_file);
        let dir = path.parent().unwrap_or(std::path::Path::new("."));
        let filename = path
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("hoko.log");
        match rolling::Builder::new()
            .rotation(rolling::Rotation::DAILY)
            .filename_prefix(filename.trim_end_matches(".log"))
            .filename_suffix("log")
            .max_log_files(config.max_backups.max(1) as usize)
            .build(dir)
        {
            Ok(appender) => Box::new(appender),
            Err(e) => {
                eprintln!(
                    "[ERROR] Failed to create rolling log appender: {}, logging to stdout",
                    e
                );
                Box::new(std::io::stdout())
            }
        }
    } else {
        match std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_file)
        {
            Ok(file) => Box::new(file),
            Err(e) => {
                eprintln!(
                    "[ERROR] Failed to open log file {}: {}, logging to stdout",
                    log_file, e
                );
                Box::new(std::io::stdout())
            }
        }
    }
}

/// Initialize logging system based on configuration
///
/// `config.verbose = true` turns the verbose switch on; `false` keeps
/// whatever an earlier [`set_verbose`] call chose.
///
/// # Returns
/// * `Some(WorkerGuard)` - must be kept alive so buffered records get flushed
/// * `None` - a global subscriber was already installed
pub fn init_logging(config: &LoggingConfig) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    if VERBOSE_HANDLE.get().is_some() {
        return None;
    }

    let ansi = config.file.as_ref().is_none_or(|f| f.is_empty());
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(build_writer(config));

    let env_filter = EnvFilter::try_new(&config.level).unwrap_or_else(|e| {
        eprintln!(
            "[WARN] Invalid log level '{}': {}, falling back to info",
            config.level, e
        );
        EnvFilter::new("info")
    });

    // An earlier set_verbose(true) survives a config that leaves verbose off
    let verbose = VERBOSE.fetch_or(config.verbose, Ordering::SeqCst) || config.verbose;
    let (verbose_layer, handle) = reload::Layer::new(gate(verbose));

    let fmt_layer = fmt::layer()
        .with_writer(non_blocking_writer)
        .with_level(true)
        .with_target(true)
        .with_ansi(ansi);

    let installed = match config.format {
        LogFormat::Json => Registry::default()
            .with(verbose_layer)
            .with(env_filter)
            .with(fmt_layer.json())
            .try_init(),
        LogFormat::Text => Registry::default()
            .with(verbose_layer)
            .with(env_filter)
            .with(fmt_layer)
            .try_init(),
    };

    if installed.is_err() {
        return None;
    }

    if VERBOSE_HANDLE.set(handle).is_err() {
        return None;
    }
    // Picks up a set_verbose call made while the subscriber was being installed
    set_verbose(is_verbose());

    Some(guard)
}
