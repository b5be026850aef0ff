//! Logging setup for the binary
//!
//! Console output defaults to warnings. Useful `RUST_LOG` values:
//! - `RUST_LOG=keybridge::import=debug` shows decoded and skipped bindings
//! - `RUST_LOG=keybridge::export=debug` shows merge overrides and fallbacks
//! - `RUST_LOG=keybridge::mappings=debug,keybridge::validate=debug` traces
//!   table loading and rule runs
//!
//! Logs are also written to `~/.config/keybridge/logs/keybridge.log` with
//! daily rotation, always at debug level.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Initialize tracing subscriber with console and file logging
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(console_filter);

    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender = tracing_appender::rolling::daily(logs_dir, "keybridge.log");
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}
