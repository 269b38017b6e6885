//! Logging initialization.
//!
//! Uses the `tracing` ecosystem. Logs always go to stderr; stdout carries
//! route output only.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Filter directive for a configured level name.
///
/// Only Rota's own crates get the configured level; dependencies (HTTP
/// client, TLS) stay at `warn` unless `RUST_LOG` says otherwise.
fn directive(level: &str) -> String {
    let level = match level.to_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "warn" | "warning" => "warn",
        "error" => "error",
        _ => "info",
    };
    format!("warn,rota={level},rota_core={level}")
}

/// Initialize the logging subsystem.
///
/// * `level` - Level for Rota's crates (`trace`, `debug`, `info`, `warn`, `error`).
/// * `json_format` - If true, outputs structured JSON logs; otherwise human-readable.
///
/// The RUST_LOG environment variable overrides `level`.
pub fn init(level: &str, json_format: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive(level)));

    if json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(true),
            )
            .init();
    }
}

/// Initialize logging from the `[logging]` config section.
///
/// `--verbose` forces at least debug; `--json-logs` forces JSON.
pub fn init_from_config(config: &rota_core::Config, verbose: bool, json_logs: bool) {
    let level = if verbose && config.logging.level != "trace" {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    let json_format = json_logs || config.logging.format == "json";
    init(level, json_format);
}
