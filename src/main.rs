//! Avenue: per-user hierarchical file and folder storage.
//!
//! Command-line entry point. Loads configuration, initializes logging,
//! wires the catalog, blob store, and auth together, and dispatches.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use avenue_core::config::{AppConfig, LoggingConfig};

mod app;
mod commands;
mod output;

use commands::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_configuration(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config.logging);

    if let Err(e) = cli.execute(config).await {
        output::print_error(&e.to_string());
        std::process::exit(1);
    }
}

/// Load configuration from `--config` (or `AVENUE_CONFIG`), the
/// `AVENUE_ENV` overlay, and `AVENUE__` environment variables.
fn load_configuration(cli: &Cli) -> Result<AppConfig, avenue_core::AppError> {
    let path = cli
        .config
        .clone()
        .or_else(|| std::env::var("AVENUE_CONFIG").ok())
        .unwrap_or_else(|| "config/default".to_string());
    let env = std::env::var("AVENUE_ENV").ok();

    AppConfig::load(&path, env.as_deref())
}

/// Initialize tracing. `RUST_LOG` overrides the configured level; logs go
/// to stderr so command output stays clean.
fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
