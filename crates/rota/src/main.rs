//! Rota CLI - Turn a photo of a delivery list into one route per driver.
//!
//! Rota sends the image to Gemini (grounded with Google Maps) and prints the
//! routes it plans, as a readable report or as JSON.
//!
//! # Usage
//!
//! ```bash
//! # Store the API key once
//! rota key set
//!
//! # Split a list between three drivers
//! rota optimize lista.jpg --drivers 3
//!
//! # Machine-readable output
//! rota optimize lista.jpg -f json --pretty -o rotas.json
//!
//! # View configuration
//! rota config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Rota - AI-planned delivery routes from a photographed delivery list.
#[derive(Parser, Debug)]
#[command(name = "rota")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Plan delivery routes from a delivery-list image
    Optimize(cli::optimize::OptimizeArgs),

    /// Manage the stored Gemini API key
    Key(cli::key::KeyArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so config warnings go through eprintln.
    let config = match rota_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `rota config path`."
            );
            rota_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Rota v{}", rota_core::VERSION);

    match cli.command {
        Commands::Optimize(args) => cli::optimize::execute(args).await,
        Commands::Key(args) => cli::key::execute(args).await,
        Commands::Config(args) => cli::config::execute(args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["rota", "optimize", "lista.png", "-v", "--json-logs"]);
        assert!(cli.verbose);
        assert!(cli.json_logs);
        assert!(matches!(cli.command, Commands::Optimize(_)));
    }

    #[test]
    fn key_set_without_value() {
        let parsed = Cli::parse_from(["rota", "key", "set"]);
        match parsed.command {
            Commands::Key(args) => {
                assert!(matches!(args.command, cli::key::KeyCommand::Set { key: None }))
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
