//! The `rota config` command for configuration management.

use anyhow::Context;
use clap::{Args, Subcommand};
use rota_core::Config;
use std::path::Path;

use super::theme;

/// Arguments for the `config` command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Subcommands for configuration management.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective configuration as TOML
    Show,

    /// Print where the config file is read from
    Path,

    /// Write a config file with default values
    Init {
        /// Replace an existing config file
        #[arg(long)]
        force: bool,
    },
}

/// Execute the config command.
pub async fn execute(args: ConfigArgs) -> anyhow::Result<()> {
    let path = Config::default_path();

    match args.command {
        ConfigCommand::Show => {
            if !path.exists() {
                theme::hint(&format!(
                    "No config file at {}; showing defaults.",
                    path.display()
                ));
            }
            print!("{}", Config::load()?.to_toml()?);
        }
        ConfigCommand::Path => println!("{}", path.display()),
        ConfigCommand::Init { force } => {
            write_default(&path, force)?;
            tracing::debug!("Wrote default config to {}", path.display());
            theme::success(&format!("Config written to {}", path.display()));
        }
    }

    Ok(())
}

/// Write the default configuration to `path`; an existing file is kept
/// unless `force` is set.
fn write_default(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (pass --force to replace it)",
            path.display()
        );
    }

    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating {}", dir.display()))?;
    }
    std::fs::write(path, Config::default().to_toml()?)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
