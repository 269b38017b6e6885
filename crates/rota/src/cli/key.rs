//! The `rota key` command for managing the stored Gemini API key.

use clap::{Args, Subcommand};
use dialoguer::Password;
use rota_core::{resolve_api_key, Config, CredentialSource, CredentialStore};

use super::store::FileCredentialStore;
use super::theme;

/// Arguments for the `key` command.
#[derive(Args, Debug)]
pub struct KeyArgs {
    #[command(subcommand)]
    pub command: KeyCommand,
}

/// Subcommands for credential management.
#[derive(Subcommand, Debug)]
pub enum KeyCommand {
    /// Store an API key (prompts with hidden input if omitted)
    Set {
        /// The Gemini API key
        key: Option<String>,
    },

    /// Remove the stored API key
    Clear,

    /// Show which API key would be used, and where it comes from
    Status,

    /// Show the credential file path
    Path,
}

/// Execute the key command.
pub async fn execute(args: KeyArgs) -> anyhow::Result<()> {
    let config = Config::load()?;
    let store = FileCredentialStore::new(config.credentials_path());

    match args.command {
        KeyCommand::Set { key } => {
            let key = match key {
                Some(key) => key,
                None => {
                    let Some(key) = super::handle_interrupt(
                        Password::with_theme(&theme::rota_theme())
                            .with_prompt("Gemini API key")
                            .interact(),
                    )?
                    else {
                        return Ok(());
                    };
                    key
                }
            };

            let key = key.trim();
            if key.is_empty() {
                anyhow::bail!("API key cannot be empty");
            }
            store.set(key)?;
            theme::success(&format!("Key saved to {}", store.path().display()));
        }

        KeyCommand::Clear => {
            store.clear()?;
            theme::success("Stored key removed");
        }

        KeyCommand::Status => match resolve_api_key(None, &config.gemini, &store)? {
            Some((key, source)) => {
                println!("{} ({})", mask(&key), source_label(source));
            }
            None => {
                println!("not set");
                theme::hint("Set GEMINI_API_KEY or run `rota key set`.");
            }
        },

        KeyCommand::Path => {
            println!("{}", store.path().display());
        }
    }

    Ok(())
}

fn source_label(source: CredentialSource) -> &'static str {
    match source {
        CredentialSource::Explicit => "command line",
        CredentialSource::Config => "config / environment",
        CredentialSource::Store => "stored",
    }
}

/// Show only the last four characters of a key.
fn mask(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), tail)
}
