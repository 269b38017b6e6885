//! The `rota optimize` command: one image in, one route per driver out.

use clap::{Args, ValueEnum};
use rota_core::output::OutputFormat as CoreOutputFormat;
use rota_core::{
    resolve_api_key, Config, ImageInput, OptimizationSession, OptimizeError, OutputWriter,
    RouteOptimizer, SessionState,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Duration;

use super::store::FileCredentialStore;
use super::theme;

/// Supported output formats.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable route report
    Text,
    /// Single JSON object with routes and citations
    Json,
    /// One JSON route per line
    Jsonl,
}

impl From<OutputFormat> for CoreOutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => CoreOutputFormat::Text,
            OutputFormat::Json => CoreOutputFormat::Json,
            OutputFormat::Jsonl => CoreOutputFormat::JsonLines,
        }
    }
}

/// Instruction and driver label language.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Language {
    /// Portuguese ("Motorista N")
    Pt,
    /// English ("Driver N")
    En,
}

impl Language {
    fn code(self) -> &'static str {
        match self {
            Language::Pt => "pt",
            Language::En => "en",
        }
    }
}

/// Arguments for the `optimize` command.
#[derive(Args, Debug)]
pub struct OptimizeArgs {
    /// Photo or scan of the delivery list
    #[arg(required = true)]
    pub image: PathBuf,

    /// Number of drivers to split the deliveries between
    #[arg(short, long)]
    pub drivers: Option<u32>,

    /// Gemini API key for this run (overrides config and stored key)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Gemini model name
    #[arg(long)]
    pub model: Option<String>,

    /// Instruction language
    #[arg(long, value_enum)]
    pub lang: Option<Language>,

    /// Output format (defaults to the config value)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Do not ground the answer in Google Maps
    #[arg(long)]
    pub no_grounding: bool,
}

/// Execute the optimize command.
pub async fn execute(args: OptimizeArgs) -> anyhow::Result<()> {
    let mut config = Config::load()?;
    apply_overrides(&mut config, &args);

    let driver_count = args.drivers.unwrap_or(config.optimize.default_drivers);
    let format = resolve_format(&args, &config)?;

    let store = FileCredentialStore::new(config.credentials_path());
    let api_key = resolve_api_key(args.api_key.as_deref(), &config.gemini, &store)?;
    if let Some((_, source)) = &api_key {
        tracing::debug!("Using API key from {:?}", source);
    }

    let image = ImageInput::from_path(&args.image, &config.limits)?;
    tracing::info!(
        "Loaded {:?} ({}, {} bytes)",
        args.image,
        image.media_type,
        image.byte_len
    );

    let optimizer = RouteOptimizer::from_config(&config, args.model.as_deref())?;
    let mut session = OptimizationSession::new();
    session.select_image(image)?;

    let spinner = create_spinner(driver_count);
    let outcome = session
        .run(&optimizer, api_key.as_ref().map(|(k, _)| k.as_str()), driver_count)
        .await;
    spinner.finish_and_clear();

    match outcome {
        Ok(SessionState::Succeeded) => {}
        Ok(_) => {
            let message = session.error().unwrap_or("Route generation failed.");
            print_hint(session.failure());
            anyhow::bail!("{message}");
        }
        Err(e) => anyhow::bail!("{}", e.user_message()),
    }

    let Some(result) = session.result() else {
        anyhow::bail!("Route generation finished without a result");
    };

    if let Some(ref output_path) = args.output {
        let file = File::create(output_path)?;
        let mut writer = OutputWriter::new(BufWriter::new(file), format, config.output.pretty);
        writer.write_result(result)?;
        writer.flush()?;
        theme::success(&format!(
            "{} route(s) written to {}",
            result.routes().len(),
            output_path.display()
        ));
    } else {
        let stdout = std::io::stdout();
        let mut writer = OutputWriter::new(stdout.lock(), format, config.output.pretty);
        writer.write_result(result)?;
        writer.flush()?;
    }

    Ok(())
}

/// Fold command-line overrides into the loaded config.
fn apply_overrides(config: &mut Config, args: &OptimizeArgs) {
    if let Some(lang) = args.lang {
        config.prompt.language = lang.code().to_string();
    }
    if args.no_grounding {
        config.gemini.grounding = false;
    }
    if args.pretty {
        config.output.pretty = true;
    }
}

fn resolve_format(args: &OptimizeArgs, config: &Config) -> anyhow::Result<CoreOutputFormat> {
    match args.format {
        Some(format) => Ok(format.into()),
        None => CoreOutputFormat::parse(&config.output.format).ok_or_else(|| {
            anyhow::anyhow!("Unknown output format in config: {}", config.output.format)
        }),
    }
}

/// Follow-up advice for failures the user can fix.
fn print_hint(failure: Option<&OptimizeError>) {
    match failure {
        Some(OptimizeError::CredentialRejected(_)) => {
            theme::hint("Run `rota key set` to store a valid key.");
        }
        Some(OptimizeError::ResponseFormat { .. }) => {
            theme::hint("Run with --verbose to see the raw model answer in the logs.");
        }
        _ => {}
    }
}

fn create_spinner(driver_count: u32) -> indicatif::ProgressBar {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(format!("Planning routes for {driver_count} driver(s)..."));
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}
