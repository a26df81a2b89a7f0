//! # scam-finder binary
//!
//! Command-line front-end: one scan per invocation.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use scam_finder_app::{APP_VERSION, AppConfig, AppError, Scanner, load_file, redact_sensitive};
use scam_finder_classifier::AcceptFilter;
use scam_finder_report::ReportView;
use tracing_subscriber::EnvFilter;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum FilterArg {
    All,
    Images,
    Documents,
    Web,
}

impl From<FilterArg> for AcceptFilter {
    fn from(value: FilterArg) -> Self {
        match value {
            FilterArg::All => Self::All,
            FilterArg::Images => Self::Images,
            FilterArg::Documents => Self::Documents,
            FilterArg::Web => Self::Web,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "scam-finder",
    version = APP_VERSION,
    about = "Scan text or a file for scam indicators"
)]
struct Args {
    /// Text to scan, or extra context when a file is given.
    #[arg(long, default_value = "")]
    text: String,
    /// File to upload for analysis.
    #[arg(long)]
    file: Option<PathBuf>,
    /// Declared MIME type of the file.
    #[arg(long, requires = "file")]
    mime: Option<String>,
    /// Restrict uploads to one file category.
    #[arg(long, value_enum, default_value_t = FilterArg::All)]
    filter: FilterArg,
    /// Print the raw result JSON instead of the report.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    match run(args).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!(
                "scan failed ({}): {}",
                error.kind(),
                redact_sensitive(&error.to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn run(args: Args) -> Result<String, CliError> {
    let config = AppConfig::from_env();
    let scanner = Scanner::new(&config)?;
    if !scanner.has_credential() {
        tracing::warn!("no API key configured; scans will be rejected");
    }

    let file = match &args.file {
        Some(path) => Some(load_file(path, args.mime.clone()).await?),
        None => None,
    };

    if let Some(file) = &file {
        let filter = AcceptFilter::from(args.filter);
        if !filter.accepts(file.file_name(), file.declared_mime_type()) {
            return Err(CliError::Filtered {
                file_name: file.file_name().to_string(),
                accept: filter.accept_attribute(),
            });
        }
    }

    let file_name = file.as_ref().map(|file| file.file_name().to_string());
    let result = scanner.scan_input(&args.text, file).await?;

    if args.json {
        return Ok(serde_json::to_string_pretty(&result)?);
    }
    Ok(ReportView::project(&result, file_name.as_deref()).render_text())
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    App(#[from] AppError),
    #[error("{file_name} is not accepted by this filter (accepts {accept})")]
    Filtered {
        file_name: String,
        accept: &'static str,
    },
    #[error("failed to encode result: {0}")]
    Encode(#[from] serde_json::Error),
}

impl CliError {
    fn kind(&self) -> &'static str {
        match self {
            Self::App(error) => error.kind().as_str(),
            Self::Filtered { .. } => "validation",
            Self::Encode(_) => "output",
        }
    }
}
