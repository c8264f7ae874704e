//! scanner-ocr - run PaddleOCR on one image and print the text as JSON
//!
//! Stdout carries exactly one JSON document per run; diagnostics go to
//! stderr.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use scanner_ocr::app;
use scanner_ocr::config::{self, AppConfig};
use scanner_ocr::error::OcrError;
use scanner_ocr::result::OcrOutcome;
use scanner_ocr::vision::PaddleOcr;

/// Recognize the text in an image and print it as JSON
#[derive(Parser, Debug)]
#[command(name = "scanner-ocr", version)]
#[command(about = "Run PaddleOCR on one image and print the recognized text as JSON")]
struct Args {
    /// Image file to recognize
    #[arg(allow_hyphen_values = true)]
    image: Option<PathBuf>,

    /// Configuration file (defaults to config.toml in the user config dir)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Python interpreter that has PaddleOCR installed
    #[arg(long, value_name = "FILE")]
    python: Option<PathBuf>,

    /// Log more to stderr (repeat for more detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let outcome = match Args::try_parse() {
        Ok(args) => run(args),
        Err(e) if !e.use_stderr() => {
            // --help and --version
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => OcrOutcome::failure(&OcrError::Usage(usage_message(&e))),
    };

    if let Err(e) = outcome.write_to(std::io::stdout().lock()) {
        error!("Failed to write result: {}", e);
        return ExitCode::FAILURE;
    }
    outcome.exit_code()
}

fn run(args: Args) -> OcrOutcome {
    let config = config::load_or_default(args.config.as_deref());
    let level = config
        .as_ref()
        .map(|c| c.logging.level.as_str())
        .unwrap_or("warn");
    init_logging(level, args.verbose);

    // A bad config only matters once the image path has checked out
    let python = args.python;
    app::run(args.image.as_deref(), move || {
        let mut config: AppConfig = config.map_err(|e| OcrError::Config(format!("{:#}", e)))?;
        if let Some(python) = python {
            config.engine.python = Some(python);
        }
        debug!("Engine settings: {:?}", config.engine);
        PaddleOcr::new(config.engine.paddle_options())
    })
}

/// First line of a clap error, without its `error: ` prefix
fn usage_message(e: &clap::Error) -> String {
    let rendered = e.to_string();
    let first = rendered.lines().next().unwrap_or_default().trim();
    first.strip_prefix("error: ").unwrap_or(first).to_string()
}

/// Route logs to stderr so stdout stays a single JSON document.
///
/// `RUST_LOG` wins over the configured level and `-v` flags.
fn init_logging(level: &str, verbose: u8) {
    const LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

    let base = LEVELS
        .iter()
        .position(|l| l.eq_ignore_ascii_case(level.trim()))
        .unwrap_or(1);
    let effective = LEVELS[(base + verbose as usize).min(LEVELS.len() - 1)];

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}
