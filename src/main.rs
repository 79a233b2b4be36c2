//! RiskAtlas desktop dashboard
//!
//! Loads configuration, sets up logging and opens the GUI.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use eframe::egui;
use riskatlas_core::config::{LogFormat, LoggingConfig};
use riskatlas_core::AppConfig;
use riskatlas_gui::RiskAtlasApp;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// RiskAtlas - global trade risk intelligence dashboard
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend base URL, overrides the configuration file
    #[arg(long, env = "RISKATLAS_API_URL")]
    api_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Log output format
    #[arg(long, value_enum)]
    log_format: Option<LogFormatArg>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormatArg {
    Text,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Text => LogFormat::Text,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = AppConfig::load(args.config.as_deref()).context("Failed to load configuration")?;

    if let Some(url) = &args.api_url {
        config.api.base_url = url.clone();
    }
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }
    if let Some(format) = args.log_format {
        config.logging.format = format.into();
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// `RUST_LOG` wins over the configured level.
fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.to_lowercase()));

    match logging.format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;

    init_logging(&config.logging);
    tracing::info!("Starting RiskAtlas against {}", config.api.base_url);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("RiskAtlas - Global Trade Risk Intelligence")
            .with_inner_size([config.window.width, config.window.height])
            .with_min_inner_size([1024.0, 640.0]),
        ..Default::default()
    };

    eframe::run_native(
        "RiskAtlas",
        options,
        Box::new(move |cc| Ok(Box::new(RiskAtlasApp::new(cc, config)?))),
    )
    .map_err(|e| anyhow::anyhow!("GUI exited with error: {}", e))
}
