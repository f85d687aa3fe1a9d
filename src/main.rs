//! deploy-hook entry point.
//!
//! Initializes tracing, loads configuration, resolves the deployment script
//! path, sets up the Axum router, and starts the HTTP server.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use deploy_hook::config::{AppConfig, LogFormat, DEFAULT_LOG_FILTER};
use deploy_hook::http::start_server;
use deploy_hook::{create_router, AppState, Launcher};

/// deploy-hook: launch a deployment script from a webhook
#[derive(Parser, Debug)]
#[command(name = "deploy-hook", version, about)]
struct Args {
    /// Path to configuration file (built-in defaults when omitted)
    #[arg(short, long)]
    config: Option<String>,

    /// Log level filter (e.g., "deploy_hook=debug")
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Configuration comes first so the log format is known before tracing starts
    let config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    let registry =
        tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::new(&log_filter));
    match config.logging.format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }

    match &args.config {
        Some(path) => tracing::info!(path = %path, "Loaded configuration"),
        None => tracing::info!("No configuration file given, using defaults"),
    }

    let launcher = Launcher::with_os(config.script_path()?);
    let script = launcher.script();
    if script.exists() {
        tracing::info!(script = %script.display(), "Deployment script configured");
    } else {
        tracing::warn!(
            script = %script.display(),
            "Deployment script not present yet, webhook calls will fail until it is"
        );
    }

    tracing::warn!("POST /webhook performs no caller authentication");

    let state = AppState::new(launcher);
    let app = create_router(state);

    start_server(app, &config).await?;

    Ok(())
}
