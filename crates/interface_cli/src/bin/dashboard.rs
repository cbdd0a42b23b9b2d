//! Clinical Task Dashboard - Terminal Binary
//!
//! Starts the dashboard against the configured backend and reads commands
//! from standard input.
//!
//! # Usage
//!
//! ```bash
//! # Run against built-in demo data
//! cargo run --bin clinical-dashboard
//!
//! # Run against the REST backend
//! DASHBOARD_DATA_SOURCE=http DASHBOARD_BACKEND_URL=http://localhost:8000 cargo run --bin clinical-dashboard
//! ```
//!
//! # Environment Variables
//!
//! * `DASHBOARD_BACKEND_URL` - Backend base URL (default: http://localhost:8000)
//! * `DASHBOARD_DATA_SOURCE` - `http` or `fixture` (default: fixture)
//! * `DASHBOARD_SELECTION_MODE` - `auto` or `manual` (default: auto)
//! * `DASHBOARD_REQUEST_TIMEOUT_SECS` - Per-request timeout (default: none)
//! * `DASHBOARD_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use interface_cli::{build_backend, DashboardApp, DashboardConfig, Flow};

/// Main entry point for the terminal dashboard.
///
/// # Errors
///
/// Returns an error if:
/// - Configuration is invalid
/// - The backend adapter cannot be built
/// - Standard input cannot be read
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = load_config()?;
    init_tracing(&config.log_level);

    tracing::info!(
        data_source = ?config.data_source,
        backend_url = %config.backend_url,
        selection_mode = ?config.selection_mode,
        "Starting clinical task dashboard"
    );

    let backend = build_backend(&config).context("failed to build backend adapter")?;
    let app = DashboardApp::new(backend, &config);

    println!("{}", app.start().await);
    print_notifications(&app);
    println!("Type 'help' for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line.context("failed to read standard input")?,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Received Ctrl+C, exiting");
                None
            }
        };

        let Some(line) = line else { break };

        match app.handle_line(&line).await {
            Flow::Quit => break,
            Flow::Continue(output) => {
                if !output.is_empty() {
                    println!("{}", output);
                }
            }
        }
        print_notifications(&app);
    }

    tracing::info!("Dashboard closed");
    Ok(())
}

/// Loads configuration from the environment, falling back to defaults.
///
/// # Errors
///
/// Returns an error if the resulting configuration fails validation
fn load_config() -> anyhow::Result<DashboardConfig> {
    let config = DashboardConfig::from_env().unwrap_or_else(|error| {
        eprintln!("Ignoring invalid dashboard configuration: {}", error);
        DashboardConfig::default()
    });
    config.validate().context("invalid dashboard configuration")?;
    Ok(config)
}

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so they do not interleave with the dashboard screen.
///
/// # Arguments
///
/// * `log_level` - The minimum log level to output (trace, debug, info, warn, error)
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}

fn print_notifications(app: &DashboardApp) {
    for line in app.drain_notifications() {
        println!("{}", line);
    }
}
