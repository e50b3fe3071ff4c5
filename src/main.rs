//! MediScope web shell.
//!
//! Serves the MediScope single-page client: a static route table of lazily
//! loaded page bundles, a loading fallback while a bundle is in flight, and,
//! for same-origin deployments, forwarding of backend paths to the API server.
//!
//! ```text
//!     Browser ──▶ http server ──▶ /, /login, ...  ──▶ shell (route table, lazy bundles)
//!                      │
//!                      ├──▶ /api/*, /process, POST /login ──▶ proxy ──▶ backend origin
//!                      │
//!                      └──▶ /_shell/* ──▶ status, routes, resolved client config
//! ```

use std::path::PathBuf;

use clap::Parser;

use mediscope_shell::config::load_config;
use mediscope_shell::lifecycle::startup;
use mediscope_shell::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "mediscope-shell")]
#[command(about = "MediScope web shell server", long_about = None)]
struct Cli {
    /// Path to the TOML config file. A missing default file falls back to defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

const DEFAULT_CONFIG: &str = "mediscope.toml";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let (path, optional) = match cli.config {
        Some(path) => (path, false),
        None => (PathBuf::from(DEFAULT_CONFIG), true),
    };
    let config = load_config(&path, optional)?;

    init_logging(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %path.display(),
        mode = config.deployment.mode.as_str(),
        bind_address = %config.listener.bind_address,
        routes = config.pages.routes.len(),
        "mediscope-shell starting"
    );

    startup::run(config).await?;
    Ok(())
}
