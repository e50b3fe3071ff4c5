use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::Value;

use mediscope_shell::config::load_config;
use mediscope_shell::EndpointResolver;

#[derive(Parser)]
#[command(name = "shell-cli")]
#[command(about = "Inspect a MediScope shell deployment", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:5173")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve endpoint names against a config file, without a running server
    Resolve {
        /// Endpoint names, e.g. `login` or `/api/chat`
        #[arg(required = true)]
        endpoints: Vec<String>,

        #[arg(short, long, default_value = "mediscope.toml")]
        config: PathBuf,
    },
    /// Show shell status
    Status,
    /// List page routes and bundle cache state
    Routes,
    /// Show the endpoint table served to page bundles
    Config,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let path = match cli.command {
        Commands::Resolve { endpoints, config } => {
            let config = load_config(&config, true)?;
            let resolver = EndpointResolver::new(&config.deployment)?;
            println!("# mode={} same_origin={}", resolver.mode().as_str(), resolver.is_same_origin());
            for endpoint in endpoints {
                println!("{}\t{}", endpoint, resolver.resolve(&endpoint));
            }
            return Ok(());
        }
        Commands::Status => "/_shell/status",
        Commands::Routes => "/_shell/routes",
        Commands::Config => "/_shell/config",
    };

    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}{}", cli.url.trim_end_matches('/'), path))
        .send()
        .await?;
    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: shell returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
