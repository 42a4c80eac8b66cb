//! Errorly Server
//!
//! Serves the dashboard, its route dictionary and the session endpoint.
//!
//! Run with: cargo run --bin errorly -- serve

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use errorly::config::{generate_default_config, Config, LoggingConfig};
use errorly::{serve, AppState, DictionarySource};

#[derive(Parser)]
#[command(name = "errorly")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Errorly dashboard server")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Generate the page dictionary and print it
    Dictionary {
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Generate default config file
    InitConfig {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };

    match cli.command {
        Commands::Serve { host, port } => {
            init_logging(&config.logging);

            let mut api_config = config.api.clone();
            if let Some(host) = host {
                api_config.host = host;
            }
            if let Some(port) = port {
                api_config.port = port;
            }

            tracing::info!("Starting Errorly v{}", env!("CARGO_PKG_VERSION"));
            tracing::info!("Template index: {:?}", config.dictionary.index_path);
            tracing::info!("Dashboard assets: {:?}", config.web.dist_dir);

            let state = AppState::from_config(&config);
            serve(state, &api_config).await?;
        }

        Commands::Dictionary { pretty } => {
            let source = DictionarySource::new(
                config.dictionary.index_path.clone(),
                config.dictionary.output_path.clone(),
            );
            let dictionary = source.generate()?;

            let output = if pretty {
                serde_json::to_string_pretty(&dictionary)?
            } else {
                serde_json::to_string(&dictionary)?
            };
            println!("{}", output);
        }

        Commands::InitConfig { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)
                        .with_context(|| format!("Failed to write config to {:?}", path))?;
                    eprintln!("Wrote default config to {:?}", path);
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}

fn init_logging(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("errorly={},tower_http=debug", logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);

    if logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
