mod config;
mod server;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use airport_data::{download_if_missing, AirportStore};
use clap::Parser;
use config::AppConfig;
use log::{error, info};

/// Airport lookup and flight-plan link service
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Config file (TOML); defaults to the per-user config location
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address, e.g. 0.0.0.0:5003
    #[arg(long)]
    bind: Option<String>,

    /// Path to airports.csv
    #[arg(long)]
    data: Option<PathBuf>,

    /// Directory with logo.png, openapi.yaml and .well-known/ai-plugin.json
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Download airports.csv from OurAirports if it does not exist
    #[arg(long)]
    download: bool,
}

impl Args {
    fn to_config(&self) -> Result<AppConfig, confy::ConfyError> {
        let mut config = match &self.config {
            Some(path) => {
                info!("Loading configuration from {}", path.display());
                AppConfig::load_path(path)?
            }
            None => {
                if let Ok(path) = AppConfig::get_config_path() {
                    info!("Loading configuration from {}", path.display());
                }
                AppConfig::load()?
            }
        };

        if let Some(bind) = &self.bind {
            config.server.bind_address.clone_from(bind);
        }
        if let Some(data) = &self.data {
            config.data.airports_path.clone_from(data);
        }
        if let Some(assets) = &self.assets {
            config.assets_dir.clone_from(assets);
        }
        if self.download {
            config.data.download_if_missing = true;
        }

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    info!("Starting airport finder...");
    if let Err(e) = run(&args).await {
        error!("Error: {e}");
        return ExitCode::FAILURE;
    }

    info!("Airport finder has been terminated.");
    ExitCode::SUCCESS
}

async fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = args.to_config()?;

    let data_path = config.data.airports_path.clone();
    if config.data.download_if_missing {
        download_if_missing(&data_path, &config.data.download_url).await?;
    }

    let store = tokio::task::spawn_blocking(move || AirportStore::load(data_path)).await??;

    let router = server::router(Arc::new(store), &config)?;
    server::serve(router, &config).await?;

    Ok(())
}
