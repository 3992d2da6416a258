mod export;
mod update;

use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::update::{run_update, UpdateOptions};

#[derive(Debug, Parser)]
#[command(name = "fuelmap")]
#[command(about = "Refreshes the fuel price map's data.js from the MIMIT open-data feeds")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Download both feeds, reconcile them, and rewrite data.js
    Update(UpdateArgs),
}

#[derive(Debug, Args)]
struct UpdateArgs {
    /// Web app directory to write data.js into (defaults to FUELMAP_OUTPUT_DIR)
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Read the station registry from a local file instead of downloading it
    #[arg(long, value_name = "PATH")]
    stations_file: Option<PathBuf>,

    /// Read the price listings from a local file instead of downloading them
    #[arg(long, value_name = "PATH")]
    prices_file: Option<PathBuf>,

    /// Keep only stations within this many kilometres of the reference point
    #[arg(long, value_name = "KM")]
    max_distance_km: Option<f64>,

    /// Run the whole pipeline and print the summary without writing data.js
    #[arg(long)]
    dry_run: bool,

    /// Do not require index.html in the output directory
    #[arg(long)]
    skip_page_check: bool,
}

impl From<UpdateArgs> for UpdateOptions {
    fn from(args: UpdateArgs) -> Self {
        Self {
            output_dir: args.output_dir,
            stations_file: args.stations_file,
            prices_file: args.prices_file,
            max_distance_km: args.max_distance_km,
            dry_run: args.dry_run,
            skip_page_check: args.skip_page_check,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let config = fuelmap_core::load_app_config_from_env().context("invalid configuration")?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Commands::Update(args) => {
            let outcome = run_update(&config, &args.into()).await?;
            tracing::info!(
                stations = outcome.stations,
                rejected_stations = outcome.report.stations.rejected,
                rejected_prices = outcome.report.prices.rows.rejected,
                written = outcome.written.is_some(),
                "update finished"
            );
        }
    }

    Ok(())
}
