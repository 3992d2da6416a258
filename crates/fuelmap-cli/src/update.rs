//! The `update` command: fetch both feeds, reconcile them, write `data.js`.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use chrono::Local;
use fuelmap_core::{AppConfig, Table};
use fuelmap_feed::{read_table_file, FeedClient, TableFormat};
use fuelmap_reconcile::{run_pipeline, PipelineConfig, PipelineReport};

use crate::export::{render_data_js, write_data_js, ExportDocument, DATA_FILE_NAME};

/// File that marks a directory as the static web app.
pub(crate) const PAGE_MARKER: &str = "index.html";

/// Per-run overrides taken from the command line.
#[derive(Debug, Clone, Default)]
pub(crate) struct UpdateOptions {
    pub output_dir: Option<PathBuf>,
    pub stations_file: Option<PathBuf>,
    pub prices_file: Option<PathBuf>,
    pub max_distance_km: Option<f64>,
    pub dry_run: bool,
    pub skip_page_check: bool,
}

/// What a successful run did.
#[derive(Debug)]
pub(crate) struct UpdateOutcome {
    pub stations: usize,
    pub report: PipelineReport,
    /// `None` on a dry run.
    pub written: Option<PathBuf>,
}

/// Reads a feed from `file` when given, otherwise downloads it from `url`.
async fn load_feed(
    client: &FeedClient,
    url: &str,
    file: Option<&Path>,
    description: &str,
) -> anyhow::Result<Table> {
    let format = TableFormat::mimit();
    let table = match file {
        Some(path) => {
            tracing::info!(path = %path.display(), description, "reading feed from file");
            read_table_file(path, &format)
        }
        None => client.fetch_table(url, description, &format).await,
    }
    .with_context(|| format!("failed to load {description} feed"))?;

    if table.skipped_rows > 0 {
        tracing::warn!(
            description,
            skipped = table.skipped_rows,
            "skipped malformed rows while loading feed"
        );
    }
    Ok(table)
}

fn pipeline_config(config: &AppConfig, options: &UpdateOptions) -> anyhow::Result<PipelineConfig> {
    let mut pipeline = PipelineConfig::from(config);
    if let Some(km) = options.max_distance_km {
        if !km.is_finite() || km <= 0.0 {
            anyhow::bail!("--max-distance-km must be a positive number, got {km}");
        }
        pipeline.max_distance_km = km;
    }
    Ok(pipeline)
}

/// Runs one full update.
///
/// Nothing is written unless every stage produced data; with `dry_run` set
/// nothing is written at all.
///
/// # Errors
///
/// Returns an error if the output directory is not the web app's directory,
/// if either feed cannot be loaded, if any pipeline stage comes up empty, or
/// if `data.js` cannot be written.
pub(crate) async fn run_update(
    config: &AppConfig,
    options: &UpdateOptions,
) -> anyhow::Result<UpdateOutcome> {
    let output_dir = options
        .output_dir
        .clone()
        .unwrap_or_else(|| config.output_dir.clone());

    if !options.skip_page_check && !output_dir.join(PAGE_MARKER).is_file() {
        anyhow::bail!(
            "{PAGE_MARKER} not found in {}; run from the web app directory, pass --output-dir, \
             or use --skip-page-check",
            output_dir.display()
        );
    }

    let pipeline = pipeline_config(config, options)?;

    let client = FeedClient::new(
        config.request_timeout_secs,
        &config.user_agent,
        config.max_retries,
        config.retry_backoff_base_ms,
    )
    .context("failed to build feed client")?;

    let (stations, prices) = tokio::try_join!(
        load_feed(
            &client,
            &config.stations_url,
            options.stations_file.as_deref(),
            "stations",
        ),
        load_feed(
            &client,
            &config.prices_url,
            options.prices_file.as_deref(),
            "prices",
        ),
    )?;

    let output =
        run_pipeline(&stations, &prices, &pipeline).context("reconciliation produced no data")?;

    println!("{}", output.report);
    let count = output.stations.len();

    if options.dry_run {
        println!(
            "dry-run: would write {count} stations to {}",
            output_dir.join(DATA_FILE_NAME).display()
        );
        return Ok(UpdateOutcome {
            stations: count,
            report: output.report,
            written: None,
        });
    }

    let doc = ExportDocument::new(output.stations, Local::now().naive_local());
    let script = render_data_js(&doc)?;
    let path = write_data_js(&output_dir, &script)?;
    println!("updated {} with {count} stations", path.display());

    Ok(UpdateOutcome {
        stations: count,
        report: output.report,
        written: Some(path),
    })
}

#[cfg(test)]
#[path = "update_test.rs"]
mod tests;
