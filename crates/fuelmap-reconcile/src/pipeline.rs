//! The full reconciliation run: normalize, aggregate, merge, filter.

use fuelmap_core::app_config::{DEFAULT_CENTER, DEFAULT_MAX_DISTANCE_KM};
use fuelmap_core::{AppConfig, GeoPoint, MergedStation, Table};

use crate::error::PipelineError;
use crate::geo::{filter_within, BoundingBox};
use crate::merge::merge_stations;
use crate::prices::aggregate_prices;
use crate::stations::normalize_stations;
use crate::stats::PipelineReport;

/// Tunables for [`run_pipeline`].
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub center: GeoPoint,
    pub max_distance_km: f64,
    /// Rows positioned outside this box are rejected during normalization.
    pub area: BoundingBox,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            max_distance_km: DEFAULT_MAX_DISTANCE_KM,
            area: BoundingBox::ITALY,
        }
    }
}

impl From<&AppConfig> for PipelineConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            center: config.center,
            max_distance_km: config.max_distance_km,
            area: BoundingBox::ITALY,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Priced stations in registry order.
    pub stations: Vec<MergedStation>,
    pub report: PipelineReport,
}

fn log_price_feed_shape(prices: &Table) {
    tracing::error!(
        headers = ?prices.headers,
        rows = prices.len(),
        first_row = ?prices.rows.first(),
        "price feed produced no usable prices"
    );
}

/// Runs every stage over the two parsed feeds.
///
/// Pure apart from logging: identical inputs give identical output.
///
/// # Errors
///
/// Returns the [`PipelineError`] for the first stage whose output is empty.
pub fn run_pipeline(
    stations: &Table,
    prices: &Table,
    config: &PipelineConfig,
) -> Result<PipelineOutput, PipelineError> {
    let mut report = PipelineReport::default();

    let (valid, tally) = normalize_stations(&stations.rows, &config.area);
    report.stations = tally;
    if valid.is_empty() {
        return Err(PipelineError::NoStations {
            total: report.stations.total,
            rejected: report.stations.rejected,
        });
    }

    let aggregate = aggregate_prices(prices);
    report.prices = aggregate.stats;
    if aggregate.prices.is_empty() {
        log_price_feed_shape(prices);
        return Err(PipelineError::NoPrices {
            schema: aggregate.schema_error,
        });
    }

    let (merged, merge_stats) = merge_stations(valid, &aggregate.prices);
    report.merge = merge_stats;
    if merged.is_empty() {
        return Err(PipelineError::NoMergedStations {
            stations: report.merge.stations,
        });
    }

    let (kept, filter_stats) = filter_within(merged, config.center, config.max_distance_km);
    report.filter = filter_stats;
    if kept.is_empty() {
        return Err(PipelineError::NoStationsInRange {
            max_distance_km: config.max_distance_km,
        });
    }

    tracing::info!(stations = kept.len(), "pipeline complete");
    Ok(PipelineOutput {
        stations: kept,
        report,
    })
}
