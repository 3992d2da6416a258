//! Price listings → lowest price per (station, fuel type).

use std::collections::BTreeSet;
use std::collections::btree_map::Entry;

use fuelmap_core::{FuelType, PriceMap, RawRow, Table};

use crate::columns::{infer_price_columns, PriceColumns};
use crate::error::{RowError, SchemaError};
use crate::fuel::classify_fuel;
use crate::numeric::parse_decimal;
use crate::stats::PriceStats;

/// One validated price observation.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceEntry {
    pub station_id: String,
    pub fuel: FuelType,
    /// Always strictly positive.
    pub price: f64,
}

/// Output of [`aggregate_prices`].
#[derive(Debug, Clone, Default)]
pub struct PriceAggregate {
    pub prices: PriceMap,
    pub stats: PriceStats,
    /// Set when the feed's columns could not be inferred; `prices` is then empty.
    pub schema_error: Option<SchemaError>,
}

fn cell<'a>(row: &'a RawRow, column: &str) -> &'a str {
    row.get(column).map_or("", |value| value.trim())
}

/// Validates one price row against the inferred columns.
///
/// # Errors
///
/// - [`RowError::MissingField`] for a blank id, description, or price.
/// - [`RowError::MalformedNumber`] for an unparseable price.
/// - [`RowError::NonPositivePrice`] for zero or negative prices.
/// - [`RowError::UnmappedFuel`] when the description matches no category.
pub fn price_entry(row: &RawRow, columns: &PriceColumns) -> Result<PriceEntry, RowError> {
    let station_id = cell(row, &columns.id);
    if station_id.is_empty() {
        return Err(RowError::MissingField { field: "station id" });
    }

    let description = cell(row, &columns.fuel);
    if description.is_empty() {
        return Err(RowError::MissingField {
            field: "fuel description",
        });
    }

    let price = parse_decimal("price", cell(row, &columns.price))?;
    if price <= 0.0 {
        return Err(RowError::NonPositivePrice { price });
    }

    let fuel =
        classify_fuel(description).ok_or_else(|| RowError::UnmappedFuel(description.to_owned()))?;

    Ok(PriceEntry {
        station_id: station_id.to_owned(),
        fuel,
        price,
    })
}

/// Builds the per-station price map from a price feed.
///
/// Columns are inferred from the table headers first; if that fails the
/// result is empty and carries the [`SchemaError`]. Otherwise each row is
/// validated with [`price_entry`], bad rows are tallied and skipped, and
/// repeated (station, fuel) pairs keep the lowest price.
#[must_use]
pub fn aggregate_prices(table: &Table) -> PriceAggregate {
    let columns = match infer_price_columns(&table.headers) {
        Ok(columns) => columns,
        Err(err) => {
            tracing::error!(error = %err, "could not identify price feed columns");
            return PriceAggregate {
                schema_error: Some(err),
                ..PriceAggregate::default()
            };
        }
    };
    tracing::info!(
        id = %columns.id,
        fuel = %columns.fuel,
        price = %columns.price,
        "using price feed columns"
    );

    let mut prices = PriceMap::new();
    let mut stats = PriceStats::default();

    for row in &table.rows {
        let entry = match price_entry(row, &columns) {
            Ok(entry) => entry,
            Err(err) => {
                tracing::trace!(error = %err, "skipping price row");
                stats.rows.reject(&err);
                continue;
            }
        };
        stats.rows.accept();

        match prices.entry(entry.station_id).or_default().entry(entry.fuel) {
            Entry::Vacant(slot) => {
                slot.insert(entry.price);
            }
            Entry::Occupied(mut slot) => {
                stats.duplicates += 1;
                if entry.price < *slot.get() {
                    slot.insert(entry.price);
                }
            }
        }
    }
    stats.stations_priced = prices.len();

    let fuels_seen: BTreeSet<FuelType> = prices
        .values()
        .flat_map(|station| station.keys().copied())
        .collect();
    tracing::info!(
        accepted = stats.rows.accepted,
        rejected = stats.rows.rejected,
        stations = stats.stations_priced,
        fuels = ?fuels_seen,
        "aggregated prices"
    );

    PriceAggregate {
        prices,
        stats,
        schema_error: None,
    }
}

#[cfg(test)]
#[path = "prices_test.rs"]
mod tests;
