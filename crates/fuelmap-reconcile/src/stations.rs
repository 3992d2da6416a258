//! Registry rows → validated [`Station`] records.

use fuelmap_core::{GeoPoint, RawRow, Station};

use crate::error::RowError;
use crate::geo::BoundingBox;
use crate::numeric::parse_decimal;
use crate::stats::RowTally;

pub const COL_ID: &str = "idImpianto";
pub const COL_OPERATOR: &str = "Gestore";
pub const COL_BRAND: &str = "Bandiera";
pub const COL_ADDRESS: &str = "Indirizzo";
pub const COL_MUNICIPALITY: &str = "Comune";
pub const COL_PROVINCE: &str = "Provincia";
pub const COL_LATITUDE: &str = "Latitudine";
pub const COL_LONGITUDE: &str = "Longitudine";

/// Looks up a registry field by its exact name, then case-insensitively.
/// Missing fields read as empty.
fn field<'a>(row: &'a RawRow, name: &str) -> &'a str {
    row.get(name)
        .or_else(|| {
            row.iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value)
        })
        .map_or("", |value| value.trim())
}

/// Validates a single registry row.
///
/// # Errors
///
/// - [`RowError::MissingField`] for a blank id or coordinate.
/// - [`RowError::MalformedNumber`] for an unparseable coordinate.
/// - [`RowError::OutOfBounds`] when the position falls outside `area`.
pub fn normalize_station_row(row: &RawRow, area: &BoundingBox) -> Result<Station, RowError> {
    let latitude = parse_decimal(COL_LATITUDE, field(row, COL_LATITUDE))?;
    let longitude = parse_decimal(COL_LONGITUDE, field(row, COL_LONGITUDE))?;

    if !area.contains(GeoPoint::new(latitude, longitude)) {
        return Err(RowError::OutOfBounds {
            lat: latitude,
            lng: longitude,
        });
    }

    let id = field(row, COL_ID);
    if id.is_empty() {
        return Err(RowError::MissingField { field: COL_ID });
    }

    Ok(Station {
        id: id.to_owned(),
        name: field(row, COL_OPERATOR).to_owned(),
        brand: field(row, COL_BRAND).to_owned(),
        address: field(row, COL_ADDRESS).to_owned(),
        municipality: field(row, COL_MUNICIPALITY).to_owned(),
        province: field(row, COL_PROVINCE).to_owned(),
        latitude,
        longitude,
    })
}

/// Normalizes every registry row, skipping and tallying the invalid ones.
///
/// An empty result is the caller's signal that the feed was unusable.
pub fn normalize_stations(rows: &[RawRow], area: &BoundingBox) -> (Vec<Station>, RowTally) {
    let mut tally = RowTally::default();
    let mut stations = Vec::with_capacity(rows.len());

    for row in rows {
        match normalize_station_row(row, area) {
            Ok(station) => {
                tally.accept();
                stations.push(station);
            }
            Err(err) => {
                tracing::trace!(error = %err, "skipping station row");
                tally.reject(&err);
            }
        }
    }

    tracing::info!(
        accepted = tally.accepted,
        rejected = tally.rejected,
        "normalized stations"
    );
    (stations, tally)
}

#[cfg(test)]
#[path = "stations_test.rs"]
mod tests;
