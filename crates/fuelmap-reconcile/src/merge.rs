//! Station/price join.

use fuelmap_core::{MergedStation, PriceMap, Station};
use sha2::{Digest, Sha256};

use crate::stats::MergeStats;

/// Placeholder for a blank operator name.
pub const UNKNOWN_OPERATOR: &str = "Unknown operator";
/// Placeholder for a blank brand.
pub const UNKNOWN_BRAND: &str = "N/A";

/// Surrogate ids fall in `1..=SURROGATE_ID_MAX`.
pub const SURROGATE_ID_MAX: u64 = 999_999;

/// Display id for a registry id.
///
/// All-digit ids are used as-is. Anything else (or a digit string too long
/// for `u64`) gets [`surrogate_id`]. Only for display; never a join key.
#[must_use]
pub fn display_id(id: &str) -> u64 {
    if !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(numeric) = id.parse::<u64>() {
            return numeric;
        }
    }
    surrogate_id(id)
}

/// Stable numeric surrogate for a non-numeric id.
///
/// SHA-256 of the UTF-8 id, first 8 digest bytes read big-endian, reduced to
/// `1..=SURROGATE_ID_MAX`. Identical across runs, platforms, and
/// implementations that follow the same recipe.
#[must_use]
pub fn surrogate_id(id: &str) -> u64 {
    let digest = Sha256::digest(id.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(prefix) % SURROGATE_ID_MAX + 1
}

/// Joins street and municipality with `", "`, omitting the separator when
/// either side is blank.
#[must_use]
pub fn join_address(street: &str, municipality: &str) -> String {
    let street = street.trim();
    let municipality = municipality.trim();
    match (street.is_empty(), municipality.is_empty()) {
        (false, false) => format!("{street}, {municipality}"),
        (false, true) => street.to_owned(),
        (true, false) => municipality.to_owned(),
        (true, true) => String::new(),
    }
}

fn or_placeholder(value: String, placeholder: &str) -> String {
    if value.is_empty() {
        placeholder.to_owned()
    } else {
        value
    }
}

/// Attaches prices to stations, dropping stations with none.
///
/// Output order follows `stations`.
#[must_use]
pub fn merge_stations(
    stations: Vec<Station>,
    prices: &PriceMap,
) -> (Vec<MergedStation>, MergeStats) {
    let mut stats = MergeStats {
        stations: stations.len(),
        ..MergeStats::default()
    };

    let merged: Vec<MergedStation> = stations
        .into_iter()
        .filter_map(|station| {
            let station_prices = prices.get(&station.id).filter(|p| !p.is_empty())?;
            Some(MergedStation {
                id: display_id(&station.id),
                address: join_address(&station.address, &station.municipality),
                name: or_placeholder(station.name, UNKNOWN_OPERATOR),
                brand: or_placeholder(station.brand, UNKNOWN_BRAND),
                latitude: station.latitude,
                longitude: station.longitude,
                prices: station_prices.clone(),
                source_id: station.id,
            })
        })
        .collect();

    stats.merged = merged.len();
    stats.unpriced = stats.stations - stats.merged;
    tracing::info!(
        merged = stats.merged,
        unpriced = stats.unpriced,
        "merged stations with prices"
    );
    (merged, stats)
}
