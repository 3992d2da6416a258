use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

/// One data row of a feed, keyed by the column label exactly as it appeared
/// in the header.
pub type RawRow = HashMap<String, String>;

/// Best observed price per canonical fuel type for a single station.
///
/// A `BTreeMap` so serialized output has a stable key order.
pub type FuelPrices = BTreeMap<FuelType, f64>;

/// Station id (as it appears in the feeds) to that station's best prices.
pub type PriceMap = HashMap<String, FuelPrices>;

/// A parsed delimited feed: the header row in column order plus every data
/// row whose field count matched the header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
    /// Data rows dropped because their field count did not match the header.
    pub skipped_rows: usize,
}

impl Table {
    /// Builds a table from a header and positional records.
    ///
    /// Records with a different number of fields than the header are not
    /// kept; they are counted in [`Table::skipped_rows`] instead.
    #[must_use]
    pub fn from_records<I, R>(headers: Vec<String>, records: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = String>,
    {
        let mut rows = Vec::new();
        let mut skipped_rows = 0usize;

        for record in records {
            let fields: Vec<String> = record.into_iter().collect();
            if fields.len() != headers.len() {
                skipped_rows += 1;
                continue;
            }
            rows.push(headers.iter().cloned().zip(fields).collect());
        }

        Self {
            headers,
            rows,
            skipped_rows,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Canonical fuel categories that free-text price descriptions collapse onto.
///
/// Variant order is the classification priority order and also the key order
/// of [`FuelPrices`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum FuelType {
    Benzina,
    Gasolio,
    #[serde(rename = "GPL")]
    Gpl,
    Metano,
}

impl FuelType {
    pub const ALL: [FuelType; 4] = [
        FuelType::Benzina,
        FuelType::Gasolio,
        FuelType::Gpl,
        FuelType::Metano,
    ];

    /// Display label, identical to the serialized form.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FuelType::Benzina => "Benzina",
            FuelType::Gasolio => "Gasolio",
            FuelType::Gpl => "GPL",
            FuelType::Metano => "Metano",
        }
    }
}

impl std::fmt::Display for FuelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A station from the registry feed whose coordinates passed validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Station {
    /// Registry id (`idImpianto`), the join key against the price feed.
    pub id: String,
    /// Operator name (`Gestore`).
    pub name: String,
    /// Brand flag (`Bandiera`).
    pub brand: String,
    /// Street address (`Indirizzo`).
    pub address: String,
    pub municipality: String,
    pub province: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Station {
    #[must_use]
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// A station joined with its prices, shaped for the exported web data.
///
/// Field order matches the exported JSON object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedStation {
    /// Display id: the registry id when numeric, otherwise a hashed surrogate.
    pub id: u64,
    pub name: String,
    pub brand: String,
    /// `"<street>, <municipality>"`, without a dangling separator.
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Always non-empty.
    pub prices: FuelPrices,
    /// Registry id the record was built from. Not exported.
    #[serde(skip)]
    pub source_id: String,
}

impl MergedStation {
    #[must_use]
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_owned()).collect()
    }

    #[test]
    fn table_from_records_keys_rows_by_header() {
        let table = Table::from_records(
            strings(&["idImpianto", "Gestore"]),
            vec![strings(&["1", "ACME"])],
        );
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0].get("Gestore").map(String::as_str), Some("ACME"));
        assert_eq!(table.skipped_rows, 0);
    }

    #[test]
    fn table_from_records_skips_ragged_rows() {
        let table = Table::from_records(
            strings(&["a", "b"]),
            vec![strings(&["1", "2"]), strings(&["1"]), strings(&["1", "2", "3"])],
        );
        assert_eq!(table.len(), 1);
        assert_eq!(table.skipped_rows, 2);
    }

    #[test]
    fn fuel_type_serializes_with_feed_labels() {
        let json = serde_json::to_string(&FuelType::ALL).unwrap();
        assert_eq!(json, r#"["Benzina","Gasolio","GPL","Metano"]"#);
    }

    #[test]
    fn fuel_prices_serialize_as_object_in_fixed_order() {
        let mut prices = FuelPrices::new();
        prices.insert(FuelType::Metano, 1.25);
        prices.insert(FuelType::Benzina, 1.65);
        let json = serde_json::to_string(&prices).unwrap();
        assert_eq!(json, r#"{"Benzina":1.65,"Metano":1.25}"#);
    }

    #[test]
    fn merged_station_does_not_export_source_id() {
        let mut prices = FuelPrices::new();
        prices.insert(FuelType::Gasolio, 1.55);
        let station = MergedStation {
            id: 42,
            name: "Stazione".to_owned(),
            brand: "Eni".to_owned(),
            address: "Via Roma 1, Milano".to_owned(),
            latitude: 45.46,
            longitude: 9.19,
            prices,
            source_id: "42".to_owned(),
        };
        let value = serde_json::to_value(&station).unwrap();
        assert!(value.get("source_id").is_none());
        assert_eq!(value["prices"]["Gasolio"], 1.55);
    }
}
