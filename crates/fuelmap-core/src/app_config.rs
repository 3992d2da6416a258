use std::path::PathBuf;

use crate::types::GeoPoint;

pub const DEFAULT_STATIONS_URL: &str =
    "https://www.mise.gov.it/images/exportCSV/anagrafica_impianti_attivi.csv";
pub const DEFAULT_PRICES_URL: &str = "https://www.mise.gov.it/images/exportCSV/prezzo_alle_8.csv";

/// Rome, used as the national centroid for the distance filter.
pub const DEFAULT_CENTER: GeoPoint = GeoPoint::new(41.9028, 12.4964);
pub const DEFAULT_MAX_DISTANCE_KM: f64 = 1000.0;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub stations_url: String,
    pub prices_url: String,
    /// Directory of the static web app; `data.js` is written here.
    pub output_dir: PathBuf,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    /// Reference point for the distance filter.
    pub center: GeoPoint,
    pub max_distance_km: f64,
}
