use crate::app_config::{AppConfig, DEFAULT_PRICES_URL, DEFAULT_STATIONS_URL};
use crate::types::GeoPoint;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an invalid value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every setting has a default, so only malformed values fail.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        parse_as::<u32>(&or_default(var, default)).map_err(|e| invalid(var, e))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        parse_as::<u64>(&or_default(var, default)).map_err(|e| invalid(var, e))
    };

    let parse_f64_in = |var: &str, default: &str, min: f64, max: f64| -> Result<f64, ConfigError> {
        let value = parse_as::<f64>(&or_default(var, default)).map_err(|e| invalid(var, e))?;
        if !value.is_finite() || value < min || value > max {
            return Err(invalid(
                var,
                format!("{value} is outside the accepted range {min}..={max}"),
            ));
        }
        Ok(value)
    };

    let stations_url = or_default("FUELMAP_STATIONS_URL", DEFAULT_STATIONS_URL);
    let prices_url = or_default("FUELMAP_PRICES_URL", DEFAULT_PRICES_URL);
    let output_dir = PathBuf::from(or_default("FUELMAP_OUTPUT_DIR", "."));
    let log_level = or_default("FUELMAP_LOG_LEVEL", "info");

    let request_timeout_secs = parse_u64("FUELMAP_REQUEST_TIMEOUT_SECS", "60")?;
    if request_timeout_secs == 0 {
        return Err(invalid(
            "FUELMAP_REQUEST_TIMEOUT_SECS",
            "timeout must be at least 1 second".to_string(),
        ));
    }
    let user_agent = or_default("FUELMAP_USER_AGENT", "fuelmap/0.1 (static-data-updater)");
    let max_retries = parse_u32("FUELMAP_MAX_RETRIES", "2")?;
    let retry_backoff_base_ms = parse_u64("FUELMAP_RETRY_BACKOFF_BASE_MS", "1000")?;

    let center_lat = parse_f64_in("FUELMAP_CENTER_LAT", "41.9028", -90.0, 90.0)?;
    let center_lng = parse_f64_in("FUELMAP_CENTER_LNG", "12.4964", -180.0, 180.0)?;
    let max_distance_km = parse_f64_in("FUELMAP_MAX_DISTANCE_KM", "1000", 0.0, f64::MAX)?;
    if max_distance_km <= 0.0 {
        return Err(invalid(
            "FUELMAP_MAX_DISTANCE_KM",
            "distance must be positive".to_string(),
        ));
    }

    Ok(AppConfig {
        stations_url,
        prices_url,
        output_dir,
        log_level,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_ms,
        center: GeoPoint::new(center_lat, center_lng),
        max_distance_km,
    })
}

fn parse_as<T>(raw: &str) -> Result<T, String>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| e.to_string())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
