//! Rendering and writing of the `data.js` script consumed by the web app.

use std::fmt::Write as _;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use chrono::NaiveDateTime;
use fuelmap_core::MergedStation;

pub(crate) const DATA_FILE_NAME: &str = "data.js";

/// Format of every timestamp embedded in the script.
pub(crate) const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Shown by the web app when the real data list is empty.
const SAMPLE_STATIONS_JS: &str = r#"[
    {
        id: 1,
        name: "Stazione Eni",
        brand: "Eni",
        address: "Via Roma 123, Milano",
        latitude: 45.4642,
        longitude: 9.1900,
        prices: {
            "Benzina": 1.65,
            "Gasolio": 1.55,
            "GPL": 0.75,
            "Metano": 1.25
        }
    }
]"#;

const ACCESSORS_JS: &str = "\
// Get current timestamp for data freshness
function getCurrentTimestamp() {
    const now = new Date();
    return now.toLocaleDateString('it-IT') + ' ' + now.toLocaleTimeString('it-IT', {
        hour: '2-digit',
        minute: '2-digit'
    });
}
";

const EXPORT_GUARD_JS: &str = "\
// Export for use in app.js
if (typeof module !== 'undefined' && module.exports) {
    module.exports = { fuelStationsData, getCurrentTimestamp, updateDataTimestamp };
}
";

/// Everything that goes into one `data.js`.
#[derive(Debug, Clone)]
pub(crate) struct ExportDocument {
    /// Already formatted with [`TIMESTAMP_FORMAT`].
    pub generated_at: String,
    pub total: usize,
    pub stations: Vec<MergedStation>,
}

impl ExportDocument {
    pub(crate) fn new(stations: Vec<MergedStation>, generated_at: NaiveDateTime) -> Self {
        Self {
            generated_at: generated_at.format(TIMESTAMP_FORMAT).to_string(),
            total: stations.len(),
            stations,
        }
    }
}

/// Renders the full script text.
///
/// # Errors
///
/// Returns an error if the station list cannot be serialized to JSON.
pub(crate) fn render_data_js(doc: &ExportDocument) -> anyhow::Result<String> {
    let stations_json =
        serde_json::to_string_pretty(&doc.stations).context("failed to serialize stations")?;
    let ts = &doc.generated_at;

    let mut out = String::with_capacity(stations_json.len() + 2048);
    writeln!(out, "// Real fuel station data from MIMIT")?;
    writeln!(out, "// Last updated: {ts}")?;
    writeln!(out, "// Total stations: {}", doc.total)?;
    writeln!(out)?;
    writeln!(out, "const DATA_TIMESTAMP = \"{ts}\";")?;
    writeln!(out)?;
    writeln!(out, "const realFuelStations = {stations_json};")?;
    writeln!(out)?;
    writeln!(out, "// Sample data for demo (kept for fallback)")?;
    writeln!(out, "const sampleFuelStations = {SAMPLE_STATIONS_JS};")?;
    writeln!(out)?;
    writeln!(out, "// Use real data if available, fallback to sample")?;
    writeln!(
        out,
        "const fuelStationsData = realFuelStations.length > 0 ? realFuelStations : sampleFuelStations;"
    )?;
    writeln!(out)?;
    writeln!(out, "{ACCESSORS_JS}")?;
    writeln!(out, "// Return data update timestamp")?;
    writeln!(out, "function updateDataTimestamp() {{")?;
    writeln!(out, "    return \"Dati aggiornati: {ts}\";")?;
    writeln!(out, "}}")?;
    writeln!(out)?;
    out.push_str(EXPORT_GUARD_JS);
    Ok(out)
}

/// Atomically replaces `<dir>/data.js` with `contents`.
///
/// The text goes to a temporary file in `dir` first and is renamed into
/// place, so readers never observe a half-written script. The replaced
/// file's permissions carry over; a new file is created world-readable
/// (`0644` on Unix).
///
/// # Errors
///
/// Returns an error if the temporary file cannot be created, written, or
/// persisted.
pub(crate) fn write_data_js(dir: &Path, contents: &str) -> anyhow::Result<PathBuf> {
    let target = dir.join(DATA_FILE_NAME);
    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to create temporary file in {}", dir.display()))?;
    tmp.write_all(contents.as_bytes())
        .context("failed to write data.js contents")?;
    tmp.flush().context("failed to flush data.js contents")?;

    let permissions = match std::fs::metadata(&target) {
        Ok(meta) => Some(meta.permissions()),
        #[cfg(unix)]
        Err(_) => Some(std::os::unix::fs::PermissionsExt::from_mode(0o644)),
        #[cfg(not(unix))]
        Err(_) => None,
    };
    if let Some(permissions) = permissions {
        tmp.as_file()
            .set_permissions(permissions)
            .context("failed to set data.js permissions")?;
    }

    tmp.persist(&target)
        .with_context(|| format!("failed to move data.js into {}", target.display()))?;
    tracing::info!(path = %target.display(), bytes = contents.len(), "wrote export");
    Ok(target)
}

#[cfg(test)]
#[path = "export_test.rs"]
mod tests;
