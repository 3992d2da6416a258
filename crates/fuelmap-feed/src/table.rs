//! Delimited-text loader for the ministry feeds.
//!
//! Both feeds are `;`-separated UTF-8 with a single metadata line (the
//! extraction date) above the real header row. Numeric fields keep their
//! decimal commas here; normalization happens downstream.

use std::path::Path;

use fuelmap_core::Table;

use crate::error::FeedError;

/// Number of raw lines echoed to the debug log when a feed is loaded.
const PREVIEW_LINES: usize = 3;
/// Characters kept from each previewed line.
const PREVIEW_WIDTH: usize = 100;

/// Layout of a delimited feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableFormat {
    pub delimiter: u8,
    /// Lines discarded before the header row.
    pub skip_lines: usize,
}

impl TableFormat {
    /// Layout used by both ministry exports.
    #[must_use]
    pub const fn mimit() -> Self {
        Self {
            delimiter: b';',
            skip_lines: 1,
        }
    }
}

impl Default for TableFormat {
    fn default() -> Self {
        Self::mimit()
    }
}

/// Parses raw feed text into a [`Table`].
///
/// A leading UTF-8 BOM is ignored. Rows that are not valid records, or whose
/// field count differs from the header, are dropped and counted in
/// [`Table::skipped_rows`].
///
/// # Errors
///
/// - [`FeedError::EmptyFeed`] if no header row remains after the skipped lines.
/// - [`FeedError::Csv`] if the header row itself cannot be read.
pub fn parse_table(text: &str, format: &TableFormat, context: &str) -> Result<Table, FeedError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    log_preview(context, text);

    let body = skip_leading_lines(text, format.skip_lines);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(format.delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(body.as_bytes());
    let mut records = reader.records();

    let headers: Vec<String> = match records.next() {
        Some(Ok(record)) => record
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_owned())
            .collect(),
        Some(Err(source)) => {
            return Err(FeedError::Csv {
                context: context.to_owned(),
                source,
            })
        }
        None => {
            return Err(FeedError::EmptyFeed {
                context: context.to_owned(),
            })
        }
    };
    if headers.iter().all(String::is_empty) {
        return Err(FeedError::EmptyFeed {
            context: context.to_owned(),
        });
    }

    let mut unreadable = 0usize;
    let mut raw_records: Vec<Vec<String>> = Vec::new();
    for record in records {
        match record {
            Ok(record) => raw_records.push(record.iter().map(str::to_owned).collect()),
            Err(e) => {
                unreadable += 1;
                tracing::debug!(context, error = %e, "skipping unreadable feed line");
            }
        }
    }

    let mut table = Table::from_records(headers, raw_records);
    table.skipped_rows += unreadable;

    tracing::info!(
        context,
        rows = table.len(),
        skipped = table.skipped_rows,
        columns = ?table.headers,
        "loaded feed"
    );

    Ok(table)
}

/// Reads a feed from a local file and parses it with [`parse_table`].
///
/// # Errors
///
/// Returns [`FeedError::Io`] if the file cannot be read, otherwise any error
/// from [`parse_table`].
pub fn read_table_file(path: &Path, format: &TableFormat) -> Result<Table, FeedError> {
    let text = std::fs::read_to_string(path).map_err(|source| FeedError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_table(&text, format, &path.display().to_string())
}

fn skip_leading_lines(text: &str, count: usize) -> &str {
    let mut rest = text;
    for _ in 0..count {
        match rest.find('\n') {
            Some(idx) => rest = &rest[idx + 1..],
            None => return "",
        }
    }
    rest
}

fn log_preview(context: &str, text: &str) {
    for (idx, line) in text.lines().take(PREVIEW_LINES).enumerate() {
        let shown: String = line.chars().take(PREVIEW_WIDTH).collect();
        tracing::debug!(context, line = idx + 1, "{shown}");
    }
}

#[cfg(test)]
#[path = "table_test.rs"]
mod tests;
