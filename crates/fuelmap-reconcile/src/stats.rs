//! Per-stage diagnostic counters, returned alongside each stage's output.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::RowError;

/// Accepted/rejected row counts for a row-by-row stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowTally {
    pub total: usize,
    pub accepted: usize,
    pub rejected: usize,
    /// Rejections grouped by [`RowError::kind`].
    pub by_reason: BTreeMap<&'static str, usize>,
}

impl RowTally {
    pub(crate) fn accept(&mut self) {
        self.total += 1;
        self.accepted += 1;
    }

    pub(crate) fn reject(&mut self, err: &RowError) {
        self.total += 1;
        self.rejected += 1;
        *self.by_reason.entry(err.kind()).or_default() += 1;
    }

    /// Rejections recorded for one [`RowError::kind`] label.
    #[must_use]
    pub fn rejected_for(&self, kind: &str) -> usize {
        self.by_reason.get(kind).copied().unwrap_or(0)
    }
}

impl fmt::Display for RowTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} accepted, {} rejected of {}",
            self.accepted, self.rejected, self.total
        )?;
        if !self.by_reason.is_empty() {
            let reasons: Vec<String> = self
                .by_reason
                .iter()
                .map(|(kind, count)| format!("{kind}={count}"))
                .collect();
            write!(f, " ({})", reasons.join(", "))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceStats {
    pub rows: RowTally,
    /// Distinct stations with at least one price.
    pub stations_priced: usize,
    /// Accepted rows that repeated an existing (station, fuel) pair.
    pub duplicates: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub stations: usize,
    pub merged: usize,
    /// Stations dropped because the price feed had nothing for them.
    pub unpriced: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterStats {
    pub input: usize,
    pub kept: usize,
    pub dropped: usize,
}

/// Statistics for every stage of one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineReport {
    pub stations: RowTally,
    pub prices: PriceStats,
    pub merge: MergeStats,
    pub filter: FilterStats,
}

impl fmt::Display for PipelineReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "stations: {}", self.stations)?;
        writeln!(
            f,
            "prices:   {}; {} stations priced, {} duplicate rows",
            self.prices.rows, self.prices.stations_priced, self.prices.duplicates
        )?;
        writeln!(
            f,
            "merge:    {} of {} stations priced, {} without prices",
            self.merge.merged, self.merge.stations, self.merge.unpriced
        )?;
        write!(
            f,
            "distance: {} kept, {} dropped",
            self.filter.kept, self.filter.dropped
        )
    }
}
