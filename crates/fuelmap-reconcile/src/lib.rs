//! Reconciliation of the registry and price feeds into exportable stations.

pub mod columns;
pub mod error;
pub mod fuel;
pub mod geo;
pub mod merge;
pub mod numeric;
pub mod pipeline;
pub mod prices;
pub mod stations;
pub mod stats;

pub use columns::{find_column, infer_price_columns, PriceColumns};
pub use error::{PipelineError, RowError, SchemaError};
pub use fuel::classify_fuel;
pub use geo::{filter_within, haversine_km, BoundingBox, Located};
pub use merge::{display_id, join_address, merge_stations};
pub use numeric::parse_decimal;
pub use pipeline::{run_pipeline, PipelineConfig, PipelineOutput};
pub use prices::{aggregate_prices, PriceAggregate};
pub use stations::{normalize_station_row, normalize_stations};
pub use stats::{FilterStats, MergeStats, PipelineReport, PriceStats, RowTally};
