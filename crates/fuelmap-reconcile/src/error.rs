use thiserror::Error;

/// Why a single feed row was skipped. Never aborts a stage.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RowError {
    #[error("missing value for {field}")]
    MissingField { field: &'static str },

    #[error("malformed number {value:?} in {field}")]
    MalformedNumber { field: &'static str, value: String },

    #[error("coordinates ({lat}, {lng}) are outside the accepted area")]
    OutOfBounds { lat: f64, lng: f64 },

    #[error("price {price} is not positive")]
    NonPositivePrice { price: f64 },

    #[error("unrecognized fuel description {0:?}")]
    UnmappedFuel(String),
}

impl RowError {
    /// Short stable label used to group rejections in stage statistics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            RowError::MissingField { .. } => "missing_field",
            RowError::MalformedNumber { .. } => "malformed_number",
            RowError::OutOfBounds { .. } => "out_of_bounds",
            RowError::NonPositivePrice { .. } => "non_positive_price",
            RowError::UnmappedFuel(_) => "unmapped_fuel",
        }
    }
}

/// The price feed's headers could not be mapped onto the id, fuel
/// description, and price roles.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("could not infer the {} column(s) from headers {headers:?}", missing.join(", "))]
pub struct SchemaError {
    /// Roles with no matching header, in role order.
    pub missing: Vec<&'static str>,
    pub headers: Vec<String>,
}

/// A stage produced nothing, so no export may be written.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    #[error("no valid stations in the registry feed ({rejected} of {total} rows rejected)")]
    NoStations { total: usize, rejected: usize },

    #[error("no valid prices in the price feed")]
    NoPrices {
        #[source]
        schema: Option<SchemaError>,
    },

    #[error("none of the {stations} valid stations has a price")]
    NoMergedStations { stations: usize },

    #[error("no priced stations within {max_distance_km} km of the reference point")]
    NoStationsInRange { max_distance_km: f64 },
}
