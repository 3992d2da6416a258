//! Great-circle distance and area checks.

use fuelmap_core::{GeoPoint, MergedStation, Station};

use crate::stats::FilterStats;

/// Mean Earth radius used by [`haversine_km`].
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Inclusive latitude/longitude rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    /// Mainland Italy plus islands, generously rounded.
    pub const ITALY: BoundingBox = BoundingBox {
        min_lat: 35.0,
        max_lat: 47.0,
        min_lng: 6.0,
        max_lng: 19.0,
    };

    #[must_use]
    pub fn contains(&self, point: GeoPoint) -> bool {
        (self.min_lat..=self.max_lat).contains(&point.lat)
            && (self.min_lng..=self.max_lng).contains(&point.lng)
    }
}

/// Anything with a position that the distance filter can measure.
pub trait Located {
    fn location(&self) -> GeoPoint;
}

impl Located for GeoPoint {
    fn location(&self) -> GeoPoint {
        *self
    }
}

impl Located for Station {
    fn location(&self) -> GeoPoint {
        self.position()
    }
}

impl Located for MergedStation {
    fn location(&self) -> GeoPoint {
        self.position()
    }
}

/// Haversine distance in kilometres between two points given in degrees.
///
/// Symmetric in its arguments: the latitude/longitude deltas only enter
/// squared and the cosine product commutes.
#[must_use]
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let dlat = (b.lat - a.lat).to_radians();
    let dlng = (b.lng - a.lng).to_radians();

    let h = (dlat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (dlng / 2.0).sin().powi(2);
    // Rounding can push h a hair past 1 for antipodal points.
    let h = h.clamp(0.0, 1.0);

    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// Keeps the records within `max_distance_km` of `center` (inclusive),
/// preserving their order.
pub fn filter_within<T: Located>(
    records: Vec<T>,
    center: GeoPoint,
    max_distance_km: f64,
) -> (Vec<T>, FilterStats) {
    let input = records.len();
    let kept: Vec<T> = records
        .into_iter()
        .filter(|record| {
            let distance = haversine_km(center, record.location());
            let keep = distance <= max_distance_km;
            if !keep {
                tracing::trace!(distance_km = distance, "outside distance threshold");
            }
            keep
        })
        .collect();

    let stats = FilterStats {
        input,
        kept: kept.len(),
        dropped: input - kept.len(),
    };
    tracing::info!(
        max_distance_km,
        kept = stats.kept,
        dropped = stats.dropped,
        "applied distance filter"
    );
    (kept, stats)
}
