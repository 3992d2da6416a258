//! Free-text fuel description → [`FuelType`].

use fuelmap_core::FuelType;

/// Classification rules, evaluated in order. The first substring found in
/// the lowercased description decides the category.
pub const FUEL_RULES: &[(&str, FuelType)] = &[
    ("benzina", FuelType::Benzina),
    ("gasolio", FuelType::Gasolio),
    ("diesel", FuelType::Gasolio),
    ("gpl", FuelType::Gpl),
    ("metano", FuelType::Metano),
];

/// Maps a price-feed fuel description onto its canonical category.
///
/// Returns `None` for anything outside the four tracked categories
/// (e.g. `"Blue Super"`, `"L-GNC"`).
#[must_use]
pub fn classify_fuel(description: &str) -> Option<FuelType> {
    let lower = description.to_lowercase();
    FUEL_RULES
        .iter()
        .find(|(needle, _)| lower.contains(needle))
        .map(|&(_, fuel)| fuel)
}
