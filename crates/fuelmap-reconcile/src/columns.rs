//! Header inference for the price feed.
//!
//! The price export has renamed its columns across versions, so roles are
//! resolved by case-insensitive substring rules instead of fixed names.

use crate::error::SchemaError;

/// Substrings identifying the station id column, in priority order.
pub const ID_RULES: &[&str] = &["idimpianto", "id"];
/// Substrings identifying the free-text fuel description column.
pub const FUEL_RULES: &[&str] = &["carburante", "desc"];
/// Substrings identifying the price column.
pub const PRICE_RULES: &[&str] = &["prezzo", "price"];

/// Columns of the price feed selected for each role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceColumns {
    pub id: String,
    pub fuel: String,
    pub price: String,
}

/// Returns the first header matching the highest-priority rule.
///
/// Rules are tried in order; within a rule, headers are scanned in column
/// order and compared case-insensitively by substring.
#[must_use]
pub fn find_column<'a, S: AsRef<str>>(headers: &'a [S], rules: &[&str]) -> Option<&'a str> {
    rules.iter().find_map(|rule| {
        let rule = rule.to_lowercase();
        headers
            .iter()
            .map(AsRef::as_ref)
            .find(|header| header.to_lowercase().contains(&rule))
    })
}

/// Resolves the id, fuel-description, and price columns of a price feed.
///
/// # Errors
///
/// Returns [`SchemaError`] naming every role that no header matched.
pub fn infer_price_columns<S: AsRef<str>>(headers: &[S]) -> Result<PriceColumns, SchemaError> {
    let id = find_column(headers, ID_RULES);
    let fuel = find_column(headers, FUEL_RULES);
    let price = find_column(headers, PRICE_RULES);

    match (id, fuel, price) {
        (Some(id), Some(fuel), Some(price)) => Ok(PriceColumns {
            id: id.to_owned(),
            fuel: fuel.to_owned(),
            price: price.to_owned(),
        }),
        _ => {
            let missing = [("id", id), ("fuel description", fuel), ("price", price)]
                .into_iter()
                .filter(|(_, found)| found.is_none())
                .map(|(role, _)| role)
                .collect();
            Err(SchemaError {
                missing,
                headers: headers.iter().map(|h| h.as_ref().to_owned()).collect(),
            })
        }
    }
}
