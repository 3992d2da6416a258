//! Decimal-comma number parsing for feed cells.

use crate::error::RowError;

/// Parses a feed number that may use a decimal comma (`"45,4642"`).
///
/// Blank values and the literal `nan` (the export's marker for a missing
/// cell) count as missing. Infinite and NaN results are malformed.
///
/// # Errors
///
/// [`RowError::MissingField`] or [`RowError::MalformedNumber`], tagged with
/// `field`.
pub fn parse_decimal(field: &'static str, raw: &str) -> Result<f64, RowError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "nan" {
        return Err(RowError::MissingField { field });
    }

    let malformed = || RowError::MalformedNumber {
        field,
        value: trimmed.to_owned(),
    };

    let value: f64 = trimmed.replace(',', ".").parse().map_err(|_| malformed())?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(malformed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comma_and_point_parse_identically() {
        let comma = parse_decimal("Latitudine", "45,4642").unwrap();
        let point = parse_decimal("Latitudine", "45.4642").unwrap();
        assert_eq!(comma.to_bits(), point.to_bits());
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert!((parse_decimal("prezzo", " 1,5 ").unwrap() - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn negative_values_parse() {
        assert!((parse_decimal("prezzo", "-0,5").unwrap() + 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn blank_and_nan_are_missing() {
        for raw in ["", "   ", "nan"] {
            assert_eq!(
                parse_decimal("prezzo", raw),
                Err(RowError::MissingField { field: "prezzo" }),
                "input {raw:?}"
            );
        }
    }

    #[test]
    fn garbage_is_malformed() {
        assert_eq!(
            parse_decimal("prezzo", "n/d"),
            Err(RowError::MalformedNumber {
                field: "prezzo",
                value: "n/d".to_owned(),
            })
        );
        assert!(matches!(
            parse_decimal("prezzo", "1,234,5"),
            Err(RowError::MalformedNumber { .. })
        ));
    }

    #[test]
    fn non_finite_values_are_malformed() {
        for raw in ["inf", "-infinity", "NaN"] {
            assert!(
                matches!(
                    parse_decimal("Longitudine", raw),
                    Err(RowError::MalformedNumber { .. })
                ),
                "input {raw:?}"
            );
        }
    }
}
