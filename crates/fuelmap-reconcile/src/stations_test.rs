use super::*;

fn row(pairs: &[(&str, &str)]) -> RawRow {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect()
}

fn station_row(id: &str, lat: &str, lng: &str) -> RawRow {
    row(&[
        ("idImpianto", id),
        ("Gestore", " ROSSI CARBURANTI SRL "),
        ("Bandiera", "Agip Eni"),
        ("Tipo Impianto", "Stradale"),
        ("Indirizzo", "VIA EMILIA 12 "),
        ("Comune", "PARMA"),
        ("Provincia", "PR"),
        ("Latitudine", lat),
        ("Longitudine", lng),
    ])
}

fn normalize(lat: &str, lng: &str) -> Result<Station, RowError> {
    normalize_station_row(&station_row("1001", lat, lng), &BoundingBox::ITALY)
}

// -----------------------------------------------------------------------
// normalize_station_row
// -----------------------------------------------------------------------

#[test]
fn accepts_decimal_comma_coordinates() {
    let station = normalize("44,8015", "10,3279").unwrap();
    assert!((station.latitude - 44.8015).abs() < 1e-12);
    assert!((station.longitude - 10.3279).abs() < 1e-12);
}

#[test]
fn comma_and_point_coordinates_are_identical() {
    let comma = normalize("45,4642", "9,19").unwrap();
    let point = normalize("45.4642", "9.19").unwrap();
    assert_eq!(comma, point);
}

#[test]
fn trims_every_string_field() {
    let station = normalize("44.8", "10.3").unwrap();
    assert_eq!(station.id, "1001");
    assert_eq!(station.name, "ROSSI CARBURANTI SRL");
    assert_eq!(station.address, "VIA EMILIA 12");
    assert_eq!(station.municipality, "PARMA");
    assert_eq!(station.province, "PR");
    assert_eq!(station.brand, "Agip Eni");
}

#[test]
fn finds_case_variant_column_names() {
    let raw = row(&[
        ("IDIMPIANTO", "77"),
        ("gestore", "Bianchi"),
        ("LATITUDINE", "41,9"),
        ("longitudine", "12,5"),
    ]);
    let station = normalize_station_row(&raw, &BoundingBox::ITALY).unwrap();
    assert_eq!(station.id, "77");
    assert_eq!(station.name, "Bianchi");
    assert_eq!(station.brand, "");
}

#[test]
fn retains_points_exactly_on_the_bounding_box() {
    for (lat, lng) in [("35.0", "12"), ("47.0", "12"), ("40", "6.0"), ("40", "19.0")] {
        assert!(normalize(lat, lng).is_ok(), "({lat}, {lng}) should be kept");
    }
    assert!(normalize("35,0", "6,0").is_ok());
    assert!(normalize("47,0", "19,0").is_ok());
}

#[test]
fn drops_points_just_outside_the_bounding_box() {
    for (lat, lng) in [
        ("34.9999", "12"),
        ("47.0001", "12"),
        ("40", "5.9999"),
        ("40", "19.0001"),
        ("0", "0"),
    ] {
        assert!(
            matches!(normalize(lat, lng), Err(RowError::OutOfBounds { .. })),
            "({lat}, {lng}) should be dropped"
        );
    }
}

#[test]
fn swapped_coordinates_are_out_of_bounds() {
    // Registry rows occasionally swap the two columns.
    assert!(matches!(
        normalize("9,19", "45,46"),
        Err(RowError::OutOfBounds { .. })
    ));
}

#[test]
fn blank_or_nan_coordinates_are_missing() {
    assert_eq!(
        normalize("", "9.19"),
        Err(RowError::MissingField {
            field: "Latitudine"
        })
    );
    assert_eq!(
        normalize("45.46", "nan"),
        Err(RowError::MissingField {
            field: "Longitudine"
        })
    );
}

#[test]
fn unparseable_coordinates_are_malformed() {
    assert!(matches!(
        normalize("45°27'", "9.19"),
        Err(RowError::MalformedNumber {
            field: "Latitudine",
            ..
        })
    ));
}

#[test]
fn missing_coordinate_columns_are_missing() {
    let raw = row(&[("idImpianto", "5")]);
    assert!(matches!(
        normalize_station_row(&raw, &BoundingBox::ITALY),
        Err(RowError::MissingField { .. })
    ));
}

#[test]
fn blank_id_is_rejected() {
    let raw = station_row("   ", "44.8", "10.3");
    assert_eq!(
        normalize_station_row(&raw, &BoundingBox::ITALY),
        Err(RowError::MissingField {
            field: "idImpianto"
        })
    );
}

// -----------------------------------------------------------------------
// normalize_stations
// -----------------------------------------------------------------------

#[test]
fn normalize_stations_keeps_valid_rows_in_order_and_tallies_the_rest() {
    let rows = vec![
        station_row("1", "45,46", "9,19"),
        station_row("2", "52,52", "13,40"),
        station_row("3", "", "9,19"),
        station_row("4", "38,11", "13,36"),
        station_row("5", "abc", "13,36"),
    ];
    let (stations, tally) = normalize_stations(&rows, &BoundingBox::ITALY);

    let ids: Vec<&str> = stations.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "4"]);
    assert_eq!(tally.total, 5);
    assert_eq!(tally.accepted, 2);
    assert_eq!(tally.rejected, 3);
    assert_eq!(tally.rejected_for("out_of_bounds"), 1);
    assert_eq!(tally.rejected_for("missing_field"), 1);
    assert_eq!(tally.rejected_for("malformed_number"), 1);
}

#[test]
fn normalize_stations_on_empty_input() {
    let (stations, tally) = normalize_stations(&[], &BoundingBox::ITALY);
    assert!(stations.is_empty());
    assert_eq!(tally, RowTally::default());
}
