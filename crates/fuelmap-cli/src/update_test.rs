use fuelmap_core::GeoPoint;
use fuelmap_reconcile::PipelineError;

use super::*;

const STATIONS_CSV: &str = "\
Estrazione del 2026-10-18
idImpianto;Gestore;Bandiera;Tipo Impianto;Nome Impianto;Indirizzo;Comune;Provincia;Latitudine;Longitudine
1001;ROSSI CARBURANTI SRL;Agip Eni;Stradale;ROSSI;VIA APPIA NUOVA 100;ROMA;RM;41,8700;12,5200
1002;BIANCHI SNC;Q8;Stradale;BIANCHI;VIA EMILIA 12;PARMA;PR;44,8015;10,3279
";

const PRICES_CSV: &str = "\
Estrazione del 2026-10-18
idImpianto;descCarburante;prezzo;isSelf;dtComu
1001;Benzina;1,809;1;18/10/2026 07:12:00
1001;Benzina;1,759;0;18/10/2026 07:12:00
";

struct Fixture {
    dir: tempfile::TempDir,
    stations: PathBuf,
    prices: PathBuf,
}

impl Fixture {
    fn new(with_page: bool, prices_csv: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        if with_page {
            std::fs::write(dir.path().join(PAGE_MARKER), "<html></html>").unwrap();
        }
        let stations = dir.path().join("stations.csv");
        let prices = dir.path().join("prices.csv");
        std::fs::write(&stations, STATIONS_CSV).unwrap();
        std::fs::write(&prices, prices_csv).unwrap();
        Self {
            dir,
            stations,
            prices,
        }
    }

    fn options(&self) -> UpdateOptions {
        UpdateOptions {
            output_dir: Some(self.dir.path().to_path_buf()),
            stations_file: Some(self.stations.clone()),
            prices_file: Some(self.prices.clone()),
            ..UpdateOptions::default()
        }
    }

    fn data_js(&self) -> PathBuf {
        self.dir.path().join(DATA_FILE_NAME)
    }
}

fn config() -> AppConfig {
    AppConfig {
        stations_url: "http://127.0.0.1:9/stations.csv".to_owned(),
        prices_url: "http://127.0.0.1:9/prices.csv".to_owned(),
        output_dir: PathBuf::from("."),
        log_level: "info".to_owned(),
        request_timeout_secs: 5,
        user_agent: "fuelmap-test".to_owned(),
        max_retries: 0,
        retry_backoff_base_ms: 1,
        center: GeoPoint::new(41.9028, 12.4964),
        max_distance_km: 1000.0,
    }
}

#[tokio::test]
async fn writes_data_js_from_local_feeds() {
    let fixture = Fixture::new(true, PRICES_CSV);
    let outcome = run_update(&config(), &fixture.options()).await.unwrap();

    assert_eq!(outcome.stations, 1);
    assert_eq!(outcome.written.as_deref(), Some(fixture.data_js().as_path()));
    assert_eq!(outcome.report.merge.unpriced, 1);

    let script = std::fs::read_to_string(fixture.data_js()).unwrap();
    assert!(script.contains("// Total stations: 1"));
    assert!(script.contains("\"Benzina\": 1.759"));
}

#[tokio::test]
async fn dry_run_leaves_output_directory_untouched() {
    let fixture = Fixture::new(true, PRICES_CSV);
    let options = UpdateOptions {
        dry_run: true,
        ..fixture.options()
    };
    let outcome = run_update(&config(), &options).await.unwrap();

    assert_eq!(outcome.stations, 1);
    assert!(outcome.written.is_none());
    assert!(!fixture.data_js().exists());
}

#[tokio::test]
async fn refuses_directory_without_index_html() {
    let fixture = Fixture::new(false, PRICES_CSV);
    let err = run_update(&config(), &fixture.options())
        .await
        .unwrap_err();

    assert!(err.to_string().contains(PAGE_MARKER), "{err}");
    assert!(!fixture.data_js().exists());
}

#[tokio::test]
async fn page_check_can_be_skipped() {
    let fixture = Fixture::new(false, PRICES_CSV);
    let options = UpdateOptions {
        skip_page_check: true,
        ..fixture.options()
    };
    run_update(&config(), &options).await.unwrap();
    assert!(fixture.data_js().exists());
}

#[tokio::test]
async fn failed_pipeline_keeps_previous_export() {
    let foreign = "Estrazione del 2026-10-18\nimpianto;tipo;valore\n1001;Benzina;1,8\n";
    let fixture = Fixture::new(true, foreign);
    std::fs::write(fixture.data_js(), "previous").unwrap();

    let err = run_update(&config(), &fixture.options())
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<PipelineError>(),
        Some(PipelineError::NoPrices { schema: Some(_) })
    ));
    assert_eq!(std::fs::read_to_string(fixture.data_js()).unwrap(), "previous");
}

#[tokio::test]
async fn distance_override_applies_to_the_run() {
    let fixture = Fixture::new(true, PRICES_CSV);
    let options = UpdateOptions {
        max_distance_km: Some(1.0),
        ..fixture.options()
    };
    let err = run_update(&config(), &options).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<PipelineError>(),
        Some(PipelineError::NoStationsInRange { .. })
    ));
}

#[tokio::test]
async fn invalid_distance_override_is_rejected() {
    let fixture = Fixture::new(true, PRICES_CSV);
    let options = UpdateOptions {
        max_distance_km: Some(-5.0),
        ..fixture.options()
    };
    let err = run_update(&config(), &options).await.unwrap_err();
    assert!(err.to_string().contains("--max-distance-km"), "{err}");
}

#[tokio::test]
async fn missing_feed_file_is_reported() {
    let fixture = Fixture::new(true, PRICES_CSV);
    let options = UpdateOptions {
        prices_file: Some(fixture.dir.path().join("absent.csv")),
        ..fixture.options()
    };
    let err = run_update(&config(), &options).await.unwrap_err();
    assert!(err.to_string().contains("prices feed"), "{err}");
}
