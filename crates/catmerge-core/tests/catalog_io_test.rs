//! Integration tests for catalog files.

use catmerge_core::catalog::{read_catalog_file, write_catalog_file};
use catmerge_core::{Amplitude, Arrival, Catalog, Event, Origin, Pick, Weight};
use chrono::{TimeZone, Utc};
use tempfile::tempdir;

fn sample_catalog() -> Catalog {
    let time = Utc.with_ymd_and_hms(2019, 7, 6, 3, 19, 53).unwrap();
    Catalog::from(vec![
        Event::new("smi:local/event/1")
            .with_origin(Origin::new(time, 35.77, -117.6).with_depth(8000.0))
            .with_pick(
                Pick::new("smi:local/pick/1", "CLC", "P")
                    .with_weight("1")
                    .with_time(time),
            )
            .with_pick(Pick::new("smi:local/pick/2", "CLC", "AML").with_weight(Weight::Numeric(0.5)))
            .with_arrival(Arrival::new("smi:local/arrival/1", "smi:local/pick/1"))
            .with_amplitude(Amplitude::new("smi:local/amp/1", "smi:local/pick/2").with_value(1.4e-5)),
        Event::new("smi:local/event/2"),
    ])
}

#[tokio::test]
async fn test_catalog_file_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("catalog.jsonl");
    let catalog = sample_catalog();

    let write_stats = write_catalog_file(&catalog, &path).await.unwrap();
    assert_eq!(write_stats.written, 2);

    let (loaded, read_stats) = read_catalog_file(&path).await.unwrap();
    assert!(read_stats.is_success());
    assert_eq!(read_stats.loaded, 2);
    assert_eq!(loaded, catalog);
}

#[tokio::test]
async fn test_catalog_file_with_bad_line() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.jsonl");
    let good = serde_json::to_string(&sample_catalog().events()[0]).unwrap();
    tokio::fs::write(&path, format!("{good}\n{{\"resource_id\": 7}}\n{good}\n"))
        .await
        .unwrap();

    let (loaded, stats) = read_catalog_file(&path).await.unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.loaded, 2);
    assert_eq!(stats.errors.len(), 1);
    assert!(stats.errors[0].contains("line 2"), "got: {}", stats.errors[0]);
    assert_eq!(loaded.len(), 2);
}

#[tokio::test]
async fn test_missing_catalog_file_is_io_error() {
    let dir = tempdir().unwrap();
    let err = read_catalog_file(dir.path().join("absent.jsonl"))
        .await
        .unwrap_err();
    assert!(matches!(err, catmerge_core::CatmergeError::Io(_)));
}
