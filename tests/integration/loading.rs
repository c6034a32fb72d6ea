//! Dataset loading through files, readers and engine constructors.

use equipval::dataset::{Dataset, DatasetSource};
use equipval::engine::{EngineConfig, ValuationEngine};
use equipval::types::{LoadError, Valuation};

use crate::fixtures::{book, book_path, TempBook};

#[test]
fn test_shipped_book_loads() {
    let engine = ValuationEngine::from_path(book_path()).unwrap();
    assert_eq!(engine.classification_ids(), vec!["67352", "87390"]);
    assert_eq!(
        engine.calculate_values("87390", 2016).unwrap(),
        Valuation { fmv: 30008, flv: 20426 }
    );
}

#[test]
fn test_temp_file_round_trip_through_engine() {
    let file = TempBook::write(&book());
    let engine = ValuationEngine::from_source(
        DatasetSource::Path(file.path().to_path_buf()),
        EngineConfig::default(),
    )
    .unwrap();
    assert_eq!(engine.len(), 2);
    assert_eq!(
        engine.calculate_values("67352", 2016).unwrap(),
        Valuation { fmv: 650865, flv: 231517 }
    );
}

#[test]
fn test_missing_file() {
    let err = ValuationEngine::from_path("nonexistent.json").unwrap_err();
    assert!(matches!(err, LoadError::SourceUnavailable { .. }));
    assert!(err.to_string().contains("nonexistent.json"));
}

#[test]
fn test_one_bad_record_fails_whole_load() {
    let mut value = book();
    value["67352"]["schedule"]["years"]["2012"]["fmv"] = serde_json::json!(null);
    let file = TempBook::write(&value);

    match Dataset::from_path(file.path()) {
        Err(LoadError::DataFormat {
            classification_id,
            year,
            ..
        }) => {
            assert_eq!(classification_id.as_deref(), Some("67352"));
            assert_eq!(year.as_deref(), Some("2012"));
        }
        other => panic!("expected DataFormat, got {other:?}"),
    }
}

#[test]
fn test_reader_source() {
    let file = std::fs::File::open(book_path()).unwrap();
    let dataset = Dataset::from_reader(std::io::BufReader::new(file)).unwrap();
    let record = dataset.get("67352").unwrap();
    assert_eq!(record.retail_sale_count, Some(122));
    assert_eq!(record.auction_sale_count, Some(17));
    assert_eq!(record.years().len(), 15);
}
