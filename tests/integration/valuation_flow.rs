//! Reference scenarios and query properties against the shipped book.

use std::sync::Arc;

use equipval::engine::{ValuationEngine, MAX_MODEL_YEAR, MIN_MODEL_YEAR};
use equipval::types::{ClassificationId, Valuation, ValuationError};

use crate::fixtures::engine;

/// (year, fmv, flv) for classification 87390, bookCost 48929.
const BOOM_LIFT_87390: &[(i32, i64, i64)] = &[
    (2006, 8320, 4907),
    (2007, 8851, 5220),
    (2008, 9416, 5553),
    (2009, 10017, 5907),
    (2010, 11483, 6085),
    (2011, 12299, 6789),
    (2012, 16794, 9201),
    (2013, 17298, 10203),
    (2014, 21952, 11599),
    (2015, 23220, 15569),
    (2016, 30008, 20426),
    (2017, 33906, 23153),
    (2018, 47974, 33516),
    (2019, 50961, 35603),
    (2020, 54133, 37819),
];

/// (year, fmv, flv) for classification 67352, bookCost 681252.
const DOZER_67352: &[(i32, i64, i64)] = &[
    (2006, 212057, 123568),
    (2007, 216385, 126090),
    (2008, 220801, 128663),
    (2009, 225307, 131288),
    (2010, 247416, 135227),
    (2011, 254839, 140567),
    (2012, 293838, 145228),
    (2013, 424583, 150042),
    (2014, 489559, 155017),
    (2015, 504246, 159668),
    (2016, 650865, 231517),
    (2017, 670391, 241085),
    (2018, 829672, 319139),
    (2019, 897483, 345223),
    (2020, 970838, 373439),
];

#[test]
fn test_example_87390_2016() {
    let v = engine().calculate_values("87390", 2016).unwrap();
    assert_eq!(v, Valuation { fmv: 30008, flv: 20426 });
}

#[test]
fn test_example_67352_2016() {
    let v = engine().calculate_values("67352", 2016).unwrap();
    assert_eq!(v, Valuation { fmv: 650865, flv: 231517 });
}

#[test]
fn test_every_year_matches_reference_table() {
    let engine = engine();
    for (id, table) in [("87390", BOOM_LIFT_87390), ("67352", DOZER_67352)] {
        for &(year, fmv, flv) in table {
            assert_eq!(
                engine.calculate_values(id, year).unwrap(),
                Valuation { fmv, flv },
                "classification {id}, year {year}"
            );
        }
    }
}

#[test]
fn test_boundary_years_succeed() {
    let engine = engine();
    for year in [MIN_MODEL_YEAR, MAX_MODEL_YEAR] {
        let v = engine.calculate_values("87390", year).unwrap();
        assert!(v.fmv > 0 && v.flv > 0);
    }
}

#[test]
fn test_out_of_range_years_fail_regardless_of_id() {
    let engine = engine();
    for id in ["87390", "67352", "99999"] {
        for year in [i32::MIN, 0, 1999, 2005, 2021, 2030, i32::MAX] {
            assert_eq!(
                engine.calculate_values(id, year),
                Err(ValuationError::YearOutOfRange {
                    year,
                    min: 2006,
                    max: 2020
                }),
                "classification {id}, year {year}"
            );
        }
    }
}

#[test]
fn test_year_2021_message() {
    let err = engine().calculate_values("87390", 2021).unwrap_err();
    assert_eq!(err.to_string(), "Model year must be between 2006 and 2020, got 2021");
}

#[test]
fn test_unknown_id_fails_for_every_valid_year() {
    let engine = engine();
    for year in MIN_MODEL_YEAR..=MAX_MODEL_YEAR {
        let err = engine.calculate_values("99999", year).unwrap_err();
        assert_eq!(err, ValuationError::UnknownClassificationId("99999".into()));
        assert!(err.to_string().contains("Classification ID '99999' not found"));
    }
}

#[test]
fn test_numeric_id_matches_string_id() {
    let engine = engine();
    assert_eq!(
        engine.calculate_values(ClassificationId::from(87390u32), 2016),
        engine.calculate_values("87390", 2016)
    );
}

#[test]
fn test_equipment_info() {
    let engine = engine();
    let info = engine.equipment_info("87390").unwrap();
    assert_eq!(info.category, "Aerial Equipment");
    assert_eq!(info.subcategory, "Boom Lifts");
    assert_eq!(info.make, "JLG");
    assert_eq!(info.model, "340AJ");

    let info = engine.equipment_info("67352").unwrap();
    assert_eq!(info.make, "Caterpillar");
    assert_eq!(info.model, "D8T");

    assert!(engine.equipment_info("99999").is_none());
    assert!(engine.equipment_info("").is_none());
}

#[test]
fn test_repeated_calls_are_identical() {
    let engine = engine();
    let first = engine.calculate_values("67352", 2013);
    for _ in 0..10 {
        assert_eq!(engine.calculate_values("67352", 2013), first);
        assert_eq!(
            engine.calculate_values("99999", 2013),
            Err(ValuationError::UnknownClassificationId("99999".into()))
        );
    }
    assert_eq!(engine.equipment_info("87390"), engine.equipment_info("87390"));
}

#[test]
fn test_concurrent_readers_share_one_engine() {
    let engine = Arc::new(engine());
    let expected = engine.calculate_values("87390", 2016).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let engine = Arc::clone(&engine);
            std::thread::spawn(move || {
                (0..100)
                    .map(|_| engine.calculate_values("87390", 2016).unwrap())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        let results = handle.join().unwrap();
        assert!(results.iter().all(|v| *v == expected));
    }
}

#[test]
fn test_engine_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ValuationEngine>();
}
