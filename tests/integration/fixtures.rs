//! Shared fixtures: the reference book used across the integration suite.

use std::path::{Path, PathBuf};

use equipval::dataset::Dataset;
use equipval::engine::ValuationEngine;
use serde_json::Value;

/// The shipped reference table (dozer 67352, boom lift 87390).
const BOOK_JSON: &str = include_str!("../../data/Book.json");

pub fn book() -> Value {
    serde_json::from_str(BOOK_JSON).expect("data/Book.json is valid JSON")
}

pub fn book_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data").join("Book.json")
}

pub fn engine() -> ValuationEngine {
    ValuationEngine::new(Dataset::from_value(&book()).expect("fixture book is valid"))
}

/// A JSON book written to a unique temp file, removed on drop.
pub struct TempBook {
    path: PathBuf,
}

impl TempBook {
    pub fn write(value: &Value) -> Self {
        let mut path = std::env::temp_dir();
        path.push(format!("equipval_test_book_{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, serde_json::to_string(value).unwrap()).unwrap();
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempBook {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}
