//! Valuation engine.
//!
//! Validates the model year, resolves the classification record and its
//! schedule entry, and multiplies the static book cost by the year's FMV
//! and FLV ratios. Results are rounded to whole dollars with
//! round-half-away-from-zero on the exact decimal product.

use rust_decimal::prelude::*;
use std::path::Path;
use tracing::debug;

use crate::dataset::{Dataset, DatasetSource};
use crate::types::{
    ClassificationInfo, EquipmentRecord, LoadError, Valuation, ValuationError, ValueType,
};

/// Oldest model year the book covers.
pub const MIN_MODEL_YEAR: i32 = 2006;
/// Newest model year the book covers.
pub const MAX_MODEL_YEAR: i32 = 2020;

const ROUNDING: RoundingStrategy = RoundingStrategy::MidpointAwayFromZero;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Valid model-year window, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub min_model_year: i32,
    pub max_model_year: i32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_model_year: MIN_MODEL_YEAR,
            max_model_year: MAX_MODEL_YEAR,
        }
    }
}

impl EngineConfig {
    pub fn contains(&self, model_year: i32) -> bool {
        (self.min_model_year..=self.max_model_year).contains(&model_year)
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Answers valuation and metadata queries against an immutable dataset.
///
/// Construct once at startup; every query is a pure read, so the engine can
/// be shared across threads behind an `Arc` without locking.
#[derive(Debug, Clone)]
pub struct ValuationEngine {
    dataset: Dataset,
    config: EngineConfig,
}

impl ValuationEngine {
    /// Engine over a dataset with the default 2006-2020 window.
    pub fn new(dataset: Dataset) -> Self {
        Self::with_config(dataset, EngineConfig::default())
    }

    pub fn with_config(dataset: Dataset, config: EngineConfig) -> Self {
        Self { dataset, config }
    }

    /// Load the dataset from `source` and build an engine over it.
    pub fn from_source(source: DatasetSource, config: EngineConfig) -> Result<Self, LoadError> {
        Ok(Self::with_config(Dataset::load(source)?, config))
    }

    /// Shorthand for a JSON book on disk with the default window.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        Ok(Self::new(Dataset::from_path(path)?))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Market (FMV) and auction (FLV) values for a classification and year.
    ///
    /// Checks run in a fixed order: year window, classification id, then
    /// the record's own schedule. The first failure aborts the call.
    pub fn calculate_values(
        &self,
        classification_id: impl AsRef<str>,
        model_year: i32,
    ) -> Result<Valuation, ValuationError> {
        let classification_id = classification_id.as_ref();

        self.validate_model_year(model_year)?;
        let record = self
            .dataset
            .get(classification_id)
            .ok_or_else(|| ValuationError::UnknownClassificationId(classification_id.to_string()))?;

        let valuation = Valuation {
            fmv: value_for(record, model_year, ValueType::Fmv)?,
            flv: value_for(record, model_year, ValueType::Flv)?,
        };

        debug!(
            classification_id,
            model_year,
            fmv = valuation.fmv,
            flv = valuation.flv,
            "Valuation computed"
        );
        Ok(valuation)
    }

    /// Descriptive metadata for a classification, or `None` if unknown.
    pub fn equipment_info(&self, classification_id: impl AsRef<str>) -> Option<&ClassificationInfo> {
        self.dataset
            .get(classification_id.as_ref())
            .and_then(|record| record.classification.as_ref())
    }

    pub fn equipment_record(&self, classification_id: impl AsRef<str>) -> Option<&EquipmentRecord> {
        self.dataset.get(classification_id.as_ref())
    }

    /// Every classification id in the book, sorted.
    pub fn classification_ids(&self) -> Vec<&str> {
        self.dataset.ids()
    }

    /// Model years with a schedule entry for this id, ascending.
    pub fn available_years(&self, classification_id: impl AsRef<str>) -> Option<Vec<i32>> {
        self.dataset
            .get(classification_id.as_ref())
            .map(EquipmentRecord::years)
    }

    pub fn len(&self) -> usize {
        self.dataset.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dataset.is_empty()
    }

    fn validate_model_year(&self, model_year: i32) -> Result<(), ValuationError> {
        if self.config.contains(model_year) {
            Ok(())
        } else {
            Err(ValuationError::YearOutOfRange {
                year: model_year,
                min: self.config.min_model_year,
                max: self.config.max_model_year,
            })
        }
    }
}

/// `round(book_cost * ratio)` for one value type.
fn value_for(
    record: &EquipmentRecord,
    model_year: i32,
    value_type: ValueType,
) -> Result<i64, ValuationError> {
    let ratios = record
        .ratios_for(model_year)
        .ok_or_else(|| ValuationError::ScheduleYearMissing {
            classification_id: record.classification_id.to_string(),
            year: model_year,
        })?;

    record
        .book_cost
        .checked_mul(ratios.ratio(value_type))
        .map(|value| value.round_dp_with_strategy(0, ROUNDING))
        .and_then(|value| value.to_i64())
        .ok_or_else(|| ValuationError::ArithmeticOverflow {
            classification_id: record.classification_id.to_string(),
            year: model_year,
            value_type,
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
