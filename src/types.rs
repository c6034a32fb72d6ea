//! Shared types for the EQUIPVAL engine.
//!
//! These types form the data model used by the dataset loader and the
//! valuation engine. Records are built once from the reference table and
//! never mutated afterwards.

use rust_decimal::Decimal;
use serde::Serialize;
use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Opaque classification identifier, the unique key of the reference table.
///
/// Numeric ids are accepted and stringified, so `87390u32` and `"87390"`
/// address the same record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassificationId(String);

impl ClassificationId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClassificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ClassificationId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Lets `HashMap<ClassificationId, _>` be queried with a plain `&str`.
impl Borrow<str> for ClassificationId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ClassificationId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ClassificationId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&String> for ClassificationId {
    fn from(id: &String) -> Self {
        Self(id.clone())
    }
}

impl From<u32> for ClassificationId {
    fn from(id: u32) -> Self {
        Self(id.to_string())
    }
}

impl From<u64> for ClassificationId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

// ---------------------------------------------------------------------------
// Reference records
// ---------------------------------------------------------------------------

/// Descriptive metadata for a classification. Never used in the arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationInfo {
    pub category: String,
    pub subcategory: String,
    pub make: String,
    pub model: String,
}

impl fmt::Display for ClassificationInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} / {}: {} {}",
            self.category, self.subcategory, self.make, self.model
        )
    }
}

/// Fraction of `book_cost` retained for one model year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRatios {
    pub fmv: Decimal,
    pub flv: Decimal,
}

impl YearRatios {
    /// Ratio for the given value type.
    pub fn ratio(&self, value_type: ValueType) -> Decimal {
        match value_type {
            ValueType::Fmv => self.fmv,
            ValueType::Flv => self.flv,
        }
    }
}

/// One entry of the reference table.
#[derive(Debug, Clone, PartialEq)]
pub struct EquipmentRecord {
    pub classification_id: ClassificationId,
    /// Static base cost, identical for every model year.
    pub book_cost: Decimal,
    /// Depreciation ratios keyed by model year. May cover only some years.
    pub schedule: BTreeMap<i32, YearRatios>,
    /// `None` when the source row carries no `classification` block.
    pub classification: Option<ClassificationInfo>,
    pub retail_sale_count: Option<u64>,
    pub auction_sale_count: Option<u64>,
}

impl EquipmentRecord {
    /// Ratios for a model year, if the schedule defines it.
    pub fn ratios_for(&self, model_year: i32) -> Option<&YearRatios> {
        self.schedule.get(&model_year)
    }

    /// Model years covered by the schedule, ascending.
    pub fn years(&self) -> Vec<i32> {
        self.schedule.keys().copied().collect()
    }
}

// ---------------------------------------------------------------------------
// Valuation output
// ---------------------------------------------------------------------------

/// The two value types produced for every query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// Fair Market Value (retail).
    Fmv,
    /// Forced Liquidation Value (auction).
    Flv,
}

impl ValueType {
    pub const ALL: &'static [ValueType] = &[ValueType::Fmv, ValueType::Flv];

    /// Human-facing label.
    pub fn label(&self) -> &'static str {
        match self {
            ValueType::Fmv => "Market Value (FMV)",
            ValueType::Flv => "Auction Value (FLV)",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Fmv => write!(f, "FMV"),
            ValueType::Flv => write!(f, "FLV"),
        }
    }
}

/// Rounded dollar values for one (classification, model year) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Valuation {
    pub fmv: i64,
    pub flv: i64,
}

impl Valuation {
    pub fn get(&self, value_type: ValueType) -> i64 {
        match value_type {
            ValueType::Fmv => self.fmv,
            ValueType::Flv => self.flv,
        }
    }
}

impl fmt::Display for Valuation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FMV={} FLV={}", self.fmv, self.flv)
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Failures while building a dataset. Both are fatal to engine construction.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Data source '{location}' could not be read: {source}")]
    SourceUnavailable {
        location: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid equipment data{}: {message}", format_location(.classification_id, .year))]
    DataFormat {
        classification_id: Option<String>,
        year: Option<String>,
        message: String,
    },
}

impl LoadError {
    /// Structural error that cannot be pinned to a record.
    pub fn format(message: impl Into<String>) -> Self {
        LoadError::DataFormat {
            classification_id: None,
            year: None,
            message: message.into(),
        }
    }

    /// Structural error inside a specific record (and optionally year).
    pub fn in_record(
        classification_id: &str,
        year: Option<&str>,
        message: impl Into<String>,
    ) -> Self {
        LoadError::DataFormat {
            classification_id: Some(classification_id.to_string()),
            year: year.map(str::to_string),
            message: message.into(),
        }
    }
}

fn format_location(classification_id: &Option<String>, year: &Option<String>) -> String {
    match (classification_id, year) {
        (Some(id), Some(year)) => format!(" (classification {id}, year {year})"),
        (Some(id), None) => format!(" (classification {id})"),
        (None, Some(year)) => format!(" (year {year})"),
        (None, None) => String::new(),
    }
}

/// Per-query failures. All are recoverable by the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValuationError {
    #[error("Model year must be between {min} and {max}, got {year}")]
    YearOutOfRange { year: i32, min: i32, max: i32 },

    #[error("Classification ID '{0}' not found in equipment data.")]
    UnknownClassificationId(String),

    #[error("Model year {year} not found in schedule for Classification ID {classification_id}")]
    ScheduleYearMissing {
        classification_id: String,
        year: i32,
    },

    #[error("{value_type} for Classification ID {classification_id}, year {year} does not fit in a whole-dollar amount")]
    ArithmeticOverflow {
        classification_id: String,
        year: i32,
        value_type: ValueType,
    },
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
