//! Reference table loading.
//!
//! Parses the raw JSON book (keyed by classification id) into an immutable
//! [`Dataset`]. All shape and type checks happen here so that the valuation
//! engine never touches untyped data at query time.

use rust_decimal::Decimal;
use serde_json::{Map, Number, Value};
use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};

use crate::types::{ClassificationId, ClassificationInfo, EquipmentRecord, LoadError, YearRatios};

/// Where a dataset comes from.
#[derive(Debug, Clone)]
pub enum DatasetSource {
    /// JSON file on disk.
    Path(PathBuf),
    /// JSON document already held in memory.
    Json(String),
    /// Pre-parsed JSON tree.
    Value(Value),
}

/// Immutable mapping from classification id to its record.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: HashMap<ClassificationId, EquipmentRecord>,
}

impl Dataset {
    /// Build a dataset from any supported source.
    pub fn load(source: DatasetSource) -> Result<Self, LoadError> {
        match source {
            DatasetSource::Path(path) => Self::from_path(path),
            DatasetSource::Json(text) => Self::from_json_str(&text),
            DatasetSource::Value(value) => Self::from_value(&value),
        }
    }

    /// Read and parse a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::SourceUnavailable {
            location: path.display().to_string(),
            source,
        })?;

        let dataset = Self::from_json_str(&text)?;
        info!(
            path = %path.display(),
            records = dataset.len(),
            "Equipment dataset loaded"
        );
        Ok(dataset)
    }

    /// Parse a JSON document held in memory.
    pub fn from_json_str(text: &str) -> Result<Self, LoadError> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| LoadError::format(format!("malformed JSON: {e}")))?;
        Self::from_value(&value)
    }

    /// Parse JSON from a reader. Read failures surface as `SourceUnavailable`.
    pub fn from_reader(reader: impl Read) -> Result<Self, LoadError> {
        let value: Value = serde_json::from_reader(reader).map_err(|e| {
            if e.is_io() {
                LoadError::SourceUnavailable {
                    location: "<reader>".to_string(),
                    source: e.into(),
                }
            } else {
                LoadError::format(format!("malformed JSON: {e}"))
            }
        })?;
        Self::from_value(&value)
    }

    /// Convert a parsed JSON tree. Any invalid record fails the whole load.
    pub fn from_value(value: &Value) -> Result<Self, LoadError> {
        let root = value
            .as_object()
            .ok_or_else(|| LoadError::format("top level must be an object keyed by classification id"))?;

        let mut records = HashMap::with_capacity(root.len());
        for (id, entry) in root {
            let record = parse_record(id, entry)?;
            records.insert(record.classification_id.clone(), record);
        }

        debug!(records = records.len(), "Equipment dataset parsed");
        Ok(Self { records })
    }

    pub fn get(&self, classification_id: &str) -> Option<&EquipmentRecord> {
        self.records.get(classification_id)
    }

    pub fn contains(&self, classification_id: &str) -> bool {
        self.records.contains_key(classification_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All classification ids, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.records.keys().map(ClassificationId::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

// ---------------------------------------------------------------------------
// Record parsing
// ---------------------------------------------------------------------------

fn parse_record(id: &str, entry: &Value) -> Result<EquipmentRecord, LoadError> {
    let entry = entry
        .as_object()
        .ok_or_else(|| LoadError::in_record(id, None, "record must be an object"))?;

    let base_value = object_field(entry, "baseValue")
        .ok_or_else(|| LoadError::in_record(id, None, "missing object 'baseValue'"))?;
    let book_cost = decimal_field(id, None, base_value, "bookCost", "baseValue.bookCost")?;

    let retail_sale_count = optional_count(id, base_value, "retailSaleCount")?;
    let auction_sale_count = optional_count(id, base_value, "auctionSaleCount")?;

    let years = object_field(entry, "schedule")
        .and_then(|schedule| object_field(schedule, "years"))
        .ok_or_else(|| LoadError::in_record(id, None, "missing object 'schedule.years'"))?;
    let schedule = parse_schedule(id, years)?;

    let classification = match entry.get("classification") {
        None | Some(Value::Null) => None,
        Some(Value::Object(fields)) => Some(parse_classification(id, fields)?),
        Some(_) => {
            return Err(LoadError::in_record(id, None, "'classification' must be an object"));
        }
    };

    Ok(EquipmentRecord {
        classification_id: ClassificationId::from(id),
        book_cost,
        schedule,
        classification,
        retail_sale_count,
        auction_sale_count,
    })
}

fn parse_schedule(
    id: &str,
    years: &Map<String, Value>,
) -> Result<BTreeMap<i32, YearRatios>, LoadError> {
    let mut schedule = BTreeMap::new();
    for (year_key, ratios) in years {
        let year_ref = Some(year_key.as_str());
        let year: i32 = year_key
            .parse()
            .map_err(|_| LoadError::in_record(id, year_ref, "year key is not an integer"))?;

        let ratios = ratios
            .as_object()
            .ok_or_else(|| LoadError::in_record(id, year_ref, "year entry must be an object"))?;
        let fmv = decimal_field(id, year_ref, ratios, "fmv", "fmv")?;
        let flv = decimal_field(id, year_ref, ratios, "flv", "flv")?;

        // "2016" and "+2016" both parse to 2016; neither may shadow the other.
        if schedule.insert(year, YearRatios { fmv, flv }).is_some() {
            return Err(LoadError::in_record(
                id,
                year_ref,
                format!("duplicate schedule entry for year {year}"),
            ));
        }
    }
    Ok(schedule)
}

fn parse_classification(
    id: &str,
    fields: &Map<String, Value>,
) -> Result<ClassificationInfo, LoadError> {
    let text = |name: &str| -> Result<String, LoadError> {
        fields
            .get(name)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                LoadError::in_record(id, None, format!("missing string 'classification.{name}'"))
            })
    };

    Ok(ClassificationInfo {
        category: text("category")?,
        subcategory: text("subcategory")?,
        make: text("make")?,
        model: text("model")?,
    })
}

fn optional_count(
    id: &str,
    base_value: &Map<String, Value>,
    name: &str,
) -> Result<Option<u64>, LoadError> {
    match base_value.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value.as_u64().map(Some).ok_or_else(|| {
            LoadError::in_record(id, None, format!("'baseValue.{name}' must be a non-negative integer"))
        }),
    }
}

fn object_field<'a>(object: &'a Map<String, Value>, name: &str) -> Option<&'a Map<String, Value>> {
    object.get(name).and_then(Value::as_object)
}

/// Required numeric field. `label` is the dotted path used in messages.
fn decimal_field(
    id: &str,
    year: Option<&str>,
    object: &Map<String, Value>,
    name: &str,
    label: &str,
) -> Result<Decimal, LoadError> {
    match object.get(name) {
        Some(Value::Number(n)) => decimal_from_number(n).ok_or_else(|| {
            LoadError::in_record(
                id,
                year,
                format!("'{label}' value {n} is outside the supported decimal range"),
            )
        }),
        _ => Err(LoadError::in_record(id, year, format!("missing numeric '{label}'"))),
    }
}

/// Convert through the number's shortest decimal text so `0.613292` stays
/// exactly `0.613292` instead of its nearest binary float. `None` means the
/// value does not fit in a `Decimal`.
fn decimal_from_number(n: &Number) -> Option<Decimal> {
    let text = n.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
