//! Human-readable rendering of valuation results.
//!
//! Used by the binary; wrappers that want machine output can serialize
//! [`ValuationReport`] directly.

use serde::Serialize;

use crate::engine::ValuationEngine;
use crate::types::{ClassificationInfo, Valuation, ValuationError, ValueType};

/// A valuation together with the inputs that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValuationReport {
    pub classification_id: String,
    pub model_year: i32,
    pub valuation: Valuation,
    pub classification: Option<ClassificationInfo>,
}

impl ValuationReport {
    /// Run the valuation and attach the classification metadata.
    pub fn build(
        engine: &ValuationEngine,
        classification_id: &str,
        model_year: i32,
    ) -> Result<Self, ValuationError> {
        let valuation = engine.calculate_values(classification_id, model_year)?;
        Ok(Self {
            classification_id: classification_id.to_string(),
            model_year,
            valuation,
            classification: engine.equipment_info(classification_id).cloned(),
        })
    }

    /// Multi-line plain-text rendering.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "Classification ID {}, Model Year {}\n",
            self.classification_id, self.model_year
        ));
        if let Some(info) = &self.classification {
            out.push_str(&format!("  Equipment: {info}\n"));
        }
        for value_type in ValueType::ALL {
            out.push_str(&format!(
                "  {}: {}\n",
                value_type.label(),
                format_dollars(self.valuation.get(*value_type))
            ));
        }
        out
    }
}

/// Render classification metadata one field per line.
pub fn info_text(info: &ClassificationInfo) -> String {
    format!(
        "  Category: {}\n  Subcategory: {}\n  Make: {}\n  Model: {}\n",
        info.category, info.subcategory, info.make, info.model
    )
}

/// Whole dollars with thousands separators: `30008` → `$30,008`.
pub fn format_dollars(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if amount < 0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
