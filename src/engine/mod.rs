//! Core engine: model-year validation, record lookup and value computation.

pub mod valuation;

pub use valuation::{EngineConfig, ValuationEngine, MAX_MODEL_YEAR, MIN_MODEL_YEAR};
