//! EQUIPVAL: Depreciation-based equipment valuation
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod dataset;
pub mod engine;
pub mod report;
