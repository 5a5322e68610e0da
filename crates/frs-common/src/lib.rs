//! Shared utilities for FRS crates.
//!
//! This crate provides common utilities used across the FRS workspace,
//! including Polars value helpers and case-insensitive column lookup.

pub mod lookup;
pub mod polars;

// Re-export commonly used functions at crate root for convenience
pub use lookup::ColumnLookup;
pub use polars::{
    any_to_f64, any_to_i64, any_to_string, column_f64_values, column_i64_values, format_numeric,
    parse_f64, parse_i64,
};
