//! Polars value utility functions.
//!
//! This module provides helper functions for working with Polars `AnyValue`
//! types and for pulling whole columns out as plain numeric vectors.

use polars::prelude::*;

/// Converts a Polars `AnyValue` to a `String` representation.
///
/// Returns an empty string for `Null`, properly formats numeric types without
/// unnecessary trailing zeros.
///
/// # Examples
///
/// ```
/// use polars::prelude::AnyValue;
/// use frs_common::any_to_string;
///
/// assert_eq!(any_to_string(AnyValue::Null), "");
/// assert_eq!(any_to_string(AnyValue::Int32(42)), "42");
/// assert_eq!(any_to_string(AnyValue::Float64(1050.0)), "1050");
/// ```
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Formats a floating-point number as a string without trailing zeros.
///
/// # Examples
///
/// ```
/// use frs_common::format_numeric;
///
/// assert_eq!(format_numeric(1.0), "1");
/// assert_eq!(format_numeric(1.5), "1.5");
/// assert_eq!(format_numeric(100.0), "100");
/// assert_eq!(format_numeric(0.0), "0");
/// ```
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if !s.contains('.') {
        return s;
    }
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Converts an `AnyValue` to `f64`, returning `None` for non-numeric or null values.
///
/// Handles integer types, floating-point types, and string parsing.
pub fn any_to_f64(value: AnyValue<'_>) -> Option<f64> {
    match value {
        AnyValue::Null => None,
        AnyValue::Int8(v) => Some(f64::from(v)),
        AnyValue::Int16(v) => Some(f64::from(v)),
        AnyValue::Int32(v) => Some(f64::from(v)),
        AnyValue::Int64(v) => Some(v as f64),
        AnyValue::UInt8(v) => Some(f64::from(v)),
        AnyValue::UInt16(v) => Some(f64::from(v)),
        AnyValue::UInt32(v) => Some(f64::from(v)),
        AnyValue::UInt64(v) => Some(v as f64),
        AnyValue::Float32(v) => Some(f64::from(v)),
        AnyValue::Float64(v) => Some(v),
        AnyValue::String(s) => parse_f64(s),
        AnyValue::StringOwned(s) => parse_f64(&s),
        _ => None,
    }
}

/// Converts an `AnyValue` to `i64`, returning `None` for non-integer or null values.
///
/// Floating-point values are accepted only when they carry no fractional part.
pub fn any_to_i64(value: AnyValue<'_>) -> Option<i64> {
    match value {
        AnyValue::Null => None,
        AnyValue::Int8(v) => Some(i64::from(v)),
        AnyValue::Int16(v) => Some(i64::from(v)),
        AnyValue::Int32(v) => Some(i64::from(v)),
        AnyValue::Int64(v) => Some(v),
        AnyValue::UInt8(v) => Some(i64::from(v)),
        AnyValue::UInt16(v) => Some(i64::from(v)),
        AnyValue::UInt32(v) => Some(i64::from(v)),
        AnyValue::UInt64(v) => i64::try_from(v).ok(),
        AnyValue::Float32(v) => integral_f64(f64::from(v)),
        AnyValue::Float64(v) => integral_f64(v),
        AnyValue::String(s) => parse_i64(s),
        AnyValue::StringOwned(s) => parse_i64(&s),
        _ => None,
    }
}

/// Parses a string as `f64`, returning `None` for invalid or empty strings.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Parses a string as `i64`, returning `None` for invalid or empty strings.
///
/// Integral decimal spellings such as `"12.0"` are accepted, since survey
/// extracts frequently store integer codes as floats.
pub fn parse_i64(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .parse::<i64>()
        .ok()
        .or_else(|| parse_f64(trimmed).and_then(integral_f64))
}

fn integral_f64(value: f64) -> Option<i64> {
    if value.is_finite() && value.fract() == 0.0 {
        Some(value as i64)
    } else {
        None
    }
}

/// Reads a column as a vector of optional `f64` values.
///
/// The column is cast non-strictly, so strings that do not parse as numbers
/// (including the blank cells common in survey extracts) become `None`.
pub fn column_f64_values(column: &Column) -> PolarsResult<Vec<Option<f64>>> {
    if column.dtype().is_string() {
        return Ok((0..column.len())
            .map(|idx| column.get(idx).ok().and_then(any_to_f64))
            .collect());
    }
    let cast = column.cast(&DataType::Float64)?;
    Ok(cast.as_materialized_series().f64()?.into_iter().collect())
}

/// Reads a column as a vector of optional `i64` values.
///
/// Values with a fractional part are treated as missing.
pub fn column_i64_values(column: &Column) -> PolarsResult<Vec<Option<i64>>> {
    Ok(column_f64_values(column)?
        .into_iter()
        .map(|value| value.and_then(integral_f64))
        .collect())
}
