//! Long-to-wide reshaping of one-to-many tables.
//!
//! Tables such as `job` or `benefits` carry several rows per person. The
//! reshaper turns them into one row per entity: the first `max_count - 1`
//! occurrences each get their own suffixed column and the rest are summed
//! into an overflow column.

use std::collections::HashSet;

use indexmap::IndexMap;
use polars::prelude::{
    Column, DataFrame, IdxCa, IdxSize, IntoColumn, NamedFrom, NewChunkedArray, Series,
};
use tracing::debug;

use frs_common::column_f64_values;

use crate::error::{Result, TransformError};
use crate::frame::EntityFrame;

/// Suffix of the overflow columns.
const OVERFLOW_SUFFIX: &str = "other";

/// Consolidates repeated occurrences into one row per key.
///
/// Rows are grouped by key in first-seen order. Occurrence `i` (zero-based)
/// for `i < max_count - 1` lands in `<col>_<i + 1>`; later occurrences are
/// summed into `<col>_other`, or into the bare `<col>` when `max_count` is 1.
/// Enclosing identifiers are taken from each entity's first row. With a
/// `count_label`, an extra Int64 column holds the number of occurrences.
///
/// Value columns are coerced to Float64 and every missing cell is zero in
/// the output. A generated name or `count_label` that repeats another output
/// column is a schema error.
pub fn consolidate(
    frame: &EntityFrame,
    max_count: usize,
    count_label: Option<&str>,
) -> Result<EntityFrame> {
    if max_count == 0 {
        return Err(TransformError::schema(
            &frame.name,
            "max_count must be at least 1",
        ));
    }

    let keys = frame.keys()?;
    let mut groups: IndexMap<i64, Vec<usize>> = IndexMap::new();
    for (row, key) in keys.iter().enumerate() {
        groups.entry(*key).or_default().push(row);
    }

    let first_rows = IdxCa::from_vec(
        "first".into(),
        groups
            .values()
            .map(|rows| rows[0] as IdxSize)
            .collect(),
    );
    let mut columns: Vec<Column> = Vec::new();
    columns.push(
        Series::new(
            frame.key_column().into(),
            groups.keys().copied().collect::<Vec<i64>>(),
        )
        .into_column(),
    );
    for outer in frame.outer_id_columns() {
        let taken = frame.data.column(&outer)?.take(&first_rows)?;
        columns.push(taken);
    }

    let value_names = frame.value_columns();
    let mut values = Vec::with_capacity(value_names.len());
    for name in &value_names {
        values.push(column_f64_values(frame.data.column(name)?)?);
    }

    let slots = max_count - 1;
    for slot in 0..slots {
        for (name, cells) in value_names.iter().zip(&values) {
            let column: Vec<f64> = groups
                .values()
                .map(|rows| rows.get(slot).and_then(|row| cells[*row]).unwrap_or(0.0))
                .collect();
            columns.push(Series::new(format!("{name}_{}", slot + 1).into(), column).into_column());
        }
    }
    for (name, cells) in value_names.iter().zip(&values) {
        let column: Vec<f64> = groups
            .values()
            .map(|rows| {
                rows.iter()
                    .skip(slots)
                    .filter_map(|row| cells[*row])
                    .sum()
            })
            .collect();
        let label = if slots == 0 {
            name.clone()
        } else {
            format!("{name}_{OVERFLOW_SUFFIX}")
        };
        columns.push(Series::new(label.into(), column).into_column());
    }

    if let Some(label) = count_label {
        let counts: Vec<i64> = groups.values().map(|rows| rows.len() as i64).collect();
        columns.push(Series::new(label.into(), counts).into_column());
    }

    let mut seen = HashSet::with_capacity(columns.len());
    for column in &columns {
        if !seen.insert(column.name().as_str()) {
            return Err(TransformError::schema(
                &frame.name,
                format!("output column '{}' would appear twice", column.name()),
            ));
        }
    }

    let data = DataFrame::new(columns)?;
    debug!(
        table = %frame.name,
        rows_in = frame.record_count(),
        rows_out = data.height(),
        max_count,
        "consolidated occurrences"
    );
    EntityFrame::new(frame.name.clone(), frame.level, data)
}
