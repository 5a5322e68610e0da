//! Entity indexing of raw survey tables.
//!
//! A raw FRS table identifies its rows by serial number, benefit unit number
//! and person number. Indexing replaces those with synthetic identifiers:
//! the table's own identifier becomes the key column and identifiers of the
//! enclosing levels are kept as ordinary columns.

use polars::prelude::{Column, DataFrame};
use tracing::debug;

use frs_common::ColumnLookup;
use frs_model::{ADMIN_COLUMNS, BENUNIT_COLUMN, EntityLevel, PERSON_NUMBER_COLUMNS, classify_table};

use crate::error::{Result, TransformError};
use crate::frame::EntityFrame;
use crate::ids::derive_ids;

/// Infers a table's level from the identifying columns it carries.
pub fn infer_level(data: &DataFrame) -> EntityLevel {
    let lookup = ColumnLookup::new(data.get_column_names().iter().map(|name| name.as_str()));
    if lookup.first_of(PERSON_NUMBER_COLUMNS).is_some() {
        EntityLevel::Person
    } else if lookup.contains(BENUNIT_COLUMN) {
        EntityLevel::Benunit
    } else {
        EntityLevel::Household
    }
}

/// Static classification by name, falling back to inference.
pub fn resolve_level(table_name: &str, data: &DataFrame) -> EntityLevel {
    classify_table(table_name).unwrap_or_else(|| infer_level(data))
}

/// Indexes a raw table at `level`.
///
/// Output columns: the level's identifier, the enclosing identifiers
/// outermost first, then the remaining raw columns in their original order
/// with administrative columns dropped.
pub fn index_table(table_name: &str, data: &DataFrame, level: EntityLevel) -> Result<EntityFrame> {
    let lineage = level.lineage();
    let mut ids = derive_ids(table_name, data, lineage).map_err(|err| match err {
        TransformError::MissingColumn { column, table } => TransformError::schema(
            &table,
            format!("cannot index at {level} level: column '{column}' not found"),
        ),
        other => other,
    })?;

    // The key goes first, enclosing ids follow in lineage order.
    let mut columns: Vec<Column> = Vec::with_capacity(data.width() + ids.len());
    if let Some(key) = ids.pop() {
        if key.null_count() > 0 {
            return Err(TransformError::schema(
                table_name,
                format!("{} null {} values", key.null_count(), key.name()),
            ));
        }
        columns.push(key);
    }
    columns.extend(ids);

    let mut dropped = 0usize;
    for column in data.get_columns() {
        let name = column.name().as_str();
        let is_admin = ADMIN_COLUMNS
            .iter()
            .any(|admin| admin.eq_ignore_ascii_case(name));
        if is_admin || EntityLevel::from_id_column(name).is_some() {
            dropped += 1;
            continue;
        }
        columns.push(column.clone());
    }

    let frame = EntityFrame::new(table_name, level, DataFrame::new(columns)?)?;
    debug!(
        table = table_name,
        level = %level,
        rows = frame.record_count(),
        dropped,
        "indexed table"
    );
    Ok(frame)
}
