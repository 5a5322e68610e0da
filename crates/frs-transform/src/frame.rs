//! Entity-keyed table type.
//!
//! This module provides [`EntityFrame`], which wraps a Polars DataFrame with
//! the table name and the entity level its rows are keyed at. The first
//! column of the frame is always the level's identifier column.

use polars::prelude::DataFrame;

use frs_common::column_i64_values;
use frs_model::EntityLevel;

use crate::error::{Result, TransformError};

/// A survey table keyed by entity identifier.
///
/// The key column may repeat (one-to-many tables such as jobs) until the
/// frame is passed through [`crate::consolidate`].
#[derive(Debug, Clone)]
pub struct EntityFrame {
    /// Table name (e.g. "adult", "job").
    pub name: String,
    /// Level of the hierarchy the key identifies.
    pub level: EntityLevel,
    /// The table contents; column 0 is the key.
    pub data: DataFrame,
}

impl EntityFrame {
    /// Wrap a DataFrame whose first column is `level`'s identifier.
    pub fn new(name: impl Into<String>, level: EntityLevel, data: DataFrame) -> Result<Self> {
        let name = name.into();
        let first = data
            .get_column_names()
            .first()
            .map(|column| column.to_string());
        if first.as_deref() != Some(level.id_column()) {
            return Err(TransformError::schema(
                &name,
                format!(
                    "expected key column '{}' first, found {}",
                    level.id_column(),
                    first.unwrap_or_else(|| "no columns".to_string())
                ),
            ));
        }
        Ok(Self { name, level, data })
    }

    /// Wrap a stored table, taking the level from its first column's name.
    pub fn from_keyed(name: impl Into<String>, data: DataFrame) -> Result<Self> {
        let name = name.into();
        let first = data
            .get_column_names()
            .first()
            .map(|column| column.to_string())
            .unwrap_or_default();
        let level = EntityLevel::from_id_column(&first).ok_or_else(|| {
            TransformError::schema(&name, format!("first column '{first}' is not an entity id"))
        })?;
        Self::new(name, level, data)
    }

    /// Name of the key column.
    pub fn key_column(&self) -> &'static str {
        self.level.id_column()
    }

    /// Key values in row order. A missing key is a schema error.
    pub fn keys(&self) -> Result<Vec<i64>> {
        let column = self.data.column(self.key_column())?;
        column_i64_values(column)?
            .into_iter()
            .enumerate()
            .map(|(row, key)| {
                key.ok_or_else(|| {
                    TransformError::schema(&self.name, format!("missing key value in row {row}"))
                })
            })
            .collect()
    }

    /// Identifier columns of enclosing levels carried as ordinary columns.
    pub fn outer_id_columns(&self) -> Vec<String> {
        self.column_names()
            .into_iter()
            .skip(1)
            .filter(|column| EntityLevel::from_id_column(column).is_some())
            .collect()
    }

    /// Data columns: everything except identifier columns.
    pub fn value_columns(&self) -> Vec<String> {
        self.column_names()
            .into_iter()
            .skip(1)
            .filter(|column| EntityLevel::from_id_column(column).is_none())
            .collect()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.data
            .get_column_names()
            .iter()
            .map(|column| column.to_string())
            .collect()
    }

    /// Returns the number of records in the frame.
    pub fn record_count(&self) -> usize {
        self.data.height()
    }
}
