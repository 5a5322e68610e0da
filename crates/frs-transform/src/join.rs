//! Key-aligned combination of entity tables.

use std::collections::{HashMap, HashSet};

use polars::prelude::{IdxCa, IdxSize, IntoColumn, NamedFrom, NewChunkedArray, Series};
use tracing::debug;

use crate::error::{Result, TransformError};
use crate::frame::EntityFrame;

/// Outer-joins frames on their shared key, left to right.
///
/// Each right frame contributes only the columns the accumulated result does
/// not already have, so when names clash the earliest frame wins. Result
/// rows are the left keys in order followed by right keys not seen before.
/// Keys must be unique within each frame; reshape long tables first.
pub fn join_frames(frames: &[EntityFrame]) -> Result<EntityFrame> {
    let (first, rest) = frames
        .split_first()
        .ok_or_else(|| TransformError::schema("<join>", "no tables to join"))?;
    unique_keys(first)?;
    rest.iter().try_fold(first.clone(), |left, right| join_pair(&left, right))
}

fn unique_keys(frame: &EntityFrame) -> Result<HashMap<i64, usize>> {
    let keys = frame.keys()?;
    let mut positions = HashMap::with_capacity(keys.len());
    for (row, key) in keys.into_iter().enumerate() {
        if positions.insert(key, row).is_some() {
            return Err(TransformError::schema(
                &frame.name,
                format!("duplicate key {key} in {}; consolidate before joining", frame.key_column()),
            ));
        }
    }
    Ok(positions)
}

fn join_pair(left: &EntityFrame, right: &EntityFrame) -> Result<EntityFrame> {
    if left.key_column() != right.key_column() {
        return Err(TransformError::schema(
            &right.name,
            format!(
                "key column '{}' does not match '{}'",
                right.key_column(),
                left.key_column()
            ),
        ));
    }
    let right_positions = unique_keys(right)?;
    let left_keys = left.keys()?;
    let right_keys = right.keys()?;

    let seen: HashSet<i64> = left_keys.iter().copied().collect();
    let mut keys = left_keys.clone();
    keys.extend(right_keys.iter().copied().filter(|key| !seen.contains(key)));

    let left_rows = IdxCa::from_iter_options(
        "left".into(),
        (0..keys.len()).map(|row| (row < left_keys.len()).then_some(row as IdxSize)),
    );
    let right_rows = IdxCa::from_iter_options(
        "right".into(),
        keys.iter()
            .map(|key| right_positions.get(key).map(|row| *row as IdxSize)),
    );

    let present: HashSet<String> = left.column_names().into_iter().collect();
    let added: Vec<String> = right
        .column_names()
        .into_iter()
        .filter(|name| !present.contains(name))
        .collect();

    let mut data = left.data.take(&left_rows)?;
    data.with_column(Series::new(left.key_column().into(), keys).into_column())?;
    if !added.is_empty() {
        let extra = right.data.select(added.iter().map(String::as_str))?.take(&right_rows)?;
        data.hstack_mut(extra.get_columns())?;
    }

    debug!(
        left = %left.name,
        right = %right.name,
        columns_added = added.len(),
        rows = data.height(),
        "joined tables"
    );
    EntityFrame::new(left.name.clone(), left.level, data)
}
