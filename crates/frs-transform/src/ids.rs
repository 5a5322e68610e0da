//! Synthetic identifier derivation.

use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, Series};

use frs_common::{ColumnLookup, column_i64_values};
use frs_model::{
    BENUNIT_COLUMN, EntityLevel, PERSON_NUMBER_COLUMNS, SERIAL_COLUMN, benunit_id, household_id,
    person_id,
};

use crate::error::{Result, TransformError};

/// Derives one Int64 identifier column per requested level.
///
/// Raw columns are matched case-insensitively. A null in any component
/// yields a null identifier for that row.
pub fn derive_ids(
    table_name: &str,
    data: &DataFrame,
    levels: &[EntityLevel],
) -> Result<Vec<Column>> {
    let lookup = ColumnLookup::new(data.get_column_names().iter().map(|name| name.as_str()));
    let component = |candidates: &[&str]| -> Result<Vec<Option<i64>>> {
        let column = lookup
            .first_of(candidates)
            .ok_or_else(|| TransformError::MissingColumn {
                column: candidates.join(" or "),
                table: table_name.to_string(),
            })?;
        Ok(column_i64_values(data.column(column)?)?)
    };

    let serial = component(&[SERIAL_COLUMN])?;
    let needs_benunit = levels
        .iter()
        .any(|level| *level != EntityLevel::Household);
    let benunit = if needs_benunit {
        component(&[BENUNIT_COLUMN])?
    } else {
        Vec::new()
    };
    let person = if levels.contains(&EntityLevel::Person) {
        component(PERSON_NUMBER_COLUMNS)?
    } else {
        Vec::new()
    };

    let mut columns = Vec::with_capacity(levels.len());
    for level in levels {
        let mut values: Vec<Option<i64>> = Vec::with_capacity(serial.len());
        for row in 0..serial.len() {
            let components = match level {
                EntityLevel::Household => serial[row].map(|s| (s, 0, 0)),
                EntityLevel::Benunit => serial[row].zip(benunit[row]).map(|(s, b)| (s, b, 0)),
                EntityLevel::Person => serial[row]
                    .zip(benunit[row])
                    .zip(person[row])
                    .map(|((s, b), p)| (s, b, p)),
            };
            let Some((s, b, p)) = components else {
                values.push(None);
                continue;
            };
            let id = match level {
                EntityLevel::Household => household_id(s),
                EntityLevel::Benunit => benunit_id(s, b),
                EntityLevel::Person => person_id(s, b, p),
            }
            .ok_or_else(|| {
                TransformError::schema(
                    table_name,
                    format!("{} overflows in row {row} (serial {s})", level.id_column()),
                )
            })?;
            values.push(Some(id));
        }
        columns.push(Series::new(level.id_column().into(), values).into_column());
    }
    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> DataFrame {
        DataFrame::new(vec![
            Series::new("sernum".into(), vec![Some(1i64), Some(1), None]).into_column(),
            Series::new("BENUNIT".into(), vec![0i64, 1, 1]).into_column(),
            Series::new("NEEDPER".into(), vec![1i64, 2, 3]).into_column(),
        ])
        .unwrap()
    }

    #[test]
    fn derives_every_requested_level() {
        let columns = derive_ids("care", &raw(), EntityLevel::Person.lineage()).unwrap();
        let names: Vec<_> = columns.iter().map(|c| c.name().to_string()).collect();
        assert_eq!(names, vec!["household_id", "benunit_id", "person_id"]);
        assert_eq!(
            column_i64_values(&columns[2]).unwrap(),
            vec![Some(101), Some(112), None]
        );
        assert_eq!(
            column_i64_values(&columns[1]).unwrap(),
            vec![Some(100), Some(110), None]
        );
    }

    #[test]
    fn household_level_ignores_missing_benunit() {
        let data =
            DataFrame::new(vec![Series::new("SERNUM".into(), vec![7i64]).into_column()]).unwrap();
        let columns = derive_ids("househol", &data, &[EntityLevel::Household]).unwrap();
        assert_eq!(column_i64_values(&columns[0]).unwrap(), vec![Some(700)]);
    }

    #[test]
    fn oversized_serial_is_a_schema_error() {
        let data = DataFrame::new(vec![
            Series::new("SERNUM".into(), vec![1i64, 100_000_000_000_000_000]).into_column(),
        ])
        .unwrap();
        let err = derive_ids("househol", &data, &[EntityLevel::Household]).unwrap_err();
        match err {
            TransformError::Schema { table, reason } => {
                assert_eq!(table, "househol");
                assert!(reason.contains("household_id overflows in row 1"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_person_number_is_reported() {
        let data = raw().drop("NEEDPER").unwrap();
        let err = derive_ids("adult", &data, &[EntityLevel::Person]).unwrap_err();
        match err {
            TransformError::MissingColumn { column, table } => {
                assert_eq!(column, "PERSON or NEEDPER");
                assert_eq!(table, "adult");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
