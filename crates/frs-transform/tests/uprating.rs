//! Property tests for group uprating.

use std::collections::BTreeMap;

use frs_common::column_f64_values;
use frs_model::{EntityLevel, UpratingParameters, VariableGroup};
use frs_transform::{EntityFrame, Uprater};
use polars::prelude::{DataFrame, IntoColumn, NamedFrom, Series};
use proptest::prelude::*;

const BASE: i32 = 2020;
const TARGET: i32 = 2023;

fn group(variables: &[&str], base: f64, target: f64) -> VariableGroup {
    VariableGroup {
        variables: variables.iter().copied().map(String::from).collect(),
        index: BTreeMap::from([(BASE, base), (TARGET, target)]),
    }
}

/// Two groups that both list `shared`.
fn parameters(earnings: (f64, f64), benefits: (f64, f64)) -> UpratingParameters {
    let groups = BTreeMap::from([
        (
            "earnings".to_string(),
            group(&["inearns", "shared"], earnings.0, earnings.1),
        ),
        (
            "benefits".to_string(),
            group(&["BENAMT", "Shared"], benefits.0, benefits.1),
        ),
    ]);
    UpratingParameters {
        groups,
        ..UpratingParameters::default()
    }
}

fn frame(rows: &[(Option<f64>, Option<f64>, Option<f64>, f64)]) -> EntityFrame {
    let ids: Vec<i64> = (0..rows.len() as i64).map(|i| 101 + i * 100).collect();
    let data = DataFrame::new(vec![
        Series::new("person_id".into(), ids).into_column(),
        Series::new("INEARNS".into(), rows.iter().map(|r| r.0).collect::<Vec<_>>()).into_column(),
        Series::new("BENAMT".into(), rows.iter().map(|r| r.1).collect::<Vec<_>>()).into_column(),
        Series::new("SHARED".into(), rows.iter().map(|r| r.2).collect::<Vec<_>>()).into_column(),
        Series::new("AGE80".into(), rows.iter().map(|r| r.3).collect::<Vec<_>>()).into_column(),
    ])
    .unwrap();
    EntityFrame::new("adult", EntityLevel::Person, data).unwrap()
}

fn values(frame: &EntityFrame, column: &str) -> Vec<Option<f64>> {
    column_f64_values(frame.data.column(column).unwrap()).unwrap()
}

fn close(actual: &[Option<f64>], expected: &[Option<f64>]) -> bool {
    actual.len() == expected.len()
        && actual.iter().zip(expected).all(|pair| match pair {
            (Some(a), Some(e)) => (a - e).abs() <= 1e-9 * e.abs().max(1.0),
            (None, None) => true,
            _ => false,
        })
}

fn index_pair() -> impl Strategy<Value = (f64, f64)> {
    (0.5f64..2.0, 0.5f64..2.0)
}

fn rows_strategy() -> impl Strategy<Value = Vec<(Option<f64>, Option<f64>, Option<f64>, f64)>> {
    prop::collection::vec(
        (
            prop::option::of(0.0f64..10_000.0),
            prop::option::of(0.0f64..10_000.0),
            prop::option::of(0.0f64..10_000.0),
            16.0f64..80.0,
        ),
        1..20,
    )
}

proptest! {
    #[test]
    fn each_group_scales_by_its_own_ratio(
        earnings in index_pair(),
        benefits in index_pair(),
        rows in rows_strategy(),
    ) {
        let uprater = Uprater::new(&parameters(earnings, benefits), BASE, TARGET).unwrap();
        let input = frame(&rows);
        let out = uprater.apply(&input).unwrap();

        let earnings_factor = earnings.1 / earnings.0;
        let benefits_factor = benefits.1 / benefits.0;
        let scaled = |column: &str, factor: f64| -> Vec<Option<f64>> {
            values(&input, column)
                .into_iter()
                .map(|v| v.map(|v| v * factor))
                .collect()
        };

        prop_assert!(close(&values(&out, "INEARNS"), &scaled("INEARNS", earnings_factor)));
        prop_assert!(close(&values(&out, "BENAMT"), &scaled("BENAMT", benefits_factor)));
        // A variable listed in both groups takes both factors.
        prop_assert!(close(
            &values(&out, "SHARED"),
            &scaled("SHARED", earnings_factor * benefits_factor)
        ));
        prop_assert_eq!(values(&out, "AGE80"), values(&input, "AGE80"));
        prop_assert_eq!(out.column_names(), input.column_names());
    }

    #[test]
    fn reversing_the_years_restores_values(
        earnings in index_pair(),
        benefits in index_pair(),
        rows in rows_strategy(),
    ) {
        let params = parameters(earnings, benefits);
        let forward = Uprater::new(&params, BASE, TARGET).unwrap();
        let backward = Uprater::new(&params, TARGET, BASE).unwrap();
        let input = frame(&rows);
        let round = backward.apply(&forward.apply(&input).unwrap()).unwrap();
        for column in ["INEARNS", "BENAMT", "SHARED"] {
            prop_assert!(close(&values(&round, column), &values(&input, column)));
        }
    }
}
