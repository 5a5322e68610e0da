//! Monetary uprating between survey years.
//!
//! An [`Uprater`] is built once per (base, target) year pair from
//! [`UpratingParameters`] and applied to every table served for the target
//! year. It scales the member variables of each configured group by
//! `index[target] / index[base]` and, with a population projection, rescales
//! the survey weight by the change in projected population.

use polars::prelude::{DataFrame, IntoColumn, NamedFrom, Series};
use tracing::{debug, info};

use frs_common::{ColumnLookup, column_f64_values};
use frs_model::{EntityLevel, PopulationProjection, UpratingParameters};

use crate::error::{Result, TransformError};
use crate::frame::EntityFrame;

/// Resolved multiplier for one variable group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupMultiplier {
    pub group: String,
    pub variables: Vec<String>,
    pub factor: f64,
}

#[derive(Debug, Clone)]
struct WeightProjection {
    column: String,
    age_columns: Vec<String>,
    projection: PopulationProjection,
    total_ratio: f64,
}

#[derive(Debug, Clone, Default)]
pub struct Uprater {
    years: Option<(i32, i32)>,
    multipliers: Vec<GroupMultiplier>,
    weights: Option<WeightProjection>,
}

impl Uprater {
    /// The transform that returns tables unchanged.
    pub fn identity() -> Self {
        Self::default()
    }

    /// Builds the transform from `base` to `target`.
    ///
    /// Every group must carry an index value for both years, with a non-zero
    /// base value, and a population projection (when configured) must cover
    /// both years. Equal years validate the parameters and then yield the
    /// identity.
    pub fn new(parameters: &UpratingParameters, base: i32, target: i32) -> Result<Self> {
        let mut multipliers = Vec::with_capacity(parameters.groups.len());
        for (name, group) in &parameters.groups {
            let base_value = group.value(base).ok_or_else(|| {
                TransformError::configuration(format!("group '{name}' has no index for {base}"))
            })?;
            let target_value = group.value(target).ok_or_else(|| {
                TransformError::configuration(format!("group '{name}' has no index for {target}"))
            })?;
            if base_value == 0.0 {
                return Err(TransformError::configuration(format!(
                    "group '{name}' has a zero index for {base}"
                )));
            }
            multipliers.push(GroupMultiplier {
                group: name.clone(),
                variables: group.variables.clone(),
                factor: target_value / base_value,
            });
        }

        let weights = match &parameters.projection {
            Some(projection) => {
                for year in [base, target] {
                    if !projection.has_year(year) {
                        return Err(TransformError::configuration(format!(
                            "population projection has no values for {year}"
                        )));
                    }
                }
                let total_ratio = match (projection.total(base), projection.total(target)) {
                    (Some(from), Some(to)) if from > 0.0 => to / from,
                    _ => {
                        return Err(TransformError::configuration(format!(
                            "population projection total for {base} is zero"
                        )));
                    }
                };
                Some(WeightProjection {
                    column: parameters.weight_column().to_string(),
                    age_columns: parameters
                        .age_columns()
                        .into_iter()
                        .map(str::to_string)
                        .collect(),
                    projection: projection.clone(),
                    total_ratio,
                })
            }
            None => None,
        };

        if base == target {
            return Ok(Self::identity());
        }
        info!(
            base,
            target,
            groups = multipliers.len(),
            reweight = weights.is_some(),
            "configured uprating"
        );
        Ok(Self {
            years: Some((base, target)),
            multipliers,
            weights,
        })
    }

    pub fn is_identity(&self) -> bool {
        self.years.is_none()
    }

    pub fn base_year(&self) -> Option<i32> {
        self.years.map(|(base, _)| base)
    }

    pub fn target_year(&self) -> Option<i32> {
        self.years.map(|(_, target)| target)
    }

    pub fn multipliers(&self) -> &[GroupMultiplier] {
        &self.multipliers
    }

    /// Returns an uprated copy of `frame`.
    pub fn apply(&self, frame: &EntityFrame) -> Result<EntityFrame> {
        let mut data = frame.data.clone();
        let Some((base, target)) = self.years else {
            return Ok(EntityFrame { data, ..frame.clone() });
        };
        let lookup = ColumnLookup::new(frame.column_names());

        let mut scaled = 0usize;
        for multiplier in &self.multipliers {
            for variable in &multiplier.variables {
                let Some(column) = lookup.get(variable) else {
                    continue;
                };
                if EntityLevel::from_id_column(column).is_some() {
                    continue;
                }
                let values: Vec<Option<f64>> = column_f64_values(data.column(column)?)?
                    .into_iter()
                    .map(|value| value.map(|v| v * multiplier.factor))
                    .collect();
                data.with_column(Series::new(column.into(), values).into_column())?;
                scaled += 1;
            }
        }

        if let Some(weights) = &self.weights
            && let Some(column) = lookup.get(&weights.column)
        {
            let factors = weights.row_factors(&data, &lookup, base, target)?;
            let values: Vec<Option<f64>> = column_f64_values(data.column(column)?)?
                .into_iter()
                .zip(factors)
                .map(|(value, factor)| value.map(|v| v * factor))
                .collect();
            data.with_column(Series::new(column.into(), values).into_column())?;
        }

        debug!(table = %frame.name, base, target, scaled, "uprated table");
        Ok(EntityFrame { data, ..frame.clone() })
    }
}

impl WeightProjection {
    /// Per-row weight factor: the age band's population ratio when an age is
    /// known, the total ratio otherwise.
    fn row_factors(
        &self,
        data: &DataFrame,
        lookup: &ColumnLookup,
        base: i32,
        target: i32,
    ) -> Result<Vec<f64>> {
        let candidates: Vec<&str> = self.age_columns.iter().map(String::as_str).collect();
        let Some(age_column) = lookup.first_of(&candidates) else {
            return Ok(vec![self.total_ratio; data.height()]);
        };
        let factors = column_f64_values(data.column(age_column)?)?
            .into_iter()
            .map(|age| {
                age.and_then(|age| self.projection.band_for_age(age))
                    .and_then(|band| {
                        let from = self.projection.population(band, base)?;
                        let to = self.projection.population(band, target)?;
                        (from > 0.0).then_some(to / from)
                    })
                    .unwrap_or(self.total_ratio)
            })
            .collect();
        Ok(factors)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use frs_model::VariableGroup;

    use super::*;

    fn parameters() -> UpratingParameters {
        let mut groups = BTreeMap::new();
        groups.insert(
            "labour_income".to_string(),
            VariableGroup {
                variables: vec!["inearns".to_string()],
                index: BTreeMap::from([(2020, 1.0), (2021, 1.05)]),
            },
        );
        UpratingParameters {
            groups,
            ..UpratingParameters::default()
        }
    }

    fn adult() -> EntityFrame {
        let data = DataFrame::new(vec![
            Series::new("person_id".into(), vec![101i64, 102]).into_column(),
            Series::new("INEARNS".into(), vec![Some(1000.0f64), None]).into_column(),
            Series::new("AGE80".into(), vec![Some(7i64), None]).into_column(),
            Series::new("GROSS4".into(), vec![100.0f64, 100.0]).into_column(),
        ])
        .unwrap();
        EntityFrame::new("adult", EntityLevel::Person, data).unwrap()
    }

    fn values(frame: &EntityFrame, column: &str) -> Vec<Option<f64>> {
        column_f64_values(frame.data.column(column).unwrap()).unwrap()
    }

    #[test]
    fn scales_group_members_case_insensitively() {
        let uprater = Uprater::new(&parameters(), 2020, 2021).unwrap();
        let out = uprater.apply(&adult()).unwrap();
        assert_eq!(values(&out, "INEARNS"), vec![Some(1050.0), None]);
        assert_eq!(values(&out, "GROSS4"), vec![Some(100.0), Some(100.0)]);
    }

    #[test]
    fn equal_years_are_identity() {
        let uprater = Uprater::new(&parameters(), 2020, 2020).unwrap();
        assert!(uprater.is_identity());
        let out = uprater.apply(&adult()).unwrap();
        assert!(out.data.equals_missing(&adult().data));
    }

    #[test]
    fn equal_years_keep_weights_with_projection() {
        let mut projection = PopulationProjection::default();
        projection.insert(0, 2020, 100.0);
        projection.insert(5, 2020, 150.0);
        let parameters = UpratingParameters {
            projection: Some(projection),
            ..parameters()
        };
        let uprater = Uprater::new(&parameters, 2020, 2020).unwrap();
        assert!(uprater.is_identity());
        let out = uprater.apply(&adult()).unwrap();
        assert!(out.data.equals_missing(&adult().data));
        assert_eq!(values(&out, "GROSS4"), vec![Some(100.0), Some(100.0)]);
    }

    #[test]
    fn missing_index_year_is_a_configuration_error() {
        let err = Uprater::new(&parameters(), 2020, 2022).unwrap_err();
        assert!(matches!(err, TransformError::Configuration { .. }));
    }

    #[test]
    fn weights_follow_age_band_then_total() {
        let mut projection = PopulationProjection::default();
        projection.insert(0, 2020, 100.0);
        projection.insert(0, 2021, 100.0);
        projection.insert(5, 2020, 100.0);
        projection.insert(5, 2021, 120.0);
        let parameters = UpratingParameters {
            projection: Some(projection),
            ..parameters()
        };
        let uprater = Uprater::new(&parameters, 2020, 2021).unwrap();
        let out = uprater.apply(&adult()).unwrap();
        // Age 7 uses band 5 (1.2); missing age uses the total (220 / 200).
        let weights = values(&out, "GROSS4");
        assert!((weights[0].unwrap() - 120.0).abs() < 1e-9);
        assert!((weights[1].unwrap() - 110.0).abs() < 1e-9);
    }

    #[test]
    fn projection_missing_year_is_rejected() {
        let mut projection = PopulationProjection::default();
        projection.insert(0, 2020, 100.0);
        let parameters = UpratingParameters {
            projection: Some(projection),
            ..parameters()
        };
        assert!(Uprater::new(&parameters, 2020, 2021).is_err());
    }
}
