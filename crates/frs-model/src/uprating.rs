//! Uprating parameter models.
//!
//! Parameters come from a YAML document of variable groups, each carrying
//! its member variables and a yearly index, plus an optional population
//! projection used to rescale survey weights.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::entity::{AGE_COLUMNS, WEIGHT_COLUMN};

/// Width of the age bands in the population projection.
pub const AGE_BAND_WIDTH: u32 = 5;

/// A set of monetary variables sharing one uprating index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariableGroup {
    pub variables: Vec<String>,
    /// Index value per calendar year.
    #[serde(default)]
    pub index: BTreeMap<i32, f64>,
}

impl VariableGroup {
    pub fn value(&self, year: i32) -> Option<f64> {
        self.index.get(&year).copied()
    }
}

/// Uprating configuration as read from YAML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpratingParameters {
    /// Survey weight column; defaults to the household grossing weight.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_column: Option<String>,
    /// Adult age column; defaults to the first of the standard age columns present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_column: Option<String>,
    /// Population projection file, relative to the YAML document.
    #[serde(
        default,
        rename = "population",
        skip_serializing_if = "Option::is_none"
    )]
    pub population_file: Option<PathBuf>,
    #[serde(default)]
    pub groups: BTreeMap<String, VariableGroup>,
    /// Loaded projection; filled in by the loader, never serialized.
    #[serde(skip)]
    pub projection: Option<PopulationProjection>,
}

impl UpratingParameters {
    pub fn weight_column(&self) -> &str {
        self.weight_column.as_deref().unwrap_or(WEIGHT_COLUMN)
    }

    /// Age column candidates in lookup order.
    pub fn age_columns(&self) -> Vec<&str> {
        match self.age_column.as_deref() {
            Some(column) => vec![column],
            None => AGE_COLUMNS.to_vec(),
        }
    }
}

/// Projected population by five-year age band and year.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PopulationProjection {
    /// Lower age bound to (year to population).
    bands: BTreeMap<u32, BTreeMap<i32, f64>>,
}

impl PopulationProjection {
    pub fn insert(&mut self, lower_age: u32, year: i32, population: f64) {
        self.bands
            .entry(lower_age)
            .or_default()
            .insert(year, population);
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    /// True when every band carries a value for `year`.
    pub fn has_year(&self, year: i32) -> bool {
        !self.bands.is_empty() && self.bands.values().all(|years| years.contains_key(&year))
    }

    /// Maps an age to the lower bound of its tabulated band.
    ///
    /// Ages are floored to the band width; ages beyond the highest tabulated
    /// lower bound fall into the top band.
    pub fn band_for_age(&self, age: f64) -> Option<u32> {
        if !age.is_finite() || age < 0.0 {
            return None;
        }
        let band = (age as u32 / AGE_BAND_WIDTH) * AGE_BAND_WIDTH;
        self.bands.range(..=band).next_back().map(|(lower, _)| *lower)
    }

    pub fn population(&self, lower_age: u32, year: i32) -> Option<f64> {
        self.bands.get(&lower_age)?.get(&year).copied()
    }

    /// Total population across all bands for `year`.
    pub fn total(&self, year: i32) -> Option<f64> {
        self.bands
            .values()
            .map(|years| years.get(&year).copied())
            .sum()
    }
}
