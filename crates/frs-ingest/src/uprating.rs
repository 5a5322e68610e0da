//! Uprating configuration loading.
//!
//! Reads the YAML parameter document and, when it names one, the population
//! projection CSV (`age,<year>,<year>,...`, one row per five-year band).

use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use frs_common::{parse_f64, parse_i64};
use frs_model::{PopulationProjection, UpratingParameters};

use crate::error::{IngestError, Result};

/// Load uprating parameters and their population projection, if any.
///
/// A relative `population` path is resolved against the YAML file's folder.
pub fn load_uprating_parameters(path: &Path) -> Result<UpratingParameters> {
    if !path.is_file() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let text = std::fs::read_to_string(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let mut parameters = parse_uprating_parameters(&text, path)?;
    if let Some(population) = parameters.population_file.clone() {
        let resolved = if population.is_relative() {
            path.parent()
                .map(|dir| dir.join(&population))
                .unwrap_or(population)
        } else {
            population
        };
        parameters.projection = Some(load_population_projection(&resolved)?);
    }
    debug!(
        path = %path.display(),
        groups = parameters.groups.len(),
        has_population = parameters.projection.is_some(),
        "loaded uprating parameters"
    );
    Ok(parameters)
}

/// Parse uprating YAML; `origin` is used for error messages only.
pub fn parse_uprating_parameters(text: &str, origin: &Path) -> Result<UpratingParameters> {
    serde_yaml::from_str(text).map_err(|e| IngestError::MetadataFormat {
        path: origin.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Load a population projection table.
pub fn load_population_projection(path: &Path) -> Result<PopulationProjection> {
    if !path.is_file() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let format_error = |reason: String| IngestError::MetadataFormat {
        path: path.to_path_buf(),
        reason,
    };
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| format_error(e.to_string()))?;
    let headers = reader
        .headers()
        .map_err(|e| format_error(e.to_string()))?
        .clone();

    let mut years = Vec::with_capacity(headers.len().saturating_sub(1));
    for header in headers.iter().skip(1) {
        let year = parse_i64(header)
            .and_then(|year| i32::try_from(year).ok())
            .ok_or_else(|| IngestError::InvalidValue {
                field: "year".to_string(),
                value: header.to_string(),
                path: path.to_path_buf(),
            })?;
        years.push(year);
    }
    if years.is_empty() {
        return Err(format_error("no year columns".to_string()));
    }

    let mut projection = PopulationProjection::default();
    for record in reader.records() {
        let record = record.map_err(|e| format_error(e.to_string()))?;
        let raw_age = record.get(0).unwrap_or("");
        let lower_age = parse_i64(raw_age)
            .and_then(|age| u32::try_from(age).ok())
            .ok_or_else(|| IngestError::InvalidValue {
                field: "age".to_string(),
                value: raw_age.to_string(),
                path: path.to_path_buf(),
            })?;
        for (offset, year) in years.iter().enumerate() {
            let raw = record.get(offset + 1).unwrap_or("");
            let population = parse_f64(raw).ok_or_else(|| IngestError::InvalidValue {
                field: format!("population {year}"),
                value: raw.to_string(),
                path: path.to_path_buf(),
            })?;
            projection.insert(lower_age, *year, population);
        }
    }
    if projection.is_empty() {
        return Err(format_error("no age bands".to_string()));
    }
    Ok(projection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PARAMETERS: &str = "\
weight_column: GROSS4
population: population.csv
groups:
  labour_income:
    variables: [INEARNS, SEINCAM2]
    index:
      2020: 1.0
      2021: 1.05
";

    #[test]
    fn loads_parameters_with_relative_population() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("uprating.yaml"), PARAMETERS).unwrap();
        std::fs::write(
            dir.path().join("population.csv"),
            "age,2020,2021\n0,100,110\n5,200,190\n",
        )
        .unwrap();

        let parameters = load_uprating_parameters(&dir.path().join("uprating.yaml")).unwrap();

        let group = &parameters.groups["labour_income"];
        assert_eq!(group.variables, vec!["INEARNS", "SEINCAM2"]);
        assert_eq!(group.value(2021), Some(1.05));
        let projection = parameters.projection.expect("population loaded");
        assert_eq!(projection.population(5, 2021), Some(190.0));
        assert_eq!(projection.total(2020), Some(300.0));
    }

    #[test]
    fn integer_index_values_are_accepted() {
        let text = "groups:\n  rent:\n    variables: [HHRENT]\n    index: {2019: 1, 2020: 2}\n";
        let parameters = parse_uprating_parameters(text, Path::new("inline.yaml")).unwrap();
        assert_eq!(parameters.groups["rent"].value(2020), Some(2.0));
        assert!(parameters.projection.is_none());
    }

    #[test]
    fn rejects_non_numeric_population() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("population.csv");
        std::fs::write(&path, "age,2020\n0,lots\n").unwrap();
        let err = load_population_projection(&path).unwrap_err();
        assert!(matches!(err, IngestError::InvalidValue { .. }));
    }

    #[test]
    fn rejects_bad_yaml() {
        let err = parse_uprating_parameters("groups: [", Path::new("inline.yaml")).unwrap_err();
        assert!(matches!(err, IngestError::MetadataFormat { .. }));
    }
}
