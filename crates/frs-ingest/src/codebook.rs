//! Codebook JSON loading.
//!
//! The codebook is a JSON object keyed by variable name:
//!
//! ```json
//! { "SEX": { "description": "Sex of adult", "codemap": { "1": "Male", "2": "Female" } } }
//! ```
//!
//! Codemap labels written as numbers or booleans are stringified. Missing
//! `description` or `codemap` keys are allowed.

use std::path::Path;

use serde_json::Value;

use frs_model::{Codebook, VariableMetadata};

use crate::error::{IngestError, Result};

/// Load a codebook from a JSON file.
pub fn load_codebook(path: &Path) -> Result<Codebook> {
    if !path.is_file() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let text = std::fs::read_to_string(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_codebook(&text, path)
}

/// Parse codebook JSON; `origin` is used for error messages only.
pub fn parse_codebook(text: &str, origin: &Path) -> Result<Codebook> {
    let format_error = |reason: String| IngestError::MetadataFormat {
        path: origin.to_path_buf(),
        reason,
    };
    let root: Value = serde_json::from_str(text).map_err(|e| format_error(e.to_string()))?;
    let Value::Object(entries) = root else {
        return Err(format_error("expected a JSON object at the top level".to_string()));
    };

    let mut codebook = Codebook::default();
    for (name, entry) in entries {
        let Value::Object(fields) = entry else {
            return Err(format_error(format!("entry for '{name}' is not an object")));
        };
        let mut metadata = VariableMetadata::default();
        match fields.get("description") {
            None | Some(Value::Null) => {}
            Some(Value::String(text)) => metadata.description = Some(text.clone()),
            Some(other) => {
                return Err(format_error(format!(
                    "description for '{name}' is not a string: {other}"
                )));
            }
        }
        match fields.get("codemap") {
            None | Some(Value::Null) => {}
            Some(Value::Object(codes)) => {
                for (code, label) in codes {
                    let Some(label) = scalar_text(label) else {
                        return Err(format_error(format!(
                            "label for code '{code}' of '{name}' is not a scalar"
                        )));
                    };
                    metadata.insert_code(code, &label);
                }
            }
            Some(_) => {
                return Err(format_error(format!("codemap for '{name}' is not an object")));
            }
        }
        codebook.insert(name, metadata);
    }
    Ok(codebook)
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}
