//! Variable codebook models.
//!
//! A codebook maps each variable name to a human-readable description and,
//! for coded variables, a mapping from code values to labels.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Description reported for variables the codebook does not describe.
pub const NO_DESCRIPTION: &str = "No description provided";

/// Metadata for a single survey variable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariableMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Code value to label.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub codemap: BTreeMap<String, String>,
}

impl VariableMetadata {
    pub fn with_description(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            codemap: BTreeMap::new(),
        }
    }

    pub fn description_or_default(&self) -> &str {
        self.description
            .as_deref()
            .filter(|text| !text.trim().is_empty())
            .unwrap_or(NO_DESCRIPTION)
    }

    pub fn insert_code(&mut self, code_value: &str, label: &str) {
        let code = code_value.trim();
        let label = label.trim();
        if code.is_empty() || label.is_empty() {
            return;
        }
        self.codemap.insert(code.to_string(), label.to_string());
    }

    /// Looks up the label for a coded value.
    ///
    /// Tries the code as written, then case-insensitively, then as a number
    /// so that `"1"`, `"1.0"` and `" 1 "` all resolve to the same entry.
    pub fn label(&self, raw: &str) -> Option<&str> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        if let Some(label) = self.codemap.get(trimmed) {
            return Some(label.as_str());
        }
        if let Some((_, label)) = self
            .codemap
            .iter()
            .find(|(code, _)| code.eq_ignore_ascii_case(trimmed))
        {
            return Some(label.as_str());
        }
        let key = normalize_numeric_key(trimmed)?;
        self.codemap
            .iter()
            .find(|(code, _)| normalize_numeric_key(code).as_deref() == Some(key.as_str()))
            .map(|(_, label)| label.as_str())
    }

    pub fn category_count(&self) -> usize {
        self.codemap.len()
    }
}

/// Variable metadata keyed by variable name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Codebook {
    variables: BTreeMap<String, VariableMetadata>,
}

impl Codebook {
    pub fn insert(&mut self, name: impl Into<String>, metadata: VariableMetadata) {
        self.variables.insert(name.into(), metadata);
    }

    /// Exact lookup first, then case-insensitive.
    pub fn get(&self, name: &str) -> Option<&VariableMetadata> {
        self.variables.get(name).or_else(|| {
            self.variables
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, metadata)| metadata)
        })
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &VariableMetadata)> {
        self.variables.iter()
    }
}

fn normalize_numeric_key(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    let parsed = trimmed.parse::<f64>().ok()?;
    let mut text = format!("{parsed}");
    if text.contains('.') {
        while text.ends_with('0') {
            text.pop();
        }
        if text.ends_with('.') {
            text.pop();
        }
    }
    if text.is_empty() { None } else { Some(text) }
}
