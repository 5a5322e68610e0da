//! Per-year session over the store.
//!
//! An [`Frs`] is opened for a survey year. When the store holds that year
//! the tables are served as stored; otherwise the most recent stored year is
//! the base and every table is uprated to the requested year. Loaded tables
//! are cached by name for the life of the session.
//!
//! Variable metadata needs no session: [`codebook_for`] resolves the same
//! base year without uprating parameters.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use tracing::{debug, info, warn};

use frs_model::{Codebook, NO_DESCRIPTION, UpratingParameters, VariableMetadata};
use frs_transform::{EntityFrame, TransformError, Uprater, join_frames};

use crate::error::{FrsError, Result};
use crate::store::FrsStore;

/// Description length shown by [`Frs::describe`] before truncation.
const DESCRIPTION_PREVIEW: usize = 60;

#[derive(Debug)]
pub struct Frs {
    store: FrsStore,
    year: i32,
    base_year: i32,
    uprater: Uprater,
    codebook: Codebook,
    cache: HashMap<String, EntityFrame>,
}

impl Frs {
    /// Opens a session for `year`.
    ///
    /// Serving a year the store does not hold requires uprating parameters
    /// covering the latest stored year and `year`.
    pub fn open(store: FrsStore, year: i32, uprating: Option<&UpratingParameters>) -> Result<Self> {
        let base_year = base_year_for(&store, year)?;

        let uprater = if base_year == year {
            Uprater::identity()
        } else {
            let parameters = uprating.ok_or_else(|| TransformError::Configuration {
                reason: format!(
                    "no data stored for {year} and no uprating parameters to project from {base_year}"
                ),
            })?;
            Uprater::new(parameters, base_year, year)?
        };

        let codebook = read_codebook_or_empty(&store, base_year);

        info!(
            year,
            base_year,
            uprated = !uprater.is_identity(),
            variables = codebook.len(),
            "opened FRS session"
        );
        Ok(Self {
            store,
            year,
            base_year,
            uprater,
            codebook,
            cache: HashMap::new(),
        })
    }

    /// The year tables are served for.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The stored year tables are read from.
    pub fn base_year(&self) -> i32 {
        self.base_year
    }

    pub fn is_uprated(&self) -> bool {
        !self.uprater.is_identity()
    }

    pub fn codebook(&self) -> &Codebook {
        &self.codebook
    }

    pub fn table_names(&self) -> Result<Vec<String>> {
        self.store.table_names(self.base_year)
    }

    /// Returns a table for the session year, loading it on first access.
    pub fn table(&mut self, name: &str) -> Result<&EntityFrame> {
        let key = name.trim().to_ascii_lowercase();
        match self.cache.entry(key) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let stored = self.store.read_table(self.base_year, entry.key())?;
                let frame = self.uprater.apply(&stored)?;
                debug!(table = %frame.name, year = self.year, "cached table");
                Ok(entry.insert(frame))
            }
        }
    }

    /// Joins several tables on their shared key, earliest table first.
    ///
    /// Tables with repeated keys must be consolidated before joining.
    pub fn tables(&mut self, names: &[&str]) -> Result<EntityFrame> {
        let mut frames = Vec::with_capacity(names.len());
        for name in names {
            frames.push(self.table(name)?.clone());
        }
        Ok(join_frames(&frames)?)
    }

    pub fn variable(&self, name: &str) -> Option<&VariableMetadata> {
        self.codebook.get(name)
    }

    /// See [`describe_variable`].
    pub fn describe(&self, name: &str) -> String {
        describe_variable(&self.codebook, name)
    }

    /// Label for a coded value of `variable`.
    pub fn label(&self, variable: &str, code: &str) -> Option<&str> {
        self.variable(variable)?.label(code)
    }
}

/// The stored year a session for `year` reads from: `year` itself when
/// stored, the most recent stored year otherwise.
pub fn base_year_for(store: &FrsStore, year: i32) -> Result<i32> {
    if store.has_year(year) {
        return Ok(year);
    }
    store
        .latest_year()?
        .ok_or_else(|| FrsError::NoDataAvailable {
            store: store.root().to_path_buf(),
        })
}

/// Codebook for `year`, read from the same base year a session would use.
pub fn codebook_for(store: &FrsStore, year: i32) -> Result<Codebook> {
    let base_year = base_year_for(store, year)?;
    debug!(year, base_year, "resolved codebook year");
    Ok(read_codebook_or_empty(store, base_year))
}

/// One-line summary of a variable: its description (truncated) and number
/// of coded categories.
pub fn describe_variable(codebook: &Codebook, name: &str) -> String {
    let (description, categories) = match codebook.get(name) {
        Some(variable) => (variable.description_or_default(), variable.category_count()),
        None => (NO_DESCRIPTION, 0),
    };
    let preview: String = description.chars().take(DESCRIPTION_PREVIEW).collect();
    let ellipsis = if description.chars().count() > DESCRIPTION_PREVIEW {
        "..."
    } else {
        ""
    };
    format!("{name}: \"{preview}{ellipsis}\" ({categories} categories)")
}

fn read_codebook_or_empty(store: &FrsStore, year: i32) -> Codebook {
    match store.read_codebook(year) {
        Ok(codebook) => codebook.unwrap_or_default(),
        Err(err) => {
            warn!(year, error = %err, "ignoring unreadable codebook");
            Codebook::default()
        }
    }
}
