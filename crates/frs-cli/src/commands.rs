//! Command implementations. Each returns data for `summary` to print.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, info_span};

use frs_core::{
    Frs, FrsStore, SaveOptions, SaveSummary, codebook_for, describe_variable, save_release,
};
use frs_ingest::load_uprating_parameters;
use frs_model::{EntityLevel, VariableMetadata};
use frs_transform::{EntityFrame, consolidate};

/// A stored year and how many tables it holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearListing {
    pub year: i32,
    pub tables: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableListing {
    pub name: String,
    pub level: EntityLevel,
    pub rows: usize,
    pub columns: usize,
}

#[derive(Debug, Clone)]
pub struct ShowResult {
    pub frame: EntityFrame,
    pub year: i32,
    pub base_year: i32,
    pub uprated: bool,
}

#[derive(Debug, Clone)]
pub struct VariableListing {
    pub summary: String,
    pub metadata: Option<VariableMetadata>,
}

/// Options for [`run_show`] beyond table and year.
#[derive(Debug, Clone, Default)]
pub struct ShowOptions<'a> {
    pub uprating: Option<&'a Path>,
    pub max_count: Option<usize>,
    pub count_label: Option<&'a str>,
}

pub fn run_save(
    store: &Path,
    source: &Path,
    year: i32,
    options: &SaveOptions,
) -> Result<SaveSummary> {
    let span = info_span!("save", year);
    let _guard = span.enter();
    let store = FrsStore::new(store);
    save_release(&store, source, year, options)
        .with_context(|| format!("save {} as {year}", source.display()))
}

pub fn run_years(store: &Path) -> Result<Vec<YearListing>> {
    let store = FrsStore::new(store);
    let mut listings = Vec::new();
    for year in store.years().context("list stored years")? {
        let tables = store
            .table_names(year)
            .with_context(|| format!("list tables for {year}"))?
            .len();
        listings.push(YearListing { year, tables });
    }
    Ok(listings)
}

pub fn run_tables(store: &Path, year: i32) -> Result<Vec<TableListing>> {
    let store = FrsStore::new(store);
    let names = store
        .table_names(year)
        .with_context(|| format!("list tables for {year}"))?;
    let mut listings = Vec::with_capacity(names.len());
    for name in names {
        let frame = store
            .read_table(year, &name)
            .with_context(|| format!("read table {name}"))?;
        listings.push(TableListing {
            level: frame.level,
            rows: frame.record_count(),
            columns: frame.data.width(),
            name,
        });
    }
    Ok(listings)
}

pub fn run_show(store: &Path, table: &str, year: i32, options: &ShowOptions<'_>) -> Result<ShowResult> {
    let span = info_span!("show", table, year);
    let _guard = span.enter();
    let parameters = options
        .uprating
        .map(|path| {
            load_uprating_parameters(path)
                .with_context(|| format!("load uprating parameters from {}", path.display()))
        })
        .transpose()?;
    let mut frs = Frs::open(FrsStore::new(store), year, parameters.as_ref())
        .with_context(|| format!("open FRS for {year}"))?;
    let mut frame = frs
        .table(table)
        .with_context(|| format!("load table {table}"))?
        .clone();
    if let Some(max_count) = options.max_count {
        frame = consolidate(&frame, max_count, options.count_label)
            .with_context(|| format!("reshape {table}"))?;
    }
    info!(rows = frame.record_count(), uprated = frs.is_uprated(), "loaded table");
    Ok(ShowResult {
        frame,
        year: frs.year(),
        base_year: frs.base_year(),
        uprated: frs.is_uprated(),
    })
}

pub fn run_describe(store: &Path, variable: &str, year: i32) -> Result<VariableListing> {
    let codebook = codebook_for(&FrsStore::new(store), year)
        .with_context(|| format!("load codebook for {year}"))?;
    Ok(VariableListing {
        summary: describe_variable(&codebook, variable),
        metadata: codebook.get(variable).cloned(),
    })
}
