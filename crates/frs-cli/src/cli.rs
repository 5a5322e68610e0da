//! CLI argument definitions for the `frs` tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "frs",
    version,
    about = "Family Resources Survey microdata toolkit",
    long_about = "Save Family Resources Survey releases into a local store and browse them.\n\n\
                  Tables are indexed by household, benefit unit and person identifiers.\n\
                  Years without stored data can be projected with uprating parameters."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Directory holding saved survey years.
    #[arg(long = "store", value_name = "DIR", default_value = "./frs-data", global = true)]
    pub store: PathBuf,
}

#[derive(Subcommand)]
pub enum Command {
    /// Index a downloaded release and save it under a survey year.
    Save(SaveArgs),

    /// List the survey years in the store.
    Years,

    /// List the tables saved for a year.
    Tables(YearArgs),

    /// Print the first rows of a table.
    Show(ShowArgs),

    /// Describe a variable using the year's codebook.
    Describe(DescribeArgs),
}

#[derive(Parser)]
pub struct SaveArgs {
    /// Release zip (or folder with --extracted) from the UK Data Service.
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    #[arg(long = "year")]
    pub year: i32,

    /// SOURCE is an already-extracted folder.
    #[arg(long = "extracted")]
    pub extracted: bool,

    /// Codebook JSON to store with the tables.
    #[arg(long = "codebook", value_name = "JSON")]
    pub codebook: Option<PathBuf>,
}

#[derive(Parser)]
pub struct YearArgs {
    #[arg(long = "year")]
    pub year: i32,
}

#[derive(Parser)]
pub struct ShowArgs {
    /// Table name (e.g. adult, househol, job).
    #[arg(value_name = "TABLE")]
    pub table: String,

    #[arg(long = "year")]
    pub year: i32,

    /// Number of rows to print.
    #[arg(long = "rows", default_value_t = 10)]
    pub rows: usize,

    /// Uprating parameters YAML, needed when YEAR is not stored.
    #[arg(long = "uprating", value_name = "YAML")]
    pub uprating: Option<PathBuf>,

    /// Reshape repeated rows into at most N slots per entity.
    #[arg(long = "max-count", value_name = "N")]
    pub max_count: Option<usize>,

    /// Add an occurrence count column with this name when reshaping.
    #[arg(long = "count-label", value_name = "NAME", requires = "max_count")]
    pub count_label: Option<String>,
}

#[derive(Parser)]
pub struct DescribeArgs {
    /// Variable name (e.g. SEX, TENURE).
    #[arg(value_name = "VARIABLE")]
    pub variable: String,

    #[arg(long = "year")]
    pub year: i32,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
