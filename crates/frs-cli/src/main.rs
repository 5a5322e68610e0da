//! FRS microdata CLI.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use frs_cli::commands::{ShowOptions, run_describe, run_save, run_show, run_tables, run_years};
use frs_cli::logging::{LogConfig, LogFormat, init_logging};
use frs_core::SaveOptions;
use tracing::level_filters::LevelFilter;

mod cli;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::summary::{print_frame, print_save_summary, print_tables, print_variable, print_years};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let store = cli.store.as_path();
    let outcome = match &cli.command {
        Command::Save(args) => {
            let options = SaveOptions {
                extracted: args.extracted,
                codebook: args.codebook.clone(),
            };
            run_save(store, &args.source, args.year, &options).map(|summary| {
                print_save_summary(&summary);
            })
        }
        Command::Years => run_years(store).map(|years| print_years(&years)),
        Command::Tables(args) => {
            run_tables(store, args.year).map(|tables| print_tables(args.year, &tables))
        }
        Command::Show(args) => {
            let options = ShowOptions {
                uprating: args.uprating.as_deref(),
                max_count: args.max_count,
                count_label: args.count_label.as_deref(),
            };
            run_show(store, &args.table, args.year, &options)
                .map(|result| print_frame(&result, args.rows))
        }
        Command::Describe(args) => {
            run_describe(store, &args.variable, args.year).map(|listing| print_variable(&listing))
        }
    };
    if let Err(error) = outcome {
        eprintln!("error: {error:#}");
        std::process::exit(1);
    }
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
