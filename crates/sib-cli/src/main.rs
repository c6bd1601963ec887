//! sibtools CLI.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use sib_cli::logging::{LogConfig, LogFormat, init_logging};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{
    run_describe, run_export, run_feature_types, run_filter, run_import, run_lookup, run_raw,
};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }

    let connection = &cli.connection;
    let result = match &cli.command {
        Command::FeatureTypes => run_feature_types(connection).map(|()| true),
        Command::Describe { feature_type } => run_describe(connection, feature_type).map(|()| true),
        Command::Filter {
            expression,
            feature_type,
        } => run_filter(connection, expression, feature_type.as_deref()).map(|()| true),
        Command::Export(args) => run_export(connection, args).map(|()| true),
        Command::Import(args) => run_import(connection, args),
        Command::Lookup { lookup_type, code } => {
            run_lookup(connection, lookup_type, code).map(|()| true)
        }
        Command::Raw { request, yes } => run_raw(connection, request, *yes).map(|()| true),
    };

    let exit_code = match result {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
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
