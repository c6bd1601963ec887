//! CLI argument definitions for `sibtools`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "sibtools",
    version,
    about = "Move records between CSV files and the SIB publicWFS",
    long_about = "Move records between CSV files and the SIB publicWFS.\n\n\
                  Connection settings are read from sibtools.toml ([wfs] url, username,\n\
                  password) and can be overridden with --url, --username and --password."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub connection: ConnectionArgs,

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
}

#[derive(Args)]
pub struct ConnectionArgs {
    /// Config file (default: ./sibtools.toml if present).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// URL of the publicWFS.
    #[arg(long = "url", global = true)]
    pub url: Option<String>,

    #[arg(long = "username", global = true)]
    pub username: Option<String>,

    #[arg(long = "password", global = true)]
    pub password: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the feature types the publicWFS offers.
    FeatureTypes,

    /// Show the fields of a feature type.
    Describe {
        #[arg(value_name = "TYPE")]
        feature_type: String,
    },

    /// Compile a filter expression and print its XML.
    ///
    /// With --type, field names are checked against the feature type and
    /// lookup fields address their short code.
    Filter {
        #[arg(value_name = "EXPR")]
        expression: String,

        #[arg(long = "type", value_name = "TYPE")]
        feature_type: Option<String>,
    },

    /// Read features, into a CSV file or as a table.
    Export(ExportArgs),

    /// Insert the records of a CSV file as features.
    Import(ImportArgs),

    /// Show the lookup record for a short code.
    Lookup {
        #[arg(value_name = "TYPE")]
        lookup_type: String,

        #[arg(value_name = "CODE")]
        code: String,
    },

    /// Send a request document unchecked and print the response.
    Raw {
        /// File holding the request document.
        #[arg(value_name = "FILE")]
        request: PathBuf,

        /// Confirm that the request may change or delete data.
        #[arg(long = "yes")]
        yes: bool,
    },
}

#[derive(Args)]
pub struct ExportArgs {
    #[arg(value_name = "TYPE")]
    pub feature_type: String,

    /// Filter expression, e.g. UND(GLEICH(vnk, "123456789"), GROESSER(bst, "5")).
    #[arg(long = "filter", value_name = "EXPR")]
    pub filter: Option<String>,

    /// Also export href, typeName and luk of lookup fields.
    #[arg(long = "full")]
    pub full: bool,

    /// Append every column of the referenced lookup records.
    #[arg(long = "attach-lookups")]
    pub attach_lookups: bool,

    /// CSV file to write; without it records are shown as a table.
    #[arg(long = "output", short = 'o', value_name = "CSV")]
    pub output: Option<PathBuf>,

    /// Records shown when no output file is given.
    #[arg(long = "limit", default_value_t = 20)]
    pub limit: usize,
}

#[derive(Args)]
pub struct ImportArgs {
    #[arg(value_name = "TYPE")]
    pub feature_type: String,

    #[arg(long = "input", short = 'i', value_name = "CSV")]
    pub input: PathBuf,

    /// Rename a column, OLD=NEW.
    #[arg(long = "rename", value_name = "OLD=NEW", value_parser = parse_pair)]
    pub rename: Vec<(String, String)>,

    /// Drop a column.
    #[arg(long = "remove", value_name = "COLUMN")]
    pub remove: Vec<String>,

    /// Add a column with a constant value, COLUMN=VALUE.
    #[arg(long = "add", value_name = "COLUMN=VALUE", value_parser = parse_pair)]
    pub add: Vec<(String, String)>,

    /// Column holding the start network node, split into vtkNummer/vnkLfd/vzusatz.
    #[arg(long = "from-node", value_name = "COLUMN")]
    pub from_node: Option<String>,

    /// Column holding the end network node, split into ntkNummer/nnkLfd/nzusatz.
    #[arg(long = "to-node", value_name = "COLUMN")]
    pub to_node: Option<String>,

    /// Show the transformed records instead of sending them.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Records shown with --dry-run.
    #[arg(long = "limit", default_value_t = 20)]
    pub limit: usize,
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

fn parse_pair(value: &str) -> Result<(String, String), String> {
    match value.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{value}'")),
    }
}
