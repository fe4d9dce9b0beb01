//! CLI argument definitions for the SearchKit driver.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use searchkit_state::{AggregationFilter, Layout, SortOrder};

#[derive(Parser)]
#[command(
    name = "searchkit",
    version,
    about = "SearchKit - drive a search UI state from the command line",
    long_about = "Drive the SearchKit query/results state without a UI.\n\n\
                  Boots the state from a location, applies query updates,\n\
                  searches an in-memory JSON document list and prints the\n\
                  results, the resulting URL and the dispatched actions."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
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

    /// Configuration file (default: the user config directory).
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Boot from a location, apply updates and search a JSON document list.
    Run(RunArgs),

    /// Decode a location into a query state and print it as JSON.
    Url(UrlArgs),
}

#[derive(Parser)]
pub struct RunArgs {
    /// JSON file holding an array of documents.
    #[arg(long = "data", value_name = "FILE")]
    pub data: PathBuf,

    /// Location the application starts at.
    #[arg(long = "url", value_name = "LOCATION", default_value = "/")]
    pub url: String,

    /// Free-text query to type after startup.
    #[arg(long = "query", value_name = "TEXT")]
    pub query: Option<String>,

    /// Sort field to select after startup.
    #[arg(long = "sort-by", value_name = "FIELD")]
    pub sort_by: Option<String>,

    /// Sort direction to select after startup.
    #[arg(long = "sort-order", value_enum)]
    pub sort_order: Option<SortOrderArg>,

    /// Page to jump to, applied after every other update.
    #[arg(long = "page", value_name = "N")]
    pub page: Option<u32>,

    /// Results per page.
    #[arg(long = "size", value_name = "N")]
    pub size: Option<u32>,

    /// Toggle a facet filter (`field:value`, nested with `+`). Repeatable.
    #[arg(long = "filter", value_name = "FILTER")]
    pub filter: Vec<AggregationFilter>,

    /// Result layout to switch to.
    #[arg(long = "layout", value_enum)]
    pub layout: Option<LayoutArg>,

    /// Do not search when the state is loaded from the URL.
    #[arg(long = "no-search-on-init")]
    pub no_search_on_init: bool,

    /// Print every dispatched action.
    #[arg(long = "trace")]
    pub trace: bool,

    /// Print the final state as JSON instead of tables.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Parser)]
pub struct UrlArgs {
    /// Location to decode, e.g. `/search?q=higgs&p=2`.
    #[arg(long = "url", value_name = "LOCATION")]
    pub url: String,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SortOrderArg {
    Asc,
    Desc,
}

impl From<SortOrderArg> for SortOrder {
    fn from(value: SortOrderArg) -> Self {
        match value {
            SortOrderArg::Asc => SortOrder::Asc,
            SortOrderArg::Desc => SortOrder::Desc,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LayoutArg {
    List,
    Grid,
}

impl From<LayoutArg> for Layout {
    fn from(value: LayoutArg) -> Self {
        match value {
            LayoutArg::List => Layout::List,
            LayoutArg::Grid => Layout::Grid,
        }
    }
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
