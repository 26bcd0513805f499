use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Parser)]
#[command(about, version(VERSION))]
pub struct Config {
    #[arg(
        long,
        global(true),
        value_name("LevelFilter"),
        help("Log level written to stderr"),
        default_value("warn")
    )]
    pub log: LevelFilter,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Insert loop guards into a JavaScript file
    Rewrite {
        file: PathBuf,
        #[arg(long, help("Tag prefix, defaults to the file name"))]
        prefix: Option<String>,
        #[arg(long, default_value(instrumenting::DEFAULT_HELPER))]
        helper: String,
        #[arg(short, long, help("Write to a file instead of stdout"))]
        output: Option<PathBuf>,
    },
    /// Remove loop guards from a JavaScript file
    Strip {
        file: PathBuf,
        #[arg(long, default_value(instrumenting::DEFAULT_HELPER))]
        helper: String,
        #[arg(short, long, help("Write to a file instead of stdout"))]
        output: Option<PathBuf>,
    },
    /// List the loops that would be guarded, one per line
    Sites {
        file: PathBuf,
        #[arg(long, help("Tag prefix, defaults to the file name"))]
        prefix: Option<String>,
    },
    /// Print the watchdog configuration resolved from JSON overrides
    Config { json: String },
}
