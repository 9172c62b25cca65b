//! # csv2sql
//!
//! Convert a CSV document into a SQL script.
//!
//! The first CSV record names the columns of a `CREATE TABLE` statement
//! (every column is `TEXT`), and every following record becomes one tuple of
//! a single multi-row `INSERT`.
//!
//! # Quick Start
//!
//! ```bash
//! # stdin to stdout, table named `csv2sql`
//! cat people.csv | csv2sql
//!
//! # Explicit table and files
//! csv2sql --table people --input people.csv --output people.sql
//!
//! # Single-dash long options work too
//! csv2sql -table people -input people.csv
//!
//! # Summary of what was written, on stderr
//! csv2sql -t people -i people.csv --stats --stats-format json > people.sql
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded from (in order of precedence):
//!
//! 1. Command-line arguments
//! 2. Environment variables (`CSV2SQL_TABLE`, `CSV2SQL_STATS_FORMAT`)
//! 3. `.csv2sql.toml` in current directory
//! 4. `~/.config/csv2sql/config.toml`
//!
//! # Logging
//!
//! Diagnostics go to stderr and are filtered with `RUST_LOG`
//! (default `warn`), e.g. `RUST_LOG=csv2sql=debug`.
//!
//! # Exit Codes
//!
//! - `0` - Success
//! - `1` - Empty table name, unreadable input, uncreatable output, invalid
//!   configuration or conversion failure
//!
//! Failure messages are printed to stdout.

use std::process;

use clap::CommandFactory;
use csv2sql::{
    app::{Failure, load_config, resolve_params, run},
    cli::Cli,
    output::format_stats
};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse_args();

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => fail(e)
    };
    let params = resolve_params(cli, &config);

    match run(&params) {
        Ok(stats) => {
            if let Some(report) = &params.report {
                eprintln!("{}", format_stats(&stats, report));
            }
        }
        Err(e) => fail(e)
    }
}

fn fail(failure: Failure) -> ! {
    println!("{}", failure);
    if matches!(failure, Failure::EmptyTableName) {
        println!("{}", Cli::command().render_usage());
    }
    process::exit(1);
}
