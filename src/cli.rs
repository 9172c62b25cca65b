use std::{ffi::OsString, path::PathBuf};

use clap::{Parser, ValueEnum};

/// csv2sql - Convert CSV data into SQL CREATE TABLE and INSERT statements
#[derive(Parser, Debug)]
#[command(name = "csv2sql")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Name of the table to create [default: csv2sql]
    #[arg(short, long, env = "CSV2SQL_TABLE")]
    pub table: Option<String>,

    /// Input CSV file (default: stdin, or use -)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output SQL file (default: stdout, or use -)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print a conversion summary to stderr
    #[arg(long)]
    pub stats: bool,

    /// Conversion summary format
    #[arg(long, value_enum, env = "CSV2SQL_STATS_FORMAT")]
    pub stats_format: Option<Format>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Format {
    Text,
    Json,
    Yaml
}

/// Long options and whether each takes a value
const LONG_OPTIONS: &[(&str, bool)] = &[
    ("table", true),
    ("input", true),
    ("output", true),
    ("stats", false),
    ("stats-format", true),
    ("no-color", false)
];

/// Short options that take a value
const SHORT_VALUE_OPTIONS: &[&str] = &["t", "i", "o"];

impl Cli {
    /// Parse the process arguments, accepting `-table` as well as `--table`
    pub fn parse_args() -> Self {
        Self::parse_from(normalize_args(std::env::args_os()))
    }
}

/// Rewrite single-dash long options (`-table people`, `-input=in.csv`) to
/// their double-dash form
///
/// The first argument is the binary name. Option values and everything after
/// `--` are left untouched.
///
/// # Example
///
/// ```
/// use csv2sql::cli::normalize_args;
///
/// let args = normalize_args(["csv2sql", "-table=people", "-i", "-table"]);
/// assert_eq!(args, ["csv2sql", "--table=people", "-i", "-table"]);
/// ```
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>
{
    let mut args = args.into_iter().map(Into::into);
    let mut normalized: Vec<OsString> = args.next().into_iter().collect();
    let mut expects_value = false;
    let mut passthrough = false;

    for arg in args {
        if passthrough || expects_value {
            expects_value = false;
            normalized.push(arg);
            continue;
        }
        let Some(text) = arg.to_str() else {
            normalized.push(arg);
            continue;
        };
        if text == "--" {
            passthrough = true;
            normalized.push(arg);
            continue;
        }
        let Some(body) = text
            .strip_prefix("--")
            .or_else(|| text.strip_prefix('-'))
            .filter(|body| !body.is_empty())
        else {
            normalized.push(arg);
            continue;
        };

        let (name, inline_value) = match body.split_once('=') {
            Some((name, _)) => (name, true),
            None => (body, false)
        };
        match LONG_OPTIONS.iter().find(|(option, _)| *option == name) {
            Some(&(_, takes_value)) => {
                expects_value = takes_value && !inline_value;
                normalized.push(OsString::from(format!("--{}", body)));
            }
            None => {
                expects_value = !inline_value && SHORT_VALUE_OPTIONS.contains(&name);
                normalized.push(arg);
            }
        }
    }

    normalized
}
