//! Application logic for the csv2sql CLI.
//!
//! This module contains the core application logic separated from the main
//! entry point to enable testing.

use std::{
    fmt,
    fs::File,
    io::{self, BufWriter, Read, Write},
    path::{Path, PathBuf}
};

use tracing::{debug, info};

use crate::{
    cli::{Cli, Format},
    config::Config,
    convert::{ConvertStats, Converter},
    error::{AppError, error_message, file_create_error, file_read_error, write_error},
    output::{ReportFormat, ReportOptions}
};

/// Parameters for a conversion run, after merging CLI and configuration
#[derive(Debug, Clone)]
pub struct ConvertParams {
    pub table:  String,
    pub input:  Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub report: Option<ReportOptions>
}

/// Reason a run failed, each with its own user-facing message
#[derive(Debug)]
pub enum Failure {
    EmptyTableName,
    Config(AppError),
    OpenInput(AppError),
    CreateOutput(AppError),
    Convert(AppError)
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTableName => write!(f, "Error: table name cannot be empty"),
            Self::Config(e) => write!(f, "Error loading configuration: {}", error_message(e)),
            Self::OpenInput(e) => write!(f, "Error opening input file: {}", error_message(e)),
            Self::CreateOutput(e) => {
                write!(f, "Error creating output file: {}", error_message(e))
            }
            Self::Convert(e) => write!(f, "Error converting CSV: {}", error_message(e))
        }
    }
}

/// Convert CLI format to internal ReportFormat
pub fn convert_format(format: Format) -> ReportFormat {
    match format {
        Format::Text => ReportFormat::Text,
        Format::Json => ReportFormat::Json,
        Format::Yaml => ReportFormat::Yaml
    }
}

/// Merge command-line arguments over loaded configuration
///
/// A path of `-` selects the standard stream.
pub fn resolve_params(cli: Cli, config: &Config) -> ConvertParams {
    let table = cli
        .table
        .unwrap_or_else(|| config.table_name().to_string());

    let report = (cli.stats || config.report.enabled).then(|| ReportOptions {
        format:  cli
            .stats_format
            .map(convert_format)
            .unwrap_or(config.report.format),
        colored: !cli.no_color && config.report.colored
    });

    ConvertParams {
        table,
        input: cli.input.filter(|p| !is_std_stream(p)),
        output: cli.output.filter(|p| !is_std_stream(p)),
        report
    }
}

fn is_std_stream(path: &Path) -> bool {
    path.to_str() == Some("-")
}

/// Open input and output, then run the conversion
pub fn run(params: &ConvertParams) -> Result<ConvertStats, Failure> {
    if params.table.is_empty() {
        return Err(Failure::EmptyTableName);
    }

    let input: Box<dyn Read> = match &params.input {
        Some(path) => {
            debug!(path = %path.display(), "opening input");
            let file = File::open(path)
                .map_err(|e| Failure::OpenInput(file_read_error(&path.display().to_string(), e)))?;
            Box::new(file)
        }
        None => Box::new(io::stdin().lock())
    };

    let output: Box<dyn Write> = match &params.output {
        Some(path) => {
            debug!(path = %path.display(), "creating output");
            let file = File::create(path).map_err(|e| {
                Failure::CreateOutput(file_create_error(&path.display().to_string(), e))
            })?;
            Box::new(file)
        }
        None => Box::new(io::stdout().lock())
    };

    let mut output = BufWriter::new(output);
    let stats = Converter::new(&params.table)
        .run(input, &mut output)
        .map_err(Failure::Convert)?;
    output
        .flush()
        .map_err(|e| Failure::Convert(write_error(e)))?;

    info!(table = %params.table, rows = stats.rows, "wrote SQL script");
    Ok(stats)
}

/// Load configuration, mapping failures to a run failure
pub fn load_config() -> Result<Config, Failure> {
    Config::load().map_err(Failure::Config)
}
