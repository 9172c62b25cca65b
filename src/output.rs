use colored::Colorize;
use serde::Deserialize;

use crate::convert::ConvertStats;

/// Output format for the conversion summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
    Yaml
}

/// Report options
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub format:  ReportFormat,
    pub colored: bool
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            format:  ReportFormat::Text,
            colored: true
        }
    }
}

/// Format conversion summary based on report options
pub fn format_stats(stats: &ConvertStats, opts: &ReportOptions) -> String {
    match opts.format {
        ReportFormat::Json => serde_json::to_string_pretty(stats).unwrap_or_default(),
        ReportFormat::Yaml => serde_yaml::to_string(stats).unwrap_or_default(),
        ReportFormat::Text => format_text_stats(stats, opts)
    }
}

fn format_text_stats(stats: &ConvertStats, opts: &ReportOptions) -> String {
    let header = format!("=== csv2sql: `{}` ===", stats.table);
    let mut output = if opts.colored {
        header.bold().to_string()
    } else {
        header
    };
    output.push('\n');

    output.push_str(&format!("Columns: {}\n", stats.columns));
    output.push_str(&format!("Rows: {}\n", stats.rows));

    for (label, count) in [
        ("Padded rows", stats.padded_rows),
        ("Truncated rows", stats.truncated_rows)
    ] {
        let value = if opts.colored && count > 0 {
            count.to_string().yellow().to_string()
        } else {
            count.to_string()
        };
        output.push_str(&format!("{}: {}\n", label, value));
    }

    if !stats.has_rows() {
        let note = "Note: no data rows, INSERT statement omitted";
        if opts.colored {
            output.push_str(&note.dimmed().to_string());
        } else {
            output.push_str(note);
        }
        output.push('\n');
    }

    output
}
