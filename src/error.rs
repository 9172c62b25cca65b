pub use masterror::{AppError, AppErrorKind, AppResult};

use crate::convert::QuoteError;

/// User-facing text of an error: its message, or the kind label when unset
pub fn error_message(err: &AppError) -> String {
    match err.message.as_deref() {
        Some(message) => message.to_string(),
        None => err.to_string()
    }
}

/// Create file read error
pub fn file_read_error(path: &str, source: std::io::Error) -> AppError {
    AppError::internal(format!("Failed to open file '{}': {}", path, source))
}

/// Create file create error
pub fn file_create_error(path: &str, source: std::io::Error) -> AppError {
    AppError::internal(format!("Failed to create file '{}': {}", path, source))
}

/// Create input stream read error
pub fn read_error(source: impl std::fmt::Display) -> AppError {
    AppError::internal(format!("Failed to read CSV input: {}", source))
}

/// Create output stream write error
pub fn write_error(source: std::io::Error) -> AppError {
    AppError::internal(format!("Failed to write SQL output: {}", source))
}

/// Create CSV parse error with optional position info
pub fn csv_parse_error(message: impl Into<String>) -> AppError {
    let msg = message.into();
    AppError::bad_request(format_csv_error("CSV parse error", &msg))
}

/// Create error for input without a header record
pub fn empty_input_error() -> AppError {
    AppError::bad_request("CSV parse error: no header record found (input is empty)")
}

/// Create config error
pub fn config_error(message: impl Into<String>) -> AppError {
    AppError::bad_request(message.into())
}

/// Classify a CSV reader error as either an I/O failure or malformed input
pub fn csv_error(err: csv::Error) -> AppError {
    if !err.is_io_error() {
        return csv_parse_error(err.to_string());
    }
    let fallback = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(source) => input_error(source),
        _ => read_error(fallback)
    }
}

/// Quoting violations reach the reader as I/O errors; report them as parse errors
fn input_error(source: std::io::Error) -> AppError {
    let quote = source
        .get_ref()
        .and_then(|inner| inner.downcast_ref::<QuoteError>())
        .map(ToString::to_string);
    match quote {
        Some(message) => csv_parse_error(message),
        None => read_error(source)
    }
}

/// Format CSV error with position highlighting
fn format_csv_error(prefix: &str, message: &str) -> String {
    // csv format: "... (line: X, byte: Y): ..."
    if let Some(pos) = extract_position(message) {
        format!(
            "{} at line {}, byte {}:\n  {}",
            prefix, pos.line, pos.byte, message
        )
    } else {
        format!("{}:\n  {}", prefix, message)
    }
}

struct CsvPosition {
    line: u64,
    byte: u64
}

fn extract_position(message: &str) -> Option<CsvPosition> {
    let line_marker = "line: ";
    let byte_marker = ", byte: ";

    let line_start = message.find(line_marker)? + line_marker.len();
    let byte_offset = message[line_start..].find(byte_marker)?;
    let line_str = &message[line_start..line_start + byte_offset];

    let byte_start = line_start + byte_offset + byte_marker.len();
    let byte_end = message[byte_start..]
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(message.len() - byte_start);
    let byte_str = &message[byte_start..byte_start + byte_end];

    match (line_str.parse(), byte_str.parse()) {
        (Ok(line), Ok(byte)) => Some(CsvPosition { line, byte }),
        _ => None
    }
}
