//! CSV to SQL conversion.
//!
//! A CSV document is turned into a `CREATE TABLE` statement, derived from
//! the header record, followed by a single multi-row `INSERT` holding every
//! remaining record:
//!
//! ```text
//! CREATE TABLE `people` (
//!     `name` TEXT,
//!     `age` TEXT
//! );
//! INSERT INTO `people` VALUES
//! ("Alice", "30"),
//! ("Bob", "25");
//! ```
//!
//! Every column is declared `TEXT`. Records are read one at a time and
//! written as soon as they are formatted, so memory use does not grow with
//! the number of rows. Records wider than the header are truncated and
//! narrower ones are padded with empty strings.
//!
//! Quoting is checked strictly (see [`StrictQuotes`]), `\r\n` inside a
//! field is read as `\n`, and a leading UTF-8 byte-order mark is dropped
//! from the first column name.

mod quote;
mod strict;
mod types;

use std::{
    borrow::Cow,
    cmp::Ordering,
    io::{Read, Write}
};

use csv::{ByteRecord, ReaderBuilder};
pub use quote::{quote_identifier, quote_string};
pub use strict::{QuoteError, QuoteErrorKind, StrictQuotes};
use tracing::{debug, trace};
pub use types::ConvertStats;

use crate::error::{AppResult, csv_error, empty_input_error, write_error};

pub(crate) const UTF8_BOM: &[u8; 3] = b"\xef\xbb\xbf";

/// Convert CSV from `input` into a SQL script written to `output`
///
/// # Errors
///
/// Fails when the input has no header record, when the CSV is malformed,
/// or when reading or writing fails. Output written before the failure is
/// left on the sink.
pub fn convert<R: Read, W: Write>(table_name: &str, input: R, output: W) -> AppResult<()> {
    Converter::new(table_name).run(input, output).map(|_| ())
}

/// Single-pass CSV to SQL converter for one table
#[derive(Debug, Clone)]
pub struct Converter {
    table:        String,
    quoted_table: Vec<u8>
}

impl Converter {
    pub fn new(table_name: &str) -> Self {
        let mut quoted_table = Vec::with_capacity(table_name.len() + 2);
        quote_identifier(&mut quoted_table, table_name.as_bytes());
        Self {
            table: table_name.to_string(),
            quoted_table
        }
    }

    /// Table name as given, before quoting
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Run the conversion and report what was written
    pub fn run<R: Read, W: Write>(&self, input: R, mut output: W) -> AppResult<ConvertStats> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(StrictQuotes::new(input));
        let mut record = ByteRecord::new();

        if !reader.read_byte_record(&mut record).map_err(csv_error)? {
            return Err(empty_input_error());
        }
        let width = record.len();
        debug!(table = %self.table, columns = width, "parsed header");

        output
            .write_all(&self.create_table(&record))
            .map_err(write_error)?;

        let mut stats = ConvertStats::new(&self.table, width);
        let mut line = Vec::new();
        while reader.read_byte_record(&mut record).map_err(csv_error)? {
            line.clear();
            if stats.has_rows() {
                line.extend_from_slice(b",\n");
            } else {
                line.extend_from_slice(b"INSERT INTO ");
                line.extend_from_slice(&self.quoted_table);
                line.extend_from_slice(b" VALUES\n");
            }

            match record.len().cmp(&width) {
                Ordering::Greater => {
                    trace!(row = stats.rows + 1, fields = record.len(), "truncating row");
                    stats.truncated_rows += 1;
                }
                Ordering::Less => {
                    trace!(row = stats.rows + 1, fields = record.len(), "padding row");
                    stats.padded_rows += 1;
                }
                Ordering::Equal => {}
            }
            push_tuple(&mut line, &record, width);

            output.write_all(&line).map_err(write_error)?;
            stats.rows += 1;
        }

        output.write_all(b";\n").map_err(write_error)?;
        debug!(
            table = %self.table,
            rows = stats.rows,
            padded = stats.padded_rows,
            truncated = stats.truncated_rows,
            "conversion finished"
        );
        Ok(stats)
    }

    fn create_table(&self, header: &ByteRecord) -> Vec<u8> {
        let mut sql = Vec::new();
        sql.extend_from_slice(b"CREATE TABLE ");
        sql.extend_from_slice(&self.quoted_table);
        sql.extend_from_slice(b" (\n");
        for (i, column) in header.iter().enumerate() {
            let column = if i == 0 {
                sql.extend_from_slice(b"    ");
                column.strip_prefix(UTF8_BOM).unwrap_or(column)
            } else {
                sql.extend_from_slice(b",\n    ");
                column
            };
            quote_identifier(&mut sql, &normalize_line_breaks(column));
            sql.extend_from_slice(b" TEXT");
        }
        sql.extend_from_slice(b"\n);\n");
        sql
    }
}

/// Append `(v1, v2, ..., vN)`, reading missing fields as empty strings
fn push_tuple(buf: &mut Vec<u8>, record: &ByteRecord, width: usize) {
    buf.push(b'(');
    for i in 0..width {
        if i > 0 {
            buf.extend_from_slice(b", ");
        }
        quote_string(
            buf,
            &normalize_line_breaks(record.get(i).unwrap_or_default())
        );
    }
    buf.push(b')');
}

/// Read `\r\n` inside a field as `\n`; a lone `\r` is kept
fn normalize_line_breaks(field: &[u8]) -> Cow<'_, [u8]> {
    if !field.windows(2).any(|pair| pair == b"\r\n") {
        return Cow::Borrowed(field);
    }
    let mut out = Vec::with_capacity(field.len());
    let mut bytes = field.iter().peekable();
    while let Some(&b) = bytes.next() {
        if b == b'\r' && bytes.peek() == Some(&&b'\n') {
            continue;
        }
        out.push(b);
    }
    Cow::Owned(out)
}
