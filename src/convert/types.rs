use compact_str::CompactString;
use serde::Serialize;

/// Summary of a single conversion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConvertStats {
    pub table:          CompactString,
    pub columns:        usize,
    pub rows:           u64,
    pub padded_rows:    u64,
    pub truncated_rows: u64
}

impl ConvertStats {
    pub fn new(table: &str, columns: usize) -> Self {
        Self {
            table: CompactString::from(table),
            columns,
            rows: 0,
            padded_rows: 0,
            truncated_rows: 0
        }
    }

    /// Whether an `INSERT` statement was emitted
    pub fn has_rows(&self) -> bool {
        self.rows > 0
    }
}
