//! # csv2sql Library
//!
//! Conversion of CSV data into a `CREATE TABLE` statement and a multi-row
//! `INSERT`.
//!
//! ```
//! let csv = "name,age\nAlice,30\nBob,25\n";
//! let mut sql = Vec::new();
//! csv2sql::convert("people", csv.as_bytes(), &mut sql).unwrap();
//! assert!(String::from_utf8(sql).unwrap().ends_with("(\"Bob\", \"25\");\n"));
//! ```

pub mod app;
pub mod cli;
pub mod config;
pub mod convert;
pub mod error;
pub mod output;

pub use convert::{ConvertStats, Converter, convert};
