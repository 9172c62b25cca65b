//! Strict quote checking for CSV input.
//!
//! The `csv` reader accepts stray and unbalanced quotes. [`StrictQuotes`]
//! sits between the byte source and the reader and rejects them:
//!
//! - a `"` inside a field that did not start with a quote,
//! - anything other than `"`, `,` or a line break after a closing quote,
//! - a quoted field that is still open at end of input.
//!
//! Bytes before the offending one are still handed to the reader, so every
//! complete record ahead of the error is converted before it surfaces.

use std::{
    fmt,
    io::{self, Read}
};

use super::UTF8_BOM;

/// Kind of quoting violation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteErrorKind {
    BareQuote,
    ExtraneousQuote,
    UnterminatedQuote
}

/// Quoting violation with its position in the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteError {
    pub kind: QuoteErrorKind,
    /// 1-based line number
    pub line: u64,
    /// 0-based byte offset from the start of input
    pub byte: u64
}

impl fmt::Display for QuoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.kind {
            QuoteErrorKind::BareQuote => "bare \" in non-quoted field",
            QuoteErrorKind::ExtraneousQuote => "extraneous or missing \" in quoted field",
            QuoteErrorKind::UnterminatedQuote => "quoted field is never closed"
        };
        write!(f, "{} (line: {}, byte: {})", what, self.line, self.byte)
    }
}

impl std::error::Error for QuoteError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    FieldStart,
    Unquoted,
    Quoted,
    ClosingQuote,
    ClosingQuoteCr
}

/// Reader adapter that fails on malformed quoting
///
/// Violations are reported as [`io::ErrorKind::InvalidData`] wrapping a
/// [`QuoteError`].
#[derive(Debug)]
pub struct StrictQuotes<R> {
    inner:   R,
    state:   State,
    line:    u64,
    byte:    u64,
    bom:     u64,
    open_at: (u64, u64),
    pending: Option<QuoteError>
}

impl<R: Read> StrictQuotes<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            state: State::FieldStart,
            line: 1,
            byte: 0,
            bom: 0,
            open_at: (1, 0),
            pending: None
        }
    }

    fn step(&mut self, b: u8) -> Result<(), QuoteErrorKind> {
        self.state = match (self.state, b) {
            (State::FieldStart, b'"') => {
                self.open_at = (self.line, self.byte);
                State::Quoted
            }
            (State::FieldStart | State::Unquoted, b',' | b'\n') => State::FieldStart,
            (State::Unquoted, b'"') => return Err(QuoteErrorKind::BareQuote),
            (State::FieldStart | State::Unquoted, _) => State::Unquoted,
            (State::Quoted, b'"') => State::ClosingQuote,
            (State::Quoted, _) => State::Quoted,
            (State::ClosingQuote, b'"') => State::Quoted,
            (State::ClosingQuote, b',' | b'\n') => State::FieldStart,
            (State::ClosingQuote, b'\r') => State::ClosingQuoteCr,
            (State::ClosingQuoteCr, b'\n') => State::FieldStart,
            (State::ClosingQuote | State::ClosingQuoteCr, _) => {
                return Err(QuoteErrorKind::ExtraneousQuote);
            }
        };
        Ok(())
    }

    /// Leading byte-order mark bytes do not start a field
    fn skips_bom(&mut self, b: u8) -> bool {
        if self.byte < UTF8_BOM.len() as u64
            && self.bom == self.byte
            && b == UTF8_BOM[self.byte as usize]
        {
            self.bom += 1;
            return true;
        }
        false
    }
}

impl<R: Read> Read for StrictQuotes<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if let Some(err) = self.pending.take() {
            return Err(invalid_data(err));
        }

        let n = self.inner.read(buf)?;
        if n == 0 {
            if self.state == State::Quoted {
                let (line, byte) = self.open_at;
                self.state = State::FieldStart;
                return Err(invalid_data(QuoteError {
                    kind: QuoteErrorKind::UnterminatedQuote,
                    line,
                    byte
                }));
            }
            return Ok(0);
        }

        for (i, &b) in buf[..n].iter().enumerate() {
            if !self.skips_bom(b)
                && let Err(kind) = self.step(b)
            {
                let err = QuoteError {
                    kind,
                    line: self.line,
                    byte: self.byte
                };
                if i == 0 {
                    return Err(invalid_data(err));
                }
                self.pending = Some(err);
                return Ok(i);
            }
            if b == b'\n' {
                self.line += 1;
            }
            self.byte += 1;
        }
        Ok(n)
    }
}

fn invalid_data(err: QuoteError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, err)
}
