//! Delimited-text row codec.
//!
//! Reading rules:
//! - lines starting with the comment marker are skipped, as are blank lines
//! - a trailing `\r` before `\n` is stripped
//! - quoted fields may contain delimiters, doubled quotes and newlines
//! - with lazy quotes, a quote inside an unquoted field, or a quote not
//!   followed by a delimiter inside a quoted field, is kept literally
//! - every row must have the field count of the first row the reader saw
//!
//! Writing quotes a field only when reading it back would otherwise change
//! it.

use std::io::{self, BufRead, BufReader, Read, Write};

use thiserror::Error;

use super::errors::RecordError;
use super::record::Record;

/// Bytes buffered by a [`RowWriter`] before they are pushed to the sink.
const WRITE_BUFFER_SIZE: usize = 64 * 1024;

/// The textual conventions of a delimited file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    pub delimiter: u8,
    pub comment: Option<u8>,
    pub lazy_quotes: bool,
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            delimiter: b',',
            comment: Some(b'#'),
            lazy_quotes: true,
        }
    }
}

/// Failure while decoding a row.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("{0}")]
    Row(#[from] RecordError),
}

/// Pulls [`Record`]s out of a byte stream, one row at a time.
pub struct RowReader<R> {
    inner: BufReader<R>,
    dialect: Dialect,
    /// Physical lines consumed so far
    line: u64,
    expected_fields: Option<usize>,
}

impl<R: Read> RowReader<R> {
    pub fn new(inner: R, dialect: Dialect) -> Self {
        Self {
            inner: BufReader::new(inner),
            dialect,
            line: 0,
            expected_fields: None,
        }
    }

    /// Pins the field count every row must have. Without it the first row
    /// read fixes the count.
    pub fn with_expected_fields(mut self, n: Option<usize>) -> Self {
        self.expected_fields = n;
        self
    }

    /// Replaces the pinned field count. `None` lets the next row fix it.
    pub fn set_expected_fields(&mut self, n: Option<usize>) {
        self.expected_fields = n;
    }

    /// Number of physical lines consumed.
    pub fn line(&self) -> u64 {
        self.line
    }

    /// Reads one physical line without its terminator. `None` at end of input.
    fn next_line(&mut self) -> io::Result<Option<Vec<u8>>> {
        let mut buf = Vec::new();
        let n = self.inner.read_until(b'\n', &mut buf)?;
        if n == 0 {
            return Ok(None);
        }
        self.line += 1;
        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        }
        Ok(Some(buf))
    }

    /// Reads the next row.
    ///
    /// Returns `Ok(None)` at end of input.
    pub fn read_row(&mut self) -> Result<Option<Record>, CodecError> {
        let line = loop {
            match self.next_line()? {
                None => return Ok(None),
                Some(l) if l.is_empty() => continue,
                Some(l) if self.dialect.comment.is_some() && l.first() == self.dialect.comment.as_ref() => continue,
                Some(l) => break l,
            }
        };
        let start_line = self.line;
        let fields = self.parse_fields(line, start_line)?;

        match self.expected_fields {
            None => self.expected_fields = Some(fields.len()),
            Some(n) if n != fields.len() => {
                return Err(RecordError::malformed_row(
                    start_line,
                    format!("wrong number of fields: expected {}, got {}", n, fields.len()),
                )
                .into());
            }
            Some(_) => {}
        }

        Ok(Some(Record::new(fields)))
    }

    fn parse_fields(&mut self, mut line: Vec<u8>, start_line: u64) -> Result<Vec<String>, CodecError> {
        let delim = self.dialect.delimiter;
        let lazy = self.dialect.lazy_quotes;
        let mut fields = Vec::new();
        let mut pos = 0usize;

        loop {
            let mut field: Vec<u8> = Vec::new();

            if line.get(pos) == Some(&b'"') {
                pos += 1;
                loop {
                    match line[pos..].iter().position(|&b| b == b'"') {
                        Some(i) => {
                            field.extend_from_slice(&line[pos..pos + i]);
                            pos += i + 1;
                            match line.get(pos) {
                                Some(&b'"') => {
                                    field.push(b'"');
                                    pos += 1;
                                }
                                None => break,
                                Some(&b) if b == delim => break,
                                Some(_) if lazy => field.push(b'"'),
                                Some(_) => {
                                    return Err(RecordError::malformed_row(
                                        self.line,
                                        "extraneous or missing \" in quoted-field",
                                    )
                                    .into());
                                }
                            }
                        }
                        None => {
                            field.extend_from_slice(&line[pos..]);
                            match self.next_line()? {
                                Some(next) => {
                                    field.push(b'\n');
                                    line = next;
                                    pos = 0;
                                }
                                None if lazy => {
                                    pos = line.len();
                                    break;
                                }
                                None => {
                                    return Err(RecordError::malformed_row(
                                        start_line,
                                        "extraneous or missing \" in quoted-field",
                                    )
                                    .into());
                                }
                            }
                        }
                    }
                }
            } else {
                let end = line[pos..]
                    .iter()
                    .position(|&b| b == delim)
                    .map_or(line.len(), |i| pos + i);
                let raw = &line[pos..end];
                if !lazy && raw.contains(&b'"') {
                    return Err(RecordError::malformed_row(
                        self.line,
                        "bare \" in non-quoted-field",
                    )
                    .into());
                }
                field.extend_from_slice(raw);
                pos = end;
            }

            fields.push(String::from_utf8_lossy(&field).into_owned());

            if line.get(pos) == Some(&delim) {
                pos += 1;
            } else {
                return Ok(fields);
            }
        }
    }
}

/// Encodes [`Record`]s as delimited text with an internal write buffer.
///
/// Write errors are sticky: once the sink fails, every later write and the
/// next flush report the failure.
pub struct RowWriter<W: Write> {
    inner: W,
    dialect: Dialect,
    buf: Vec<u8>,
    error: Option<io::Error>,
}

impl<W: Write> RowWriter<W> {
    pub fn new(inner: W, dialect: Dialect) -> Self {
        Self {
            inner,
            dialect,
            buf: Vec::new(),
            error: None,
        }
    }

    /// Buffers one row.
    ///
    /// A row with no fields is rejected: it would encode as a blank line,
    /// which readers skip.
    pub fn write_row(&mut self, fields: &[String]) -> io::Result<()> {
        if let Some(e) = &self.error {
            return Err(io::Error::new(e.kind(), e.to_string()));
        }
        if fields.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "cannot write a row with no fields",
            ));
        }

        if fields.len() == 1 && fields[0].is_empty() {
            self.buf.extend_from_slice(b"\"\"");
        } else {
            for (i, field) in fields.iter().enumerate() {
                if i > 0 {
                    self.buf.push(self.dialect.delimiter);
                }
                self.encode_field(field);
            }
        }
        self.buf.push(b'\n');

        if self.buf.len() >= WRITE_BUFFER_SIZE {
            self.drain();
        }
        match &self.error {
            Some(e) => Err(io::Error::new(e.kind(), e.to_string())),
            None => Ok(()),
        }
    }

    /// Buffers one record.
    pub fn write_record(&mut self, rec: &Record) -> io::Result<()> {
        self.write_row(rec.values())
    }

    /// Pushes buffered rows to the sink and flushes it. Returns the first
    /// error seen since the last successful flush.
    pub fn flush(&mut self) -> io::Result<()> {
        self.drain();
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.inner.flush()
    }

    /// Flushes and returns the sink.
    pub fn into_inner(mut self) -> io::Result<W> {
        self.flush()?;
        Ok(self.inner)
    }

    fn drain(&mut self) {
        if self.buf.is_empty() || self.error.is_some() {
            self.buf.clear();
            return;
        }
        if let Err(e) = self.inner.write_all(&self.buf) {
            self.error = Some(e);
        }
        self.buf.clear();
    }

    fn needs_quotes(&self, field: &str) -> bool {
        let bytes = field.as_bytes();
        match bytes.first() {
            None => false,
            Some(&b) if Some(b) == self.dialect.comment => true,
            Some(b' ') | Some(b'\t') => true,
            Some(_) => bytes
                .iter()
                .any(|&b| b == self.dialect.delimiter || b == b'"' || b == b'\r' || b == b'\n'),
        }
    }

    fn encode_field(&mut self, field: &str) {
        if !self.needs_quotes(field) {
            self.buf.extend_from_slice(field.as_bytes());
            return;
        }
        self.buf.push(b'"');
        for &b in field.as_bytes() {
            if b == b'"' {
                self.buf.push(b'"');
            }
            self.buf.push(b);
        }
        self.buf.push(b'"');
    }
}
