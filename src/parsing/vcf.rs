//! Line-oriented VCF reader.
//!
//! Header lines (`#`-prefixed) are surfaced verbatim so they can be copied to
//! each output unchanged; data lines are decoded into [`VariantRecord`]s.
//! Plain and gzip/bgzip-compressed files are both accepted.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use thiserror::Error;

use crate::core::record::{RecordError, VariantRecord};

/// One line of a VCF file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VcfLine {
    /// Meta-information or column header line, without its line terminator
    Header(String),
    Record(VariantRecord),
}

/// Errors that can arise while reading a VCF line.
#[derive(Debug, Error)]
#[error("line {line}: {kind}")]
pub struct ParseError {
    pub line: u64,
    pub raw: String,
    #[source]
    pub kind: ParseErrorKind,
}

impl ParseError {
    /// Malformed lines are skippable; I/O failures are not
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self.kind, ParseErrorKind::Io(_))
    }
}

#[derive(Debug, Error)]
pub enum ParseErrorKind {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("line is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    #[error(transparent)]
    Record(#[from] RecordError),
}

/// Iterator over the lines of a VCF.
pub struct Reader<R> {
    inner: R,
    line: u64,
    buf: Vec<u8>,
}

impl<R> Reader<R>
where
    R: BufRead,
{
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            line: 0,
            buf: Vec::new(),
        }
    }

    /// Number of lines consumed so far
    pub fn line_number(&self) -> u64 {
        self.line
    }
}

impl<R> Iterator for Reader<R>
where
    R: BufRead,
{
    type Item = Result<VcfLine, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            let n = match self.inner.read_until(b'\n', &mut self.buf) {
                Ok(n) => n,
                Err(e) => {
                    return Some(Err(ParseError {
                        line: self.line + 1,
                        raw: String::new(),
                        kind: ParseErrorKind::Io(e),
                    }));
                }
            };
            if n == 0 {
                return None;
            }
            self.line += 1;

            let line = match std::str::from_utf8(&self.buf) {
                Ok(line) => line,
                Err(e) => {
                    return Some(Err(ParseError {
                        line: self.line,
                        raw: String::from_utf8_lossy(&self.buf).trim_end().to_string(),
                        kind: e.into(),
                    }));
                }
            };

            let trimmed = line.trim_end_matches(&['\n', '\r'][..]);
            if trimmed.is_empty() {
                continue;
            }
            if trimmed.starts_with('#') {
                return Some(Ok(VcfLine::Header(trimmed.to_string())));
            }

            return Some(
                trimmed
                    .parse::<VariantRecord>()
                    .map(VcfLine::Record)
                    .map_err(|e| ParseError {
                        line: self.line,
                        raw: trimmed.to_string(),
                        kind: e.into(),
                    }),
            );
        }
    }
}

/// True if the path names a gzip/bgzip-compressed file
#[must_use]
pub fn is_gzipped(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("gz") || e.eq_ignore_ascii_case("bgz"))
}

/// Open a VCF for line-by-line reading, decompressing `.gz` inputs.
///
/// # Errors
///
/// Returns the underlying I/O error if the file cannot be opened.
pub fn open(path: &Path) -> io::Result<Reader<Box<dyn BufRead>>> {
    let file = File::open(path)?;
    let inner: Box<dyn BufRead> = if is_gzipped(path) {
        Box::new(BufReader::new(MultiGzDecoder::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };
    Ok(Reader::new(inner))
}
