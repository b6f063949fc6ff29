//! Delimited text parsing (CSV / TSV) into header + data rows.

use std::collections::HashSet;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};

use crate::models::{ValidationErrorKind, ValidationIssue};

const UTF8_BOM: char = '\u{feff}';

/// Supported delimited formats, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelimitedFormat {
    Csv,
    Tsv,
}

impl DelimitedFormat {
    pub fn from_filename(filename: &str) -> Option<Self> {
        let ext = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())?;

        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "tsv" | "tab" => Some(Self::Tsv),
            _ => None,
        }
    }

    pub fn delimiter(&self) -> u8 {
        match self {
            Self::Csv => b',',
            Self::Tsv => b'\t',
        }
    }
}

/// One data row with the line it started on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRow {
    /// 1-based line number (the header is line 1 unless preceded by blank lines)
    pub line: usize,
    pub cells: Vec<String>,
}

impl ParsedRow {
    /// Trimmed cell value; cells past the end of a short row read as blank.
    pub fn cell(&self, index: usize) -> &str {
        self.cells.get(index).map(|c| c.trim()).unwrap_or("")
    }
}

/// A parsed file: trimmed header names and the non-blank data rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTable {
    pub headers: Vec<String>,
    pub rows: Vec<ParsedRow>,
}

impl ParsedTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

/// Parse an uploaded file. Problems come back as a single file-level issue.
pub fn parse_table(filename: &str, bytes: &[u8]) -> Result<ParsedTable, ValidationIssue> {
    let format = DelimitedFormat::from_filename(filename).ok_or_else(|| {
        ValidationIssue::file_level(
            ValidationErrorKind::UnsupportedFormat,
            format!(
                "Unsupported file format for '{}'; expected a .csv or .tsv file",
                filename
            ),
        )
    })?;

    if bytes.is_empty() {
        return Err(ValidationIssue::file_level(
            ValidationErrorKind::EmptyFile,
            "File is empty",
        ));
    }

    let text = std::str::from_utf8(bytes).map_err(|e| {
        ValidationIssue::file_level(
            ValidationErrorKind::ParseError,
            format!("File is not valid UTF-8 text (byte {})", e.valid_up_to()),
        )
    })?;
    let text = text.strip_prefix(UTF8_BOM).unwrap_or(text);

    let mut reader = ReaderBuilder::new()
        .delimiter(format.delimiter())
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let lines = LineIndex::new(text);
    let mut headers: Option<Vec<String>> = None;
    let mut rows = Vec::new();
    let mut record = StringRecord::new();

    loop {
        match reader.read_record(&mut record) {
            Ok(false) => break,
            Ok(true) => {}
            Err(e) => {
                let line = e
                    .position()
                    .map(|p| lines.line_at(p.byte()))
                    .unwrap_or_default();
                return Err(ValidationIssue::file_level(
                    ValidationErrorKind::ParseError,
                    format!("Could not parse line {}: {}", line, e),
                ));
            }
        }

        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let line = record
            .position()
            .map(|p| lines.line_at(p.byte()))
            .unwrap_or_default();

        match headers {
            None => headers = Some(parse_header(&record)?),
            Some(_) => rows.push(ParsedRow {
                line,
                cells: record.iter().map(str::to_string).collect(),
            }),
        }
    }

    let headers = headers.ok_or_else(|| {
        ValidationIssue::file_level(ValidationErrorKind::EmptyFile, "File has no header row")
    })?;

    if rows.is_empty() {
        return Err(ValidationIssue::file_level(
            ValidationErrorKind::EmptyFile,
            "File contains no data rows",
        ));
    }

    Ok(ParsedTable { headers, rows })
}

/// Maps byte offsets of the decoded text to 1-based physical line numbers.
///
/// The reader reports a record's start before the empty lines it skips, so
/// an offset is first advanced past any line terminators.
struct LineIndex<'a> {
    bytes: &'a [u8],
    newlines: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    fn new(text: &'a str) -> Self {
        let bytes = text.as_bytes();
        let newlines = bytes
            .iter()
            .enumerate()
            .filter(|(_, b)| **b == b'\n')
            .map(|(i, _)| i)
            .collect();
        Self { bytes, newlines }
    }

    fn line_at(&self, byte: u64) -> usize {
        let mut start = (byte as usize).min(self.bytes.len());
        while start < self.bytes.len() && matches!(self.bytes[start], b'\r' | b'\n') {
            start += 1;
        }
        self.newlines.partition_point(|&nl| nl < start) + 1
    }
}

fn parse_header(record: &StringRecord) -> Result<Vec<String>, ValidationIssue> {
    let headers: Vec<String> = record.iter().map(|h| h.trim().to_string()).collect();

    let mut seen = HashSet::new();
    for header in headers.iter().filter(|h| !h.is_empty()) {
        if !seen.insert(header.as_str()) {
            return Err(ValidationIssue::file_level(
                ValidationErrorKind::ParseError,
                format!("Duplicate column '{}' in header", header),
            ));
        }
    }

    Ok(headers)
}
