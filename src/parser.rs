//! Streaming JSON5 parsing for pattern files
//!
//! Supports both single-line JSONL and multi-line JSON5 formats.
//! JSON5 adds support for comments, trailing commas, and unquoted keys.

use crate::models::{FractalObject, Warning};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;
use thiserror::Error;

/// Error type for parsing failures.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("line {line}: {message}")]
pub struct ParseError {
    pub message: String,
    pub line: usize,
}

/// Result of parsing a JSON stream.
#[derive(Debug, Clone, Default)]
pub struct ParseResult {
    pub objects: Vec<FractalObject>,
    pub warnings: Vec<Warning>,
}

/// Parse a single JSON5 string into a FractalObject.
pub fn parse_line(line: &str, line_number: usize) -> Result<FractalObject, ParseError> {
    json5::from_str(line).map_err(|e| ParseError { message: e.to_string(), line: line_number })
}

/// Tracks string and nesting state across lines to find where one object
/// ends.
#[derive(Debug, Default)]
struct Balance {
    opened: bool,
    depth: i32,
    in_string: bool,
    escape_next: bool,
}

impl Balance {
    /// Account for one more line; true once an object has opened and every
    /// brace and bracket is closed again.
    fn feed(&mut self, line: &str) -> bool {
        for ch in line.chars() {
            if self.escape_next {
                self.escape_next = false;
                continue;
            }
            match ch {
                '\\' if self.in_string => self.escape_next = true,
                '"' => self.in_string = !self.in_string,
                '{' | '[' if !self.in_string => {
                    self.opened = true;
                    self.depth += 1;
                }
                '}' | ']' if !self.in_string => self.depth -= 1,
                _ => {}
            }
        }
        self.opened && self.depth == 0
    }
}

/// Parse a stream of JSON5 objects.
///
/// Objects may be one per line or span several lines, separated by
/// whitespace. A malformed object is reported as a warning carrying the line
/// it started on, and parsing stops there since the next object boundary
/// can no longer be trusted. A line that cannot be read (invalid UTF-8 or an
/// I/O failure) is reported the same way.
pub fn parse_stream<R: Read>(reader: R) -> ParseResult {
    let mut result = ParseResult::default();
    let mut accumulator = String::new();
    let mut balance = Balance::default();
    let mut start_line = 1;

    for (index, line) in BufReader::new(reader).lines().enumerate() {
        let line_number = index + 1;
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                let message = match e.kind() {
                    io::ErrorKind::InvalidData => "invalid UTF-8".to_string(),
                    _ => e.to_string(),
                };
                result.warnings.push(Warning { message, line: line_number });
                return result;
            }
        };
        if accumulator.is_empty() {
            if line.trim().is_empty() {
                continue;
            }
            start_line = line_number;
        } else {
            accumulator.push('\n');
        }
        accumulator.push_str(&line);

        if balance.feed(&line) {
            match parse_line(&accumulator, start_line) {
                Ok(obj) => result.objects.push(obj),
                Err(e) => {
                    result.warnings.push(Warning { message: e.message, line: e.line });
                    return result;
                }
            }
            accumulator.clear();
            balance = Balance::default();
        }
    }

    if !accumulator.trim().is_empty() {
        match parse_line(&accumulator, start_line) {
            Ok(obj) => result.objects.push(obj),
            Err(e) => result.warnings.push(Warning { message: e.message, line: e.line }),
        }
    }

    result
}

/// Open and parse a pattern file.
pub fn parse_file(path: &Path) -> io::Result<ParseResult> {
    let file = File::open(path)?;
    Ok(parse_stream(file))
}
