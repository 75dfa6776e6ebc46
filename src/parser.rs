//! Streaming JSON parsing for Armory records
//!
//! Supports both single-line JSONL and pretty-printed multi-line JSON.
//! Record streams may interleave record kinds; assembly into stores happens
//! in the provider layer.

use crate::models::{EconRecord, Warning};
use std::io::Read;
use thiserror::Error;

/// Error type for parsing failures.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("line {line}: {message}")]
pub struct ParseError {
    pub message: String,
    pub line: usize,
}

/// Result of parsing a record stream.
#[derive(Debug, Clone, Default)]
pub struct ParseResult {
    pub records: Vec<EconRecord>,
    pub warnings: Vec<Warning>,
}

/// Parse a single JSON string into an [`EconRecord`].
///
/// Returns `Ok(EconRecord)` on success, or `Err(ParseError)` if the text is
/// not valid JSON or the `"type"` tag is missing or unknown.
pub fn parse_line(line: &str, line_number: usize) -> Result<EconRecord, ParseError> {
    serde_json::from_str(line).map_err(|e| ParseError { message: e.to_string(), line: line_number })
}

/// Parse a stream of JSON records.
///
/// Supports both formats:
/// - Single-line JSONL (one JSON object per line)
/// - Multi-line JSON (objects can span multiple lines, separated by whitespace)
///
/// Parsing is lenient: a chunk that balances its braces but fails to decode
/// (unknown `"type"`, missing field, wrong field type) produces a
/// line-numbered [`Warning`] and parsing continues with the next chunk. The
/// chunk boundary is reliable because the braces already balanced.
pub fn parse_stream<R: Read>(reader: R) -> ParseResult {
    use std::io::BufRead;

    let mut result = ParseResult::default();
    let buf_reader = std::io::BufReader::new(reader);
    let mut lines = buf_reader.lines();

    let mut accumulator = String::new();
    let mut start_line = 1;
    let mut current_line = 1;
    let mut brace_depth = 0;
    let mut bracket_depth = 0;
    let mut in_string = false;
    let mut escape_next = false;

    while let Some(Ok(line)) = lines.next() {
        // Skip empty lines when not accumulating
        if accumulator.is_empty() && line.trim().is_empty() {
            current_line += 1;
            continue;
        }

        // Add line to accumulator
        if !accumulator.is_empty() {
            accumulator.push('\n');
        }
        accumulator.push_str(&line);

        // Track brace/bracket depth to detect complete objects
        for ch in line.chars() {
            if escape_next {
                escape_next = false;
                continue;
            }

            match ch {
                '\\' if in_string => escape_next = true,
                '"' => in_string = !in_string,
                '{' if !in_string => brace_depth += 1,
                '}' if !in_string => brace_depth -= 1,
                '[' if !in_string => bracket_depth += 1,
                ']' if !in_string => bracket_depth -= 1,
                _ => {}
            }
        }

        // Try to parse when braces are balanced
        if brace_depth == 0 && bracket_depth == 0 && !accumulator.trim().is_empty() {
            match serde_json::from_str::<EconRecord>(&accumulator) {
                Ok(record) => result.records.push(record),
                Err(e) => {
                    result.warnings.push(Warning { message: e.to_string(), line: start_line });
                }
            }

            accumulator.clear();
            start_line = current_line + 1;
            in_string = false;
            escape_next = false;
        }

        current_line += 1;
    }

    // Handle any remaining accumulated content
    if !accumulator.trim().is_empty() {
        match serde_json::from_str::<EconRecord>(&accumulator) {
            Ok(record) => result.records.push(record),
            Err(e) => {
                result.warnings.push(Warning { message: e.to_string(), line: start_line });
            }
        }
    }

    result
}
