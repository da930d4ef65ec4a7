//! Line codec for the prompt log.
//!
//! The log is newline-delimited JSON: every non-blank line holds exactly one
//! [`LogRecord`]. JSON string encoding escapes control characters, so an
//! encoded record never contains a raw line break.
//!
//! Decoding is per line. A line that does not parse is handed back verbatim
//! as [`DecodedLine::Raw`] instead of failing the whole log.

use super::entities::LogRecord;
use thiserror::Error;

/// Errors produced by the line codec
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Failed to encode record: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Malformed log line: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Encode a record as a single line (without the trailing newline).
pub fn encode(record: &LogRecord) -> Result<String, CodecError> {
    let line = serde_json::to_string(record).map_err(CodecError::Encode)?;
    debug_assert!(!line.contains('\n') && !line.contains('\r'));
    Ok(line)
}

/// Decode one line. A trailing `\r` left over from CRLF files is ignored.
pub fn decode(line: &str) -> Result<LogRecord, CodecError> {
    serde_json::from_str(line.trim_end_matches('\r')).map_err(CodecError::Decode)
}

/// One non-blank line of a log, decoded if possible.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedLine<'a> {
    Record(LogRecord),
    /// Line that failed to decode, passed through unchanged.
    Raw(&'a str),
}

/// Decode every non-blank line of `text`, preserving order.
pub fn decode_log(text: &str) -> impl Iterator<Item = DecodedLine<'_>> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| match decode(line) {
            Ok(record) => DecodedLine::Record(record),
            Err(_) => DecodedLine::Raw(line),
        })
}
