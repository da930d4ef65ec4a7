//! Human-readable rendering of the raw prompt log

use promptlog_domain::{DecodedLine, LogRecord, decode_log};

/// Shown when the log is absent or holds no records.
pub const EMPTY_LOG_PLACEHOLDER: &str = "No logs yet.";

const SEPARATOR_WIDTH: usize = 60;

/// Formats raw log text for the viewer
pub struct LogFormatter;

impl LogFormatter {
    /// Render every non-blank line as a block, oldest first.
    ///
    /// Lines that do not decode are shown verbatim in their own block.
    pub fn render(raw: &str) -> String {
        let blocks: Vec<String> = decode_log(raw)
            .map(|line| match line {
                DecodedLine::Record(record) => Self::record_block(&record),
                DecodedLine::Raw(text) => text.to_string(),
            })
            .collect();

        if blocks.is_empty() {
            return EMPTY_LOG_PLACEHOLDER.to_string();
        }
        blocks.join(&format!("\n{}\n", Self::separator()))
    }

    fn record_block(record: &LogRecord) -> String {
        let data = serde_json::to_string_pretty(&record.data)
            .unwrap_or_else(|e| format!("<unprintable record data: {}>", e));
        format!("{}\n{}", Self::header(record), data)
    }

    fn header(record: &LogRecord) -> String {
        let timestamp = record
            .timestamp
            .to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
        if record.character_name.is_empty() {
            format!("[{}]", timestamp)
        } else {
            format!("[{}] {}", timestamp, record.character_name)
        }
    }

    fn separator() -> String {
        "─".repeat(SEPARATOR_WIDTH)
    }
}
