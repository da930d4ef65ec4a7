//! Raw log snapshots for download.

use chrono::NaiveDate;

/// A downloadable copy of the raw log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportBlob {
    pub file_name: String,
    pub content: String,
}

impl ExportBlob {
    /// Snapshot `raw` as-is, or `None` when there is nothing to export.
    pub fn from_raw(raw: &str, date: NaiveDate) -> Option<Self> {
        if raw.trim().is_empty() {
            return None;
        }
        Some(Self {
            file_name: export_file_name(date),
            content: raw.to_string(),
        })
    }
}

pub fn export_file_name(date: NaiveDate) -> String {
    format!("prompt-log-{}.jsonl", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
    }

    #[test]
    fn test_empty_log_exports_nothing() {
        assert!(ExportBlob::from_raw("", date()).is_none());
        assert!(ExportBlob::from_raw("\n  \n", date()).is_none());
    }

    #[test]
    fn test_blob_keeps_raw_content_exactly() {
        let raw = "{\"a\":1}\nnot json\n";
        let blob = ExportBlob::from_raw(raw, date()).unwrap();
        assert_eq!(blob.content, raw);
        assert_eq!(blob.file_name, "prompt-log-2024-03-09.jsonl");
    }
}
