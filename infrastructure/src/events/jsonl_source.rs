//! NDJSON host event stream.
//!
//! Each line is one [`HostEnvelope`]. Lines that fail to parse are logged
//! and skipped so one bad event never stops the capture loop. A read error
//! ends the stream.

use futures::Stream;
use futures::stream;
use promptlog_domain::HostEnvelope;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::warn;

/// Stream envelopes from `reader` until EOF.
pub fn jsonl_event_stream<R>(reader: R) -> impl Stream<Item = HostEnvelope>
where
    R: AsyncBufRead + Unpin,
{
    stream::unfold((reader.lines(), 0usize), |(mut lines, mut line_no)| async move {
        loop {
            line_no += 1;
            match lines.next_line().await {
                Ok(Some(line)) if line.trim().is_empty() => continue,
                Ok(Some(line)) => match serde_json::from_str::<HostEnvelope>(&line) {
                    Ok(envelope) => return Some((envelope, (lines, line_no))),
                    Err(e) => warn!("Skipping malformed event on line {}: {}", line_no, e),
                },
                Ok(None) => return None,
                Err(e) => {
                    warn!("Event stream read error after line {}: {}", line_no, e);
                    return None;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn test_reads_envelopes_in_order() {
        let input = br#"{"event":"generation_ended","payload":{"prompt":"a"}}
{"event":"message_sent","payload":{},"context":{"name2":"Aqua"}}
"#;
        let envelopes: Vec<_> = jsonl_event_stream(&input[..]).collect().await;
        assert_eq!(envelopes.len(), 2);
        assert_eq!(envelopes[0].event, "generation_ended");
        assert_eq!(envelopes[1].context.character_name(), "Aqua");
    }

    #[tokio::test]
    async fn test_skips_blank_and_malformed_lines() {
        let input = b"\n{oops\n{\"payload\":{}}\n{\"event\":\"e\"}\n   \n";
        let envelopes: Vec<_> = jsonl_event_stream(&input[..]).collect().await;
        assert_eq!(envelopes.len(), 1);
        assert_eq!(envelopes[0].event, "e");
    }

    #[tokio::test]
    async fn test_odd_context_shapes_are_kept() {
        let input = br#"{"event":"generation_ended","payload":{"prompt":"a"},"context":{"name2":42,"chat":{"0":{"mes":"x"}}}}
"#;
        let envelopes: Vec<_> = jsonl_event_stream(&input[..]).collect().await;
        assert_eq!(envelopes.len(), 1);
        assert_eq!(envelopes[0].context.character_name(), "");
        assert!(envelopes[0].context.chat_history().is_none());
    }

    #[tokio::test]
    async fn test_empty_input_ends_immediately() {
        let envelopes: Vec<_> = jsonl_event_stream(&b""[..]).collect().await;
        assert!(envelopes.is_empty());
    }
}
