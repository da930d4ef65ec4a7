//! Host event sources.

mod jsonl_source;

pub use jsonl_source::jsonl_event_stream;
