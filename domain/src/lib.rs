//! Domain layer for promptlog
//!
//! This crate contains the log record model, its line codec, and the
//! capture policy. It has no dependencies on storage or presentation
//! concerns.
//!
//! # Core Concepts
//!
//! ## Record
//!
//! A [`LogRecord`] is one captured generation event: a capture-time
//! timestamp, the active persona, and whichever fields the capture toggles
//! allowed. The log holds one JSON-encoded record per line.
//!
//! ## Capture
//!
//! [`CapturePolicy`] decides, per host event, whether anything is captured
//! and which fields go into the record.

pub mod capture;
pub mod core;
pub mod export;
pub mod record;

// Re-export commonly used types
pub use capture::{
    event::{DEFAULT_CAPTURE_EVENT, HostContext, HostEnvelope, HostEvent, PromptField},
    policy::CapturePolicy,
    settings::{CaptureSettings, CaptureToggle},
};
pub use core::{
    error::DomainError,
    log_path::{DEFAULT_LOG_PATH, LogPath},
};
pub use export::ExportBlob;
pub use record::{
    codec::{CodecError, DecodedLine, decode, decode_log, encode},
    entities::{ContextSnapshot, LogRecord, RecordData},
};
