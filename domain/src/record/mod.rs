//! Log records and their on-disk line format.
//!
//! - [`entities::LogRecord`] - one captured event
//! - [`codec`] - one record per line, tolerant decoding

pub mod codec;
pub mod entities;
