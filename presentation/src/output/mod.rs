//! Output formatting

pub mod log_formatter;
