//! Core domain concepts shared across all subdomains.
//!
//! - [`log_path::LogPath`] - validated logical location of the log resource
//! - [`error::DomainError`] - domain-level errors

pub mod error;
pub mod log_path;
