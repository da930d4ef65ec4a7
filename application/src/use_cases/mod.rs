//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod capture;
pub mod init_settings;
pub mod manage_log;
