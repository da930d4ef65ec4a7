//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure and presentation adapters
//! must implement.

pub mod log_store;
pub mod notifier;
pub mod settings_persistence;
