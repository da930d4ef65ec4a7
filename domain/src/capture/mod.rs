//! Capture subdomain: turning host events into log records.
//!
//! - [`settings::CaptureSettings`] - the three capture toggles
//! - [`event::HostEvent`] / [`event::HostContext`] - what the host hands us
//! - [`policy::CapturePolicy`] - field selection and record assembly

pub mod event;
pub mod policy;
pub mod settings;
