//! User-facing notices

pub mod console;
