//! System-level modules
//!
//! - Logging setup
//! - In-process event bus

pub mod event;
pub mod logging;
