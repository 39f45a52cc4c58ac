//! Application runtime
//!
//! - `lifetime`: startup wiring and graceful shutdown
//! - `modes`: execution mode entry points (server, cli)

pub mod lifetime;
pub mod modes;
