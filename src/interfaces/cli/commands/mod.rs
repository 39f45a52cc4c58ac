//! CLI command implementations
//!
//! This module re-exports all CLI command functions.

mod bulk;
mod config_gen;
mod presets;
mod token;

pub use bulk::*;
pub use config_gen::*;
pub use presets::*;
pub use token::*;
