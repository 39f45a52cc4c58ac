//! User interfaces
//!
//! - `cli`: command implementations for the clap front end

pub mod cli;
