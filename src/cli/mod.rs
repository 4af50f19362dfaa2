//! CLI module
//!
//! Flag parsing and the run loop. main.rs delegates here and does nothing
//! else.

mod args;
mod commands;
mod errors;

pub use args::Cli;
pub use commands::run;
pub use errors::{CliError, CliResult};
