//! Command-line interface module
//!
//! Provides argument parsing and command execution.

pub mod args;
pub mod commands;

pub use args::{Args, EXIT_USAGE, parse_args, usage};
pub use commands::{Action, Command, EXIT_NOT_FOUND, EXIT_OK, execute_command, run};
