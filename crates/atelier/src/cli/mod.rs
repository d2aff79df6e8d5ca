//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the atelier binary.

mod commands;
mod config;
mod generate;

pub use commands::{Cli, Commands};
pub use config::show_config;
pub use generate::{GenerateOptions, run_generate};
