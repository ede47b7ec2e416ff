//! Command-line interface.
//!
//! - [`args`] - Argument definitions using clap's derive macros
//! - [`help`] - The help text, shown on `--help` and on missing credentials

pub mod args;
pub mod help;

pub use args::Cli;
pub use help::{help_text, REGISTRATION_URL};
