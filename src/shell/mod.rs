//! Subprocess execution and platform detection.

pub mod command;
pub mod platform;

pub use command::{execute, CommandLine, CommandOptions, CommandResult};
pub use platform::{shell_program, stdout_is_terminal, Platform};
