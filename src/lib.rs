//! Launcher for the THSR timetable MCP server.
//!
//! Finds a Python 3.8+ interpreter, makes sure the server's libraries are
//! installed, and then runs the server script as a child process, passing
//! stdio, signals, and the exit code straight through.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and help text
//! - [`config`] - Server layout and launch configuration
//! - [`environment`] - Required credential checks
//! - [`error`] - Error types and result aliases
//! - [`requirements`] - Import probe and dependency installation
//! - [`runner`] - The bootstrap pipeline
//! - [`runtime`] - Interpreter discovery and version probing
//! - [`shell`] - Subprocess execution
//! - [`supervisor`] - Running and mirroring the server process
//! - [`ui`] - Spinners and styled status output on stderr
//!
//! # Example
//!
//! ```
//! use thsrc_launcher::runtime::{parse_version, MINIMUM_VERSION};
//!
//! let version = parse_version("Python 3.12.4").unwrap();
//! assert!(version.satisfies(&MINIMUM_VERSION));
//! ```

pub mod cli;
pub mod config;
pub mod environment;
pub mod error;
pub mod requirements;
pub mod runner;
pub mod runtime;
pub mod shell;
pub mod supervisor;
pub mod ui;

pub use error::{LauncherError, Result};
