//! Error types for launcher operations.
//!
//! This module defines [`LauncherError`], the error type returned by every
//! bootstrap stage, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Every variant is terminal for the current invocation; nothing is retried
//! - Every variant carries remediation text the user can act on
//! - Use `anyhow::Error` (via `LauncherError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

use crate::runtime::ProbeAttempt;

/// Exit code for every bootstrap failure.
pub const FAILURE_EXIT_CODE: i32 = 1;

/// Core error type for launcher operations.
#[derive(Debug, Error)]
pub enum LauncherError {
    /// Required credential variables are unset or empty.
    #[error("Missing required environment variables: {}", missing.join(", "))]
    MissingCredentials { missing: Vec<String> },

    /// No candidate interpreter satisfied the minimum version.
    #[error("No Python {minimum} or newer found (tried {} candidates)", attempted.len())]
    RuntimeNotFound {
        minimum: String,
        attempted: Vec<ProbeAttempt>,
    },

    /// Every installation strategy failed.
    #[error("Failed to install Python dependencies: {last_error}")]
    InstallFailed {
        runtime: String,
        packages: Vec<String>,
        last_error: String,
    },

    /// The server script is not where the launcher expects it.
    #[error("Server script not found: {path}")]
    ScriptMissing { path: PathBuf },

    /// The interpreter could not be started for the server script.
    #[error("Failed to start '{command}': {message}")]
    SpawnError { command: String, message: String },

    /// The server exited with a non-zero code.
    #[error("Server exited with code {code}")]
    ChildAbnormalExit { code: i32 },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LauncherError {
    /// Exit code the launcher terminates with for this error.
    ///
    /// The child's own code is passed through untouched.
    pub fn exit_code(&self) -> i32 {
        match self {
            LauncherError::ChildAbnormalExit { code } => *code,
            _ => FAILURE_EXIT_CODE,
        }
    }

    /// Actionable follow-up text, one line per entry.
    pub fn remediation(&self) -> Vec<String> {
        match self {
            LauncherError::MissingCredentials { .. } => vec![
                "Set TDX_CLIENT_ID and TDX_CLIENT_SECRET before starting the server.".to_string(),
                "Run with --help for an example client configuration.".to_string(),
            ],
            LauncherError::RuntimeNotFound { minimum, attempted } => {
                let mut lines = vec!["Tried:".to_string()];
                lines.extend(attempted.iter().map(|a| format!("  {}", a)));
                lines.push(format!(
                    "Install Python {} or newer from https://www.python.org/downloads/",
                    minimum
                ));
                lines.push(
                    "Or point the launcher at an interpreter: THSRC_PYTHON=/path/to/python3"
                        .to_string(),
                );
                lines
            }
            LauncherError::InstallFailed {
                runtime, packages, ..
            } => vec![
                "Install the dependencies manually:".to_string(),
                format!("  {} -m pip install {}", runtime, packages.join(" ")),
                "Or use another packaging tool:".to_string(),
                format!("  pipx runpip <env> install {}", packages.join(" ")),
                format!("  uv pip install {}", packages.join(" ")),
            ],
            LauncherError::ScriptMissing { path } => vec![
                format!(
                    "Reinstall the package, or set THSRC_SERVER_DIR to the directory containing {}",
                    path.file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "the server script".to_string())
                ),
            ],
            LauncherError::SpawnError { command, .. } => vec![format!(
                "Check that '{}' still exists and is executable, then run again.",
                command
            )],
            LauncherError::ChildAbnormalExit { .. } => vec![
                "See the server output above for details.".to_string(),
            ],
            LauncherError::Io(_) | LauncherError::Other(_) => Vec::new(),
        }
    }
}

/// Result type alias for launcher operations.
pub type Result<T> = std::result::Result<T, LauncherError>;
