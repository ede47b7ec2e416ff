//! Runs the server script and mirrors its lifetime.
//!
//! The child inherits all three standard streams, so the MCP client talks to
//! the server directly; the launcher only waits, forwards signals, and exits
//! with whatever code the server produced.

pub mod signals;

use std::path::Path;
use std::process::{ExitStatus, Stdio};

use crate::error::{LauncherError, Result};
use crate::runtime::Runtime;

pub use signals::ForwardingGuard;

/// Base added to a terminating signal's number, as shells report it.
pub const SIGNAL_EXIT_BASE: i32 = 128;

/// Run `script` with `runtime` and return the code to exit with.
pub fn run(runtime: &Runtime, script: &Path) -> Result<i32> {
    if !script.is_file() {
        return Err(LauncherError::ScriptMissing {
            path: script.to_path_buf(),
        });
    }

    let line = runtime
        .invocation()
        .with_args(&[script.to_string_lossy()]);
    tracing::info!("Starting server: {}", line);

    let mut cmd = line.to_command();
    cmd.stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());

    let guard = ForwardingGuard::install();
    let mut child = cmd.spawn().map_err(|e| LauncherError::SpawnError {
        command: line.display(),
        message: e.to_string(),
    })?;

    guard.attach(child.id());
    let status = child.wait()?;
    drop(guard);

    let code = exit_code_of(status);
    tracing::debug!("Server exited: {} (exit code {})", status, code);
    Ok(code)
}

/// Map a child's exit status to the launcher's exit code.
pub fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(sig) = status.signal() {
            return SIGNAL_EXIT_BASE + sig;
        }
    }

    crate::error::FAILURE_EXIT_CODE
}
