//! Subprocess execution for probes and installers.

use crate::error::{LauncherError, Result};
use std::io::Read;
use std::process::{Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::platform::shell_program;

/// How often a bounded command is polled for completion.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// A program plus its arguments, optionally run through the platform shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    /// Executable name or path.
    pub program: String,
    /// Arguments passed after the program.
    pub args: Vec<String>,
    /// Run through `sh -c` / `cmd /C` instead of directly.
    pub requires_shell: bool,
}

impl CommandLine {
    /// Create a command line that runs `program` directly.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            requires_shell: false,
        }
    }

    /// Mark this command line as needing the platform shell.
    pub fn through_shell(mut self) -> Self {
        self.requires_shell = true;
        self
    }

    /// Return a copy with extra arguments appended.
    pub fn with_args<S: AsRef<str>>(&self, extra: &[S]) -> Self {
        let mut line = self.clone();
        line.args
            .extend(extra.iter().map(|a| a.as_ref().to_string()));
        line
    }

    /// All tokens, program first.
    pub fn tokens(&self) -> Vec<&str> {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect()
    }

    /// Human-readable rendering for logs and remediation text.
    pub fn display(&self) -> String {
        self.tokens()
            .into_iter()
            .map(quote_token)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Build a `std::process::Command` for this line.
    pub fn to_command(&self) -> Command {
        if !self.requires_shell {
            let mut cmd = Command::new(&self.program);
            cmd.args(&self.args);
            return cmd;
        }

        let mut cmd = Command::new(shell_program());
        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            cmd.raw_arg(self.cmd_arguments());
        }
        #[cfg(not(windows))]
        cmd.arg("-c").arg(self.display());
        cmd
    }

    /// Raw argument string for `cmd.exe`.
    ///
    /// `/S` makes cmd strip exactly the outer pair of quotes, so quoted
    /// tokens inside survive even when the program path has spaces.
    pub fn cmd_arguments(&self) -> String {
        let inner = self
            .tokens()
            .into_iter()
            .map(|t| quote_token_for(t, true))
            .collect::<Vec<_>>()
            .join(" ");
        format!("/S /C \"{}\"", inner)
    }
}

impl std::fmt::Display for CommandLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display())
    }
}

/// Quote a token for display (and for `sh -c`) when it contains whitespace.
fn quote_token(token: &str) -> String {
    quote_token_for(token, cfg!(target_os = "windows"))
}

fn quote_token_for(token: &str, windows: bool) -> String {
    if !token.is_empty()
        && !token
            .chars()
            .any(|c| c.is_whitespace() || c == '"' || c == '\'')
    {
        return token.to_string();
    }
    if windows {
        format!("\"{}\"", token.replace('"', "\\\""))
    } else {
        format!("'{}'", token.replace('\'', "'\\''"))
    }
}

/// Result of executing a command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal or by the timeout).
    pub exit_code: Option<i32>,

    /// Standard output (empty unless captured).
    pub stdout: String,

    /// Standard error (empty unless captured).
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,

    /// Whether the command was killed for exceeding its timeout.
    pub timed_out: bool,
}

impl CommandResult {
    fn finished(status: ExitStatus, stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: status.code(),
            stdout,
            stderr,
            duration,
            success: status.success(),
            timed_out: false,
        }
    }

    fn timeout(duration: Duration) -> Self {
        Self {
            exit_code: None,
            stdout: String::new(),
            stderr: String::new(),
            duration,
            success: false,
            timed_out: true,
        }
    }

    /// Stdout and stderr joined, for parsers that don't care which stream was used.
    pub fn combined_output(&self) -> String {
        format!("{}{}", self.stdout, self.stderr)
    }

    /// Short description of a failure for error messages.
    pub fn failure_summary(&self) -> String {
        if self.timed_out {
            return format!("timed out after {:.1}s", self.duration.as_secs_f64());
        }
        let tail = self
            .stderr
            .lines()
            .rev()
            .find(|l| !l.trim().is_empty())
            .map(|l| l.trim().to_string());
        match (tail, self.exit_code) {
            (Some(line), _) => line,
            (None, Some(code)) => format!("exited with code {}", code),
            (None, None) => "terminated by signal".to_string(),
        }
    }
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Capture stdout/stderr (if false, both are inherited from the parent).
    pub capture_output: bool,

    /// Kill the command after this long (None = no timeout).
    pub timeout: Option<Duration>,
}

impl CommandOptions {
    /// Captured output with a ceiling, as used for probes.
    pub fn probe(timeout: Duration) -> Self {
        Self {
            capture_output: true,
            timeout: Some(timeout),
        }
    }
}

/// Execute a command line, waiting for it to finish or time out.
///
/// Spawn failures are returned as [`LauncherError::SpawnError`]; a non-zero
/// exit or a timeout is a normal `Ok` result with `success == false`.
pub fn execute(line: &CommandLine, options: &CommandOptions) -> Result<CommandResult> {
    let start = Instant::now();
    let mut cmd = line.to_command();
    cmd.stdin(Stdio::null());

    if options.capture_output {
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
    } else {
        cmd.stdout(Stdio::inherit());
        cmd.stderr(Stdio::inherit());
    }

    let mut child = cmd.spawn().map_err(|e| LauncherError::SpawnError {
        command: line.display(),
        message: e.to_string(),
    })?;

    // Drain pipes on helper threads so a chatty child can't block on a full pipe.
    let stdout_reader = child.stdout.take().map(drain);
    let stderr_reader = child.stderr.take().map(drain);

    let status = loop {
        if let Some(status) = child.try_wait()? {
            break Some(status);
        }
        if options.timeout.is_some_and(|t| start.elapsed() >= t) {
            let _ = child.kill();
            let _ = child.wait();
            break None;
        }
        thread::sleep(POLL_INTERVAL);
    };

    let duration = start.elapsed();

    let Some(status) = status else {
        // Readers are left detached: a grandchild may still hold the pipes open.
        tracing::debug!("'{}' timed out after {:?}", line, duration);
        return Ok(CommandResult::timeout(duration));
    };

    let stdout = stdout_reader
        .and_then(|h| h.join().ok())
        .unwrap_or_default();
    let stderr = stderr_reader
        .and_then(|h| h.join().ok())
        .unwrap_or_default();

    Ok(CommandResult::finished(status, stdout, stderr, duration))
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        String::from_utf8_lossy(&buf).to_string()
    })
}
