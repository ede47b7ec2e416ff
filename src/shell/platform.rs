//! Platform and terminal detection.

/// Operating system family, used to pick candidate lists and install strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    MacOS,
    Linux,
    Windows,
}

impl Platform {
    /// Detect the current platform.
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::MacOS
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else {
            Platform::Linux
        }
    }

    /// Whether this is a Windows host.
    pub fn is_windows(&self) -> bool {
        matches!(self, Platform::Windows)
    }
}

/// Shell used for command lines marked `requires_shell`.
pub fn shell_program() -> String {
    if cfg!(target_os = "windows") {
        std::env::var("COMSPEC").unwrap_or_else(|_| "cmd.exe".to_string())
    } else {
        "/bin/sh".to_string()
    }
}

/// Check whether standard output is attached to a terminal.
///
/// When it isn't, an MCP client is reading the protocol stream and the
/// launcher must stay silent on stdout.
pub fn stdout_is_terminal() -> bool {
    console::Term::stdout().is_term()
}
