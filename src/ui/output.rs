//! Output mode.

/// Whether a person is watching the launcher or an MCP client is reading it.
///
/// Computed once at startup and passed down explicitly. It only changes how
/// much is printed, never control flow or exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Stdout is a terminal: show progress and stream installer output.
    Interactive,
    /// Stdout is a pipe carrying the protocol: stay silent, capture installer output.
    #[default]
    Piped,
}

impl OutputMode {
    /// Pick the mode from terminal attachment, unless forced quiet.
    pub fn detect(force_quiet: bool) -> Self {
        Self::from_terminal(!force_quiet && crate::shell::stdout_is_terminal())
    }

    /// Map a terminal check to a mode.
    pub fn from_terminal(is_terminal: bool) -> Self {
        if is_terminal {
            Self::Interactive
        } else {
            Self::Piped
        }
    }

    /// Check if progress and status messages are shown.
    pub fn shows_status(&self) -> bool {
        matches!(self, Self::Interactive)
    }

    /// Check if spinners are drawn.
    pub fn shows_spinners(&self) -> bool {
        matches!(self, Self::Interactive)
    }

    /// Check if installer subprocess output is passed through.
    pub fn streams_subprocess_output(&self) -> bool {
        matches!(self, Self::Interactive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_terminal_maps_both_ways() {
        assert_eq!(OutputMode::from_terminal(true), OutputMode::Interactive);
        assert_eq!(OutputMode::from_terminal(false), OutputMode::Piped);
    }

    #[test]
    fn forced_quiet_is_always_piped() {
        assert_eq!(OutputMode::detect(true), OutputMode::Piped);
    }

    #[test]
    fn interactive_shows_everything() {
        let mode = OutputMode::Interactive;
        assert!(mode.shows_status());
        assert!(mode.shows_spinners());
        assert!(mode.streams_subprocess_output());
    }

    #[test]
    fn piped_shows_nothing() {
        let mode = OutputMode::Piped;
        assert!(!mode.shows_status());
        assert!(!mode.shows_spinners());
        assert!(!mode.streams_subprocess_output());
    }

    #[test]
    fn output_mode_default_is_piped() {
        assert_eq!(OutputMode::default(), OutputMode::Piped);
    }
}
