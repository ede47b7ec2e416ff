//! UI used while an MCP client owns stdout.

use super::{OutputMode, ProgressSpinner, SpinnerHandle, UserInterface};

/// UI implementation for piped mode.
///
/// Progress is dropped entirely. Warnings, errors and hints still reach
/// stderr, which MCP clients surface in their logs.
#[derive(Debug, Default)]
pub struct NonInteractiveUI;

impl NonInteractiveUI {
    /// Create a new non-interactive UI.
    pub fn new() -> Self {
        Self
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        OutputMode::Piped
    }

    fn message(&mut self, _msg: &str) {}

    fn success(&mut self, _msg: &str) {}

    fn warning(&mut self, msg: &str) {
        eprintln!("⚠ {}", msg);
    }

    fn error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }

    fn show_hint(&mut self, hint: &str) {
        eprintln!("  {}", hint);
    }

    fn start_spinner(&mut self, _message: &str) -> Box<dyn SpinnerHandle> {
        Box::new(ProgressSpinner::hidden())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_interactive_is_piped() {
        let ui = NonInteractiveUI::new();
        assert_eq!(ui.output_mode(), OutputMode::Piped);
    }

    #[test]
    fn status_calls_are_silent() {
        let mut ui = NonInteractiveUI::new();
        ui.message("First run: installing Python dependencies...");
        ui.success("Dependencies installed");
        let mut spinner = ui.start_spinner("Looking for Python");
        spinner.finish_success("found");
    }
}
