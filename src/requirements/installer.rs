//! Dependency installation for the server script.
//!
//! The fast path is a single import probe: once the libraries are importable
//! nothing else runs, so every launch after the first costs one short
//! subprocess. Otherwise each strategy is tried in order until one exits 0.

use std::path::Path;
use std::time::Duration;

use crate::error::{LauncherError, Result};
use crate::runtime::Runtime;
use crate::shell::{execute, CommandLine, CommandOptions, Platform};
use crate::ui::{OutputMode, UserInterface};

use super::strategy::{
    import_probe, install_strategies, manual_packages, InstallStrategy, PackageSource,
    StrategyOptions,
};

/// Ceiling for the import probe; importing fastmcp cold can take a few seconds.
pub const IMPORT_PROBE_TIMEOUT: Duration = Duration::from_secs(60);

/// Mockable dependencies for the installer.
pub struct InstallerContext<'a> {
    /// Run the import probe, returning true when every module imports.
    pub probe_imports: &'a dyn Fn(&CommandLine) -> bool,
    /// Run one install strategy, returning a failure description on error.
    pub run_strategy: &'a dyn Fn(&InstallStrategy, OutputMode) -> std::result::Result<(), String>,
}

/// Build the default `InstallerContext` for production use.
pub fn default_context() -> InstallerContext<'static> {
    InstallerContext {
        probe_imports: &|line| {
            execute(line, &CommandOptions::probe(IMPORT_PROBE_TIMEOUT))
                .map(|r| r.success)
                .unwrap_or(false)
        },
        run_strategy: &|strategy, mode| {
            let options = CommandOptions {
                capture_output: !mode.streams_subprocess_output(),
                timeout: None,
            };
            match execute(&strategy.command, &options) {
                Ok(result) if result.success => Ok(()),
                Ok(result) => Err(result.failure_summary()),
                Err(e) => Err(e.to_string()),
            }
        },
    }
}

/// How `ensure_installed` succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// Every module already imported; nothing was installed.
    AlreadySatisfied,
    /// The named strategy installed the dependencies.
    Installed { strategy: &'static str },
}

/// Makes sure the server's libraries are importable by the selected runtime.
pub struct DependencyInstaller<'a> {
    source: PackageSource,
    platform: Platform,
    in_virtualenv: bool,
    mode: OutputMode,
    ctx: &'a InstallerContext<'a>,
}

impl<'a> DependencyInstaller<'a> {
    /// Create an installer for the manifest at `manifest`.
    pub fn new(manifest: &Path, mode: OutputMode, ctx: &'a InstallerContext<'a>) -> Self {
        Self {
            source: PackageSource::resolve(manifest),
            platform: Platform::current(),
            in_virtualenv: false,
            mode,
            ctx,
        }
    }

    /// Override the platform used to pick strategies.
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Record whether a virtual environment is active.
    pub fn with_virtualenv(mut self, in_virtualenv: bool) -> Self {
        self.in_virtualenv = in_virtualenv;
        self
    }

    /// The strategies that would be attempted for `runtime`, in order.
    pub fn strategies(&self, runtime: &Runtime) -> Vec<InstallStrategy> {
        install_strategies(
            runtime,
            &self.source,
            &StrategyOptions {
                platform: self.platform,
                in_virtualenv: self.in_virtualenv,
                quiet: !self.mode.streams_subprocess_output(),
            },
        )
    }

    /// Probe the imports and install on failure.
    pub fn ensure_installed(
        &self,
        runtime: &Runtime,
        ui: &mut dyn UserInterface,
    ) -> Result<InstallOutcome> {
        let probe = import_probe(runtime);
        if (self.ctx.probe_imports)(&probe) {
            tracing::debug!("Dependencies already importable by {}", runtime.candidate);
            return Ok(InstallOutcome::AlreadySatisfied);
        }

        ui.message("First run: installing Python dependencies...");

        let mut last_error = String::from("no installation strategy available");
        for strategy in self.strategies(runtime) {
            tracing::info!("Trying {} install: {}", strategy.label, strategy.command);
            match (self.ctx.run_strategy)(&strategy, self.mode) {
                Ok(()) => {
                    ui.success("Dependencies installed");
                    return Ok(InstallOutcome::Installed {
                        strategy: strategy.label,
                    });
                }
                Err(reason) => {
                    tracing::warn!("{} install failed: {}", strategy.label, reason);
                    last_error = reason;
                }
            }
        }

        Err(LauncherError::InstallFailed {
            runtime: runtime.invocation().display(),
            packages: manual_packages(),
            last_error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{Candidate, VersionInfo};
    use crate::ui::MockUI;
    use std::cell::{Cell, RefCell};
    use std::path::PathBuf;

    type StrategyResult = std::result::Result<(), String>;

    fn runtime() -> Runtime {
        Runtime {
            candidate: Candidate::command("python3"),
            version: VersionInfo::new(3, 11),
        }
    }

    fn manifest() -> PathBuf {
        PathBuf::from("/nonexistent/thsrc/requirements.txt")
    }

    #[test]
    fn importable_dependencies_skip_installation_every_time() {
        let installs = Cell::new(0);
        let probe = |_: &CommandLine| true;
        let run = |_: &InstallStrategy, _: OutputMode| -> StrategyResult {
            installs.set(installs.get() + 1);
            Ok(())
        };
        let ctx = InstallerContext {
            probe_imports: &probe,
            run_strategy: &run,
        };
        let installer = DependencyInstaller::new(&manifest(), OutputMode::Piped, &ctx);
        let mut ui = MockUI::new();

        for _ in 0..2 {
            let outcome = installer.ensure_installed(&runtime(), &mut ui).unwrap();
            assert_eq!(outcome, InstallOutcome::AlreadySatisfied);
        }
        assert_eq!(installs.get(), 0);
        assert!(ui.messages().is_empty());
    }

    #[test]
    fn stops_at_first_successful_strategy() {
        let attempted = RefCell::new(Vec::new());
        let probe = |_: &CommandLine| false;
        let run = |s: &InstallStrategy, _: OutputMode| -> StrategyResult {
            attempted.borrow_mut().push(s.label);
            if s.label == "user" {
                Err("externally-managed-environment".to_string())
            } else {
                Ok(())
            }
        };
        let ctx = InstallerContext {
            probe_imports: &probe,
            run_strategy: &run,
        };
        let installer = DependencyInstaller::new(&manifest(), OutputMode::Interactive, &ctx)
            .with_platform(Platform::Windows);
        let mut ui = MockUI::new();

        let outcome = installer.ensure_installed(&runtime(), &mut ui).unwrap();
        assert_eq!(
            outcome,
            InstallOutcome::Installed {
                strategy: "break-system-packages"
            }
        );
        // The Windows launcher strategy after it never runs.
        assert_eq!(*attempted.borrow(), vec!["user", "break-system-packages"]);
        assert!(ui.has_success("Dependencies installed"));
    }

    #[test]
    fn all_strategies_failing_reports_last_error() {
        let attempts = Cell::new(0);
        let probe = |_: &CommandLine| false;
        let run = |s: &InstallStrategy, _: OutputMode| -> StrategyResult {
            attempts.set(attempts.get() + 1);
            Err(format!("{} failed", s.label))
        };
        let ctx = InstallerContext {
            probe_imports: &probe,
            run_strategy: &run,
        };
        let installer = DependencyInstaller::new(&manifest(), OutputMode::Piped, &ctx)
            .with_platform(Platform::Linux);
        let mut ui = MockUI::new();

        let err = installer.ensure_installed(&runtime(), &mut ui).unwrap_err();
        assert_eq!(attempts.get(), 2);
        let LauncherError::InstallFailed {
            runtime,
            packages,
            last_error,
        } = err
        else {
            panic!("expected InstallFailed");
        };
        assert_eq!(runtime, "python3");
        assert_eq!(last_error, "break-system-packages failed");
        assert!(packages.contains(&"fastmcp".to_string()));
    }

    #[test]
    fn piped_mode_passes_mode_and_quiet_flag() {
        let seen = RefCell::new(Vec::new());
        let probe = |_: &CommandLine| false;
        let run = |s: &InstallStrategy, mode: OutputMode| -> StrategyResult {
            seen.borrow_mut().push((mode, s.command.args.contains(&"--quiet".to_string())));
            Ok(())
        };
        let ctx = InstallerContext {
            probe_imports: &probe,
            run_strategy: &run,
        };
        let installer = DependencyInstaller::new(&manifest(), OutputMode::Piped, &ctx);
        installer
            .ensure_installed(&runtime(), &mut MockUI::new())
            .unwrap();
        assert_eq!(*seen.borrow(), vec![(OutputMode::Piped, true)]);
    }

    #[test]
    fn virtualenv_strategy_is_tried_first() {
        let probe = |_: &CommandLine| false;
        let run = |_: &InstallStrategy, _: OutputMode| -> StrategyResult { Ok(()) };
        let ctx = InstallerContext {
            probe_imports: &probe,
            run_strategy: &run,
        };
        let installer = DependencyInstaller::new(&manifest(), OutputMode::Piped, &ctx)
            .with_virtualenv(true);
        let outcome = installer
            .ensure_installed(&runtime(), &mut MockUI::new())
            .unwrap();
        assert_eq!(
            outcome,
            InstallOutcome::Installed {
                strategy: "virtualenv"
            }
        );
    }

    #[test]
    fn probe_receives_import_command() {
        let probed = RefCell::new(None);
        let probe = |line: &CommandLine| {
            *probed.borrow_mut() = Some(line.display());
            true
        };
        let run = |_: &InstallStrategy, _: OutputMode| -> StrategyResult { Ok(()) };
        let ctx = InstallerContext {
            probe_imports: &probe,
            run_strategy: &run,
        };
        DependencyInstaller::new(&manifest(), OutputMode::Piped, &ctx)
            .ensure_installed(&runtime(), &mut MockUI::new())
            .unwrap();
        let shown = probed.borrow().clone().unwrap();
        assert!(shown.starts_with("python3 -c"));
        assert!(shown.contains("import httpx, fastmcp, dotenv"));
    }
}
