//! The bootstrap pipeline: credentials, interpreter, dependencies, server.
//!
//! Each stage either hands its result to the next or ends the run with a
//! [`LauncherError`]. Nothing is retried across stages.

use std::env::VarError;
use std::path::Path;

use crate::config::LaunchConfig;
use crate::environment;
use crate::error::{LauncherError, Result};
use crate::requirements::{default_context, DependencyInstaller, InstallerContext};
use crate::runtime::{
    host_candidates, probe_version, Candidate, ProbeOutput, Runtime, RuntimeLocator,
    MINIMUM_VERSION,
};
use crate::shell::Platform;
use crate::supervisor;
use crate::ui::UserInterface;

/// Everything the pipeline touches outside the process, injectable for tests.
pub struct BootstrapContext<'a> {
    /// Environment lookup used for credentials and `VIRTUAL_ENV`.
    pub env: &'a dyn Fn(&str) -> std::result::Result<String, VarError>,
    /// Interpreter candidates in probe order.
    pub candidates: Vec<Candidate>,
    /// Runs `<candidate> --version`.
    pub probe: &'a dyn Fn(&Candidate) -> ProbeOutput,
    pub installer: InstallerContext<'a>,
    /// Runs the server script and returns its exit code.
    pub launch: &'a dyn Fn(&Runtime, &Path) -> Result<i32>,
    pub platform: Platform,
}

impl BootstrapContext<'static> {
    /// The real host: process environment, real probes, real child.
    pub fn host(config: &LaunchConfig) -> Self {
        Self {
            env: &|key| std::env::var(key),
            candidates: host_candidates(config.python_override.as_deref()),
            probe: &probe_version,
            installer: default_context(),
            launch: &supervisor::run,
            platform: Platform::current(),
        }
    }
}

/// Runs the pipeline once.
pub struct Bootstrap<'a> {
    config: &'a LaunchConfig,
    ctx: &'a BootstrapContext<'a>,
}

impl<'a> Bootstrap<'a> {
    pub fn new(config: &'a LaunchConfig, ctx: &'a BootstrapContext<'a>) -> Self {
        Self { config, ctx }
    }

    /// Run every stage and return the server's exit code.
    pub fn run(&self, ui: &mut dyn UserInterface) -> Result<i32> {
        environment::check_with_env(self.ctx.env)?;

        let runtime = self.locate(ui)?;

        let installer =
            DependencyInstaller::new(&self.config.layout.manifest, self.config.mode, &self.ctx.installer)
                .with_platform(self.ctx.platform)
                .with_virtualenv(self.in_virtualenv());
        installer.ensure_installed(&runtime, ui)?;

        let code = (self.ctx.launch)(&runtime, &self.config.layout.script)?;
        if code != 0 && ui.output_mode().shows_status() {
            ui.warning(&LauncherError::ChildAbnormalExit { code }.to_string());
        }
        Ok(code)
    }

    fn locate(&self, ui: &mut dyn UserInterface) -> Result<Runtime> {
        let mut spinner = ui.start_spinner(&format!("Looking for Python {}+...", MINIMUM_VERSION));
        let locator = RuntimeLocator::new(self.ctx.candidates.clone(), self.ctx.probe);

        match locator.locate() {
            Ok(runtime) => {
                spinner.finish_success(&format!(
                    "Using {} (Python {})",
                    runtime.candidate, runtime.version
                ));
                Ok(runtime)
            }
            Err(e) => {
                spinner.finish_error(&format!("No Python {} or newer found", MINIMUM_VERSION));
                Err(e)
            }
        }
    }

    fn in_virtualenv(&self) -> bool {
        (self.ctx.env)("VIRTUAL_ENV").is_ok_and(|v| !v.trim().is_empty())
    }
}
