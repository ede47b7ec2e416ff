//! Launch configuration.
//!
//! Resolves where the server script lives and which interpreter the user
//! asked for. Flags and environment overrides arrive through [`crate::cli`].

use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::error::{LauncherError, Result};
use crate::ui::OutputMode;

/// File name of the server script.
pub const SCRIPT_NAME: &str = "thsrc.py";

/// File name of the dependency manifest.
pub const MANIFEST_NAME: &str = "requirements.txt";

/// Paths of the files shipped next to the launcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerLayout {
    /// Directory holding the script and manifest.
    pub dir: PathBuf,
    /// Absolute path of the server script.
    pub script: PathBuf,
    /// Absolute path of the dependency manifest.
    pub manifest: PathBuf,
}

impl ServerLayout {
    /// Layout rooted at `dir`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            script: dir.join(SCRIPT_NAME),
            manifest: dir.join(MANIFEST_NAME),
            dir,
        }
    }

    /// Layout rooted at the directory of the running executable.
    ///
    /// Symlinks are resolved first, so a launcher linked into `~/.local/bin`
    /// still finds the script it was installed with.
    pub fn beside_executable() -> Result<Self> {
        let exe = std::env::current_exe()?;
        let exe = exe.canonicalize().unwrap_or(exe);
        let dir = exe.parent().ok_or_else(|| {
            LauncherError::Other(anyhow::anyhow!(
                "executable path {} has no parent directory",
                exe.display()
            ))
        })?;
        Ok(Self::in_dir(dir))
    }

    /// Use `override_dir` when given, otherwise the executable's directory.
    pub fn resolve(override_dir: Option<&Path>) -> Result<Self> {
        match override_dir {
            Some(dir) => Ok(Self::in_dir(absolutize(dir)?)),
            None => Self::beside_executable(),
        }
    }
}

fn absolutize(dir: &Path) -> Result<PathBuf> {
    if dir.is_absolute() {
        Ok(dir.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(dir))
    }
}

/// Everything `main` resolves before the bootstrap pipeline starts.
#[derive(Debug, Clone)]
pub struct LaunchConfig {
    pub layout: ServerLayout,
    /// Interpreter requested with `--python` or `THSRC_PYTHON`.
    pub python_override: Option<String>,
    pub mode: OutputMode,
}

impl LaunchConfig {
    /// Resolve the configuration from parsed arguments.
    pub fn from_cli(cli: &Cli, mode: OutputMode) -> Result<Self> {
        let layout = ServerLayout::resolve(cli.server_dir.as_deref())?;
        let python_override = cli
            .python
            .as_ref()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());

        tracing::debug!("Server directory: {}", layout.dir.display());

        Ok(Self {
            layout,
            python_override,
            mode,
        })
    }
}
