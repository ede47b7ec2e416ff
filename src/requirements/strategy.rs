//! Dependency probe and installation strategy definitions.

use std::path::{Path, PathBuf};

use crate::runtime::Runtime;
use crate::shell::{CommandLine, Platform};

/// Modules the server script imports at startup.
pub const REQUIRED_MODULES: &[&str] = &["httpx", "fastmcp", "dotenv"];

/// Distributions providing [`REQUIRED_MODULES`], used when the manifest is absent.
pub const REQUIRED_PACKAGES: &[&str] = &["httpx", "fastmcp>=2.11.0", "python-dotenv"];

/// Where pip should take the package list from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageSource {
    /// A requirements file shipped next to the server script.
    Manifest(PathBuf),
    /// An explicit list of requirement specifiers.
    Packages(Vec<String>),
}

impl PackageSource {
    /// Use the manifest when it exists, the built-in package list otherwise.
    pub fn resolve(manifest: &Path) -> Self {
        if manifest.is_file() {
            PackageSource::Manifest(manifest.to_path_buf())
        } else {
            tracing::debug!(
                "No manifest at {}, using built-in package list",
                manifest.display()
            );
            PackageSource::Packages(REQUIRED_PACKAGES.iter().map(|p| p.to_string()).collect())
        }
    }

    /// Arguments appended to `pip install`.
    pub fn pip_args(&self) -> Vec<String> {
        match self {
            PackageSource::Manifest(path) => {
                vec!["-r".to_string(), path.to_string_lossy().to_string()]
            }
            PackageSource::Packages(packages) => packages.clone(),
        }
    }
}

/// Package names suggested in manual remediation text.
pub fn manual_packages() -> Vec<String> {
    REQUIRED_PACKAGES
        .iter()
        .map(|p| p.split(['>', '=', '<']).next().unwrap_or(p).to_string())
        .collect()
}

/// Command that exits 0 only when every required module imports.
pub fn import_probe(runtime: &Runtime) -> CommandLine {
    runtime
        .invocation()
        .with_args(&["-c", &format!("import {}", REQUIRED_MODULES.join(", "))])
}

/// One way of installing the dependencies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallStrategy {
    /// Short name for logs.
    pub label: &'static str,
    /// The full pip invocation.
    pub command: CommandLine,
}

/// Host facts that shape the strategy list.
#[derive(Debug, Clone, Copy)]
pub struct StrategyOptions {
    pub platform: Platform,
    /// A virtual environment is active (`VIRTUAL_ENV` set).
    pub in_virtualenv: bool,
    /// Append pip's `--quiet` flag.
    pub quiet: bool,
}

/// Build the ordered strategy list, least invasive first.
///
/// 1. plain install, only inside a virtual environment
/// 2. `--user` install
/// 3. `--user --break-system-packages`, for PEP 668 externally-managed installs
/// 4. on Windows, the same `--user` install through the `py -3` launcher
pub fn install_strategies(
    runtime: &Runtime,
    source: &PackageSource,
    options: &StrategyOptions,
) -> Vec<InstallStrategy> {
    let pip = |base: &CommandLine, flags: &[&str]| -> CommandLine {
        let mut line = base.with_args(&["-m", "pip", "install"]).with_args(flags);
        if options.quiet {
            line = line.with_args(&["--quiet"]);
        }
        line.with_args(&source.pip_args())
    };

    let base = runtime.invocation();
    let mut strategies = Vec::new();

    if options.in_virtualenv {
        strategies.push(InstallStrategy {
            label: "virtualenv",
            command: pip(base, &[]),
        });
    }

    strategies.push(InstallStrategy {
        label: "user",
        command: pip(base, &["--user"]),
    });

    strategies.push(InstallStrategy {
        label: "break-system-packages",
        command: pip(base, &["--user", "--break-system-packages"]),
    });

    if options.platform.is_windows() && !runtime.candidate.is_py_launcher() {
        strategies.push(InstallStrategy {
            label: "py-launcher",
            command: pip(&CommandLine::new("py").with_args(&["-3"]), &["--user"]),
        });
    }

    strategies
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{Candidate, VersionInfo};

    fn runtime(candidate: Candidate) -> Runtime {
        Runtime {
            candidate,
            version: VersionInfo::new(3, 12),
        }
    }

    fn options(platform: Platform, in_virtualenv: bool, quiet: bool) -> StrategyOptions {
        StrategyOptions {
            platform,
            in_virtualenv,
            quiet,
        }
    }

    fn manifest() -> PackageSource {
        PackageSource::Manifest(PathBuf::from("/srv/thsrc/requirements.txt"))
    }

    #[test]
    fn import_probe_imports_every_module() {
        let line = import_probe(&runtime(Candidate::command("python3")));
        assert_eq!(
            line.tokens(),
            vec!["python3", "-c", "import httpx, fastmcp, dotenv"]
        );
    }

    #[test]
    fn unix_strategies_go_from_user_to_override() {
        let list = install_strategies(
            &runtime(Candidate::command("python3")),
            &manifest(),
            &options(Platform::Linux, false, false),
        );
        let labels: Vec<_> = list.iter().map(|s| s.label).collect();
        assert_eq!(labels, vec!["user", "break-system-packages"]);
        assert_eq!(
            list[0].command.tokens(),
            vec![
                "python3",
                "-m",
                "pip",
                "install",
                "--user",
                "-r",
                "/srv/thsrc/requirements.txt"
            ]
        );
        assert!(list[1]
            .command
            .args
            .contains(&"--break-system-packages".to_string()));
    }

    #[test]
    fn virtualenv_install_comes_first_without_user_flag() {
        let list = install_strategies(
            &runtime(Candidate::command("python3")),
            &manifest(),
            &options(Platform::Linux, true, false),
        );
        assert_eq!(list[0].label, "virtualenv");
        assert!(!list[0].command.args.contains(&"--user".to_string()));
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn quiet_flag_added_when_piped() {
        let list = install_strategies(
            &runtime(Candidate::command("python3")),
            &manifest(),
            &options(Platform::Linux, false, true),
        );
        assert!(list
            .iter()
            .all(|s| s.command.args.contains(&"--quiet".to_string())));
    }

    #[test]
    fn windows_adds_launcher_strategy_last() {
        let list = install_strategies(
            &runtime(Candidate::command("python")),
            &manifest(),
            &options(Platform::Windows, false, false),
        );
        let last = list.last().unwrap();
        assert_eq!(last.label, "py-launcher");
        assert_eq!(last.command.program, "py");
        assert_eq!(&last.command.args[..4], &["-3", "-m", "pip", "install"]);
    }

    #[test]
    fn windows_launcher_runtime_skips_duplicate_strategy() {
        let list = install_strategies(
            &runtime(Candidate::launcher("py", "-3")),
            &manifest(),
            &options(Platform::Windows, false, false),
        );
        assert!(list.iter().all(|s| s.label != "py-launcher"));
    }

    #[test]
    fn shell_runtime_keeps_shell_for_installs() {
        let shim = Candidate::path(
            r"C:\Users\amy\.pyenv\pyenv-win\shims\python.bat",
            crate::runtime::CandidateTier::VersionManager,
        );
        let list = install_strategies(
            &runtime(shim),
            &manifest(),
            &options(Platform::Windows, false, false),
        );
        assert!(list[0].command.requires_shell);
    }

    #[test]
    fn missing_manifest_falls_back_to_package_list() {
        let temp = tempfile::TempDir::new().unwrap();
        let source = PackageSource::resolve(&temp.path().join("requirements.txt"));
        assert_eq!(
            source.pip_args(),
            vec!["httpx", "fastmcp>=2.11.0", "python-dotenv"]
        );
    }

    #[test]
    fn existing_manifest_is_used() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("requirements.txt");
        std::fs::write(&path, "httpx\nfastmcp>=2.11.0\n").unwrap();
        assert_eq!(PackageSource::resolve(&path), PackageSource::Manifest(path));
    }

    #[test]
    fn manual_packages_strip_specifiers() {
        assert_eq!(manual_packages(), vec!["httpx", "fastmcp", "python-dotenv"]);
    }
}
