//! Interpreter candidate lists.
//!
//! The launcher never asks the user where Python lives. It walks a fixed,
//! ordered list of places an interpreter usually is on each platform, most
//! reliable first:
//!
//! - an explicit override (`THSRC_PYTHON`)
//! - on Windows, the `py -3` launcher, which picks the newest registered 3.x
//! - plain command names resolved through PATH
//! - version manager shims (pyenv, pyenv-win) that may not be on PATH in a
//!   non-login shell
//! - well-known absolute install locations
//! - on Windows, per-user install locations guessed from the profile
//!
//! The list is a pure function of the platform and an environment lookup so
//! it can be tested without touching the host.

use std::env::VarError;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::shell::{CommandLine, Platform};

/// Minor versions of Python 3 guessed for absolute install paths, newest first.
const KNOWN_MINORS: std::ops::RangeInclusive<u32> = 8..=13;

/// Where a candidate came from, in decreasing order of trust.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateTier {
    /// Explicitly configured by the user.
    Override,
    /// A version-aware launcher (`py -3`).
    Launcher,
    /// A bare command name resolved through PATH.
    PathCommand,
    /// A version manager shim.
    VersionManager,
    /// A well-known absolute install location.
    KnownLocation,
    /// A location guessed from the current user's profile.
    UserProfile,
}

/// One way of invoking an interpreter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Tokens used to run the interpreter (and whether a shell is needed).
    pub invocation: CommandLine,
    /// Where the candidate came from.
    pub tier: CandidateTier,
}

impl Candidate {
    /// A bare command name looked up through PATH.
    pub fn command(program: &str) -> Self {
        Self {
            invocation: CommandLine::new(program),
            tier: CandidateTier::PathCommand,
        }
    }

    /// A launcher plus version selector, e.g. `py -3`.
    pub fn launcher(program: &str, selector: &str) -> Self {
        Self {
            invocation: CommandLine::new(program).with_args(&[selector]),
            tier: CandidateTier::Launcher,
        }
    }

    /// An absolute path to an interpreter.
    pub fn path(path: impl AsRef<str>, tier: CandidateTier) -> Self {
        let path = path.as_ref();
        let mut invocation = CommandLine::new(path);
        if is_script_shim(path) {
            invocation = invocation.through_shell();
        }
        Self { invocation, tier }
    }

    /// Whether this is the Windows `py` launcher.
    pub fn is_py_launcher(&self) -> bool {
        self.tier == CandidateTier::Launcher
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.invocation.display())
    }
}

/// Batch and cmd shims can't be spawned directly.
fn is_script_shim(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    lower.ends_with(".bat") || lower.ends_with(".cmd")
}

/// Build the ordered, de-duplicated candidate list for a platform.
///
/// `python_override` is placed first when present. `home` is the user's home
/// directory, used for version manager shims on Unix.
pub fn candidates_for<F>(
    platform: Platform,
    python_override: Option<&str>,
    home: Option<&Path>,
    env_fn: &F,
) -> Vec<Candidate>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    let mut list = Vec::new();

    if let Some(value) = python_override.map(str::trim).filter(|v| !v.is_empty()) {
        list.push(Candidate::path(value, CandidateTier::Override));
    }

    if platform.is_windows() {
        list.extend(windows_candidates(env_fn));
    } else {
        list.extend(unix_candidates(home, env_fn));
    }

    dedup_candidates(list)
}

/// Build the candidate list for the current host.
pub fn host_candidates(python_override: Option<&str>) -> Vec<Candidate> {
    let home = dirs::home_dir();
    candidates_for(
        Platform::current(),
        python_override,
        home.as_deref(),
        &|key: &str| std::env::var(key),
    )
}

fn windows_candidates<F>(env_fn: &F) -> Vec<Candidate>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    let mut list = vec![
        Candidate::launcher("py", "-3"),
        Candidate::command("python"),
        Candidate::command("python3"),
    ];

    // pyenv-win exports PYENV pointing at its own root.
    let pyenv_root = non_empty(env_fn, "PYENV").or_else(|| {
        non_empty(env_fn, "USERPROFILE").map(|p| format!(r"{}\.pyenv\pyenv-win", p))
    });
    if let Some(root) = pyenv_root {
        list.push(Candidate::path(
            format!(r"{}\shims\python.bat", root.trim_end_matches('\\')),
            CandidateTier::VersionManager,
        ));
    }

    for minor in KNOWN_MINORS.rev() {
        list.push(Candidate::path(
            format!(r"C:\Python3{}\python.exe", minor),
            CandidateTier::KnownLocation,
        ));
        list.push(Candidate::path(
            format!(r"C:\Program Files\Python3{}\python.exe", minor),
            CandidateTier::KnownLocation,
        ));
    }

    let local_app_data = non_empty(env_fn, "LOCALAPPDATA").or_else(|| {
        non_empty(env_fn, "USERNAME").map(|user| format!(r"C:\Users\{}\AppData\Local", user))
    });
    if let Some(base) = local_app_data {
        for minor in KNOWN_MINORS.rev() {
            list.push(Candidate::path(
                format!(r"{}\Programs\Python\Python3{}\python.exe", base, minor),
                CandidateTier::UserProfile,
            ));
        }
    }

    list
}

fn unix_candidates<F>(home: Option<&Path>, env_fn: &F) -> Vec<Candidate>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    let mut list = vec![Candidate::command("python3"), Candidate::command("python")];

    let pyenv_root = non_empty(env_fn, "PYENV_ROOT")
        .map(PathBuf::from)
        .or_else(|| home.map(|h| h.join(".pyenv")));
    if let Some(root) = pyenv_root {
        list.push(Candidate::path(
            root.join("shims").join("python3").to_string_lossy(),
            CandidateTier::VersionManager,
        ));
    }

    for path in [
        "/usr/local/bin/python3",
        "/opt/homebrew/bin/python3",
        "/usr/bin/python3",
    ] {
        list.push(Candidate::path(path, CandidateTier::KnownLocation));
    }

    list
}

fn non_empty<F>(env_fn: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    env_fn(key).ok().filter(|v| !v.trim().is_empty())
}

/// Drop repeated invocations, keeping the first (highest-priority) one.
fn dedup_candidates(list: Vec<Candidate>) -> Vec<Candidate> {
    let mut unique: Vec<Candidate> = Vec::with_capacity(list.len());
    for candidate in list {
        if !unique.iter().any(|c| c.invocation == candidate.invocation) {
            unique.push(candidate);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Result<String, VarError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned().ok_or(VarError::NotPresent)
    }

    fn labels(list: &[Candidate]) -> Vec<String> {
        list.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn windows_prefers_launcher_then_commands() {
        let list = candidates_for(Platform::Windows, None, None, &env_from(&[]));
        let shown = labels(&list);
        assert_eq!(shown[0], "py -3");
        assert_eq!(shown[1], "python");
        assert_eq!(shown[2], "python3");
        assert_eq!(list[0].tier, CandidateTier::Launcher);
        assert!(list[0].is_py_launcher());
    }

    #[test]
    fn windows_known_locations_are_newest_first() {
        let list = candidates_for(Platform::Windows, None, None, &env_from(&[]));
        let known: Vec<_> = list
            .iter()
            .filter(|c| c.tier == CandidateTier::KnownLocation)
            .map(|c| c.invocation.program.clone())
            .collect();
        assert_eq!(known[0], r"C:\Python313\python.exe");
        assert_eq!(known[1], r"C:\Program Files\Python313\python.exe");
        assert_eq!(known.last().unwrap(), r"C:\Program Files\Python38\python.exe");
    }

    #[test]
    fn windows_user_profile_tier_comes_last() {
        let list = candidates_for(
            Platform::Windows,
            None,
            None,
            &env_from(&[("LOCALAPPDATA", r"C:\Users\amy\AppData\Local")]),
        );
        let last = list.last().unwrap();
        assert_eq!(last.tier, CandidateTier::UserProfile);
        assert_eq!(
            last.invocation.program,
            r"C:\Users\amy\AppData\Local\Programs\Python\Python38\python.exe"
        );
    }

    #[test]
    fn windows_user_profile_falls_back_to_username() {
        let list = candidates_for(
            Platform::Windows,
            None,
            None,
            &env_from(&[("USERNAME", "amy")]),
        );
        assert!(list.iter().any(|c| c.invocation.program
            == r"C:\Users\amy\AppData\Local\Programs\Python\Python313\python.exe"));
    }

    #[test]
    fn windows_without_profile_skips_user_tier() {
        let list = candidates_for(Platform::Windows, None, None, &env_from(&[]));
        assert!(list.iter().all(|c| c.tier != CandidateTier::UserProfile));
        assert!(list.iter().all(|c| c.tier != CandidateTier::VersionManager));
    }

    #[test]
    fn windows_pyenv_shim_requires_shell() {
        let list = candidates_for(
            Platform::Windows,
            None,
            None,
            &env_from(&[("USERPROFILE", r"C:\Users\amy")]),
        );
        let shim = list
            .iter()
            .find(|c| c.tier == CandidateTier::VersionManager)
            .unwrap();
        assert_eq!(
            shim.invocation.program,
            r"C:\Users\amy\.pyenv\pyenv-win\shims\python.bat"
        );
        assert!(shim.invocation.requires_shell);
    }

    #[test]
    fn unix_order_is_commands_then_shims_then_paths() {
        let home = PathBuf::from("/home/amy");
        let list = candidates_for(Platform::Linux, None, Some(&home), &env_from(&[]));
        let shown = labels(&list);
        assert_eq!(
            shown,
            vec![
                "python3",
                "python",
                "/home/amy/.pyenv/shims/python3",
                "/usr/local/bin/python3",
                "/opt/homebrew/bin/python3",
                "/usr/bin/python3",
            ]
        );
        assert!(list.iter().all(|c| !c.invocation.requires_shell));
    }

    #[test]
    fn unix_respects_pyenv_root() {
        let home = PathBuf::from("/home/amy");
        let list = candidates_for(
            Platform::MacOS,
            None,
            Some(&home),
            &env_from(&[("PYENV_ROOT", "/opt/pyenv")]),
        );
        assert!(list
            .iter()
            .any(|c| c.invocation.program == "/opt/pyenv/shims/python3"));
        assert!(!list
            .iter()
            .any(|c| c.invocation.program.starts_with("/home/amy")));
    }

    #[test]
    fn override_comes_first() {
        let list = candidates_for(
            Platform::Linux,
            Some("/opt/python/bin/python3.12"),
            None,
            &env_from(&[]),
        );
        assert_eq!(list[0].tier, CandidateTier::Override);
        assert_eq!(list[0].invocation.program, "/opt/python/bin/python3.12");
        assert_eq!(list[1].to_string(), "python3");
    }

    #[test]
    fn blank_override_is_ignored() {
        let list = candidates_for(Platform::Linux, Some("  "), None, &env_from(&[]));
        assert_eq!(list[0].to_string(), "python3");
    }

    #[test]
    fn duplicate_override_keeps_first_position() {
        let list = candidates_for(Platform::Linux, Some("python3"), None, &env_from(&[]));
        assert_eq!(list[0].tier, CandidateTier::Override);
        assert_eq!(
            list.iter().filter(|c| c.to_string() == "python3").count(),
            1
        );
    }
}
