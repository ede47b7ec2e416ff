//! Interpreter discovery.
//!
//! `RuntimeLocator` probes each candidate with `--version`, in list order,
//! and selects the first one reporting at least the minimum version. A later
//! candidate never wins over an earlier qualifying one, even if it is newer.

use std::fmt;
use std::time::Duration;

use crate::error::{LauncherError, Result};
use crate::shell::{execute, CommandLine, CommandOptions};

use super::candidate::Candidate;
use super::version::{parse_version, VersionInfo, MINIMUM_VERSION};

/// Ceiling for a single `--version` probe.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Raw result of running a version probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutput {
    /// The probe exited successfully with this text (stdout + stderr).
    Text(String),
    /// The probe could not be spawned or exited non-zero.
    Failed(String),
    /// The probe was killed at its ceiling.
    TimedOut,
}

/// What the locator concluded about one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Qualified(VersionInfo),
    TooOld(VersionInfo),
    Unparseable,
    Failed(String),
    TimedOut,
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeOutcome::Qualified(v) => write!(f, "Python {}", v),
            ProbeOutcome::TooOld(v) => write!(f, "Python {} is too old", v),
            ProbeOutcome::Unparseable => f.write_str("no version reported"),
            ProbeOutcome::Failed(reason) => f.write_str(reason),
            ProbeOutcome::TimedOut => write!(f, "timed out after {}s", PROBE_TIMEOUT.as_secs()),
        }
    }
}

/// One probed candidate, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeAttempt {
    pub candidate: Candidate,
    pub outcome: ProbeOutcome,
}

impl fmt::Display for ProbeAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.candidate, self.outcome)
    }
}

/// The interpreter selected for this invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Runtime {
    pub candidate: Candidate,
    pub version: VersionInfo,
}

impl Runtime {
    /// Command line that runs the interpreter.
    pub fn invocation(&self) -> &CommandLine {
        &self.candidate.invocation
    }
}

/// Walks the candidate list and picks the first compatible interpreter.
pub struct RuntimeLocator<'a> {
    candidates: Vec<Candidate>,
    minimum: VersionInfo,
    probe: &'a dyn Fn(&Candidate) -> ProbeOutput,
}

impl<'a> RuntimeLocator<'a> {
    /// Create a locator over an ordered candidate list.
    pub fn new(candidates: Vec<Candidate>, probe: &'a dyn Fn(&Candidate) -> ProbeOutput) -> Self {
        Self {
            candidates,
            minimum: MINIMUM_VERSION,
            probe,
        }
    }

    /// Override the minimum accepted version.
    pub fn with_minimum(mut self, minimum: VersionInfo) -> Self {
        self.minimum = minimum;
        self
    }

    /// Probe candidates in order and return the first qualifying one.
    pub fn locate(&self) -> Result<Runtime> {
        let mut attempted = Vec::with_capacity(self.candidates.len());

        for candidate in &self.candidates {
            let outcome = self.classify((self.probe)(candidate));
            tracing::debug!("Probed {}: {}", candidate, outcome);

            if let ProbeOutcome::Qualified(version) = outcome {
                tracing::info!("Selected {} (Python {})", candidate, version);
                return Ok(Runtime {
                    candidate: candidate.clone(),
                    version,
                });
            }

            attempted.push(ProbeAttempt {
                candidate: candidate.clone(),
                outcome,
            });
        }

        Err(LauncherError::RuntimeNotFound {
            minimum: self.minimum.to_string(),
            attempted,
        })
    }

    fn classify(&self, output: ProbeOutput) -> ProbeOutcome {
        match output {
            ProbeOutput::Text(text) => match parse_version(&text) {
                Some(v) if v.satisfies(&self.minimum) => ProbeOutcome::Qualified(v),
                Some(v) => ProbeOutcome::TooOld(v),
                None => ProbeOutcome::Unparseable,
            },
            ProbeOutput::Failed(reason) => ProbeOutcome::Failed(reason),
            ProbeOutput::TimedOut => ProbeOutcome::TimedOut,
        }
    }
}

/// Run `<candidate> --version` on the host, bounded by [`PROBE_TIMEOUT`].
pub fn probe_version(candidate: &Candidate) -> ProbeOutput {
    let line = candidate.invocation.with_args(&["--version"]);
    match execute(&line, &CommandOptions::probe(PROBE_TIMEOUT)) {
        Ok(result) if result.timed_out => ProbeOutput::TimedOut,
        Ok(result) if result.success => ProbeOutput::Text(result.combined_output()),
        Ok(result) => ProbeOutput::Failed(result.failure_summary()),
        Err(LauncherError::SpawnError { .. }) => ProbeOutput::Failed("not found".to_string()),
        Err(e) => ProbeOutput::Failed(e.to_string()),
    }
}
