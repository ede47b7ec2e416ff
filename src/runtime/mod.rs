//! Python interpreter discovery.
//!
//! # Modules
//!
//! - [`candidate`] - Ordered, platform-specific candidate lists
//! - [`locator`] - Version probing and first-match selection
//! - [`version`] - `python --version` parsing

pub mod candidate;
pub mod locator;
pub mod version;

pub use candidate::{candidates_for, host_candidates, Candidate, CandidateTier};
pub use locator::{
    probe_version, ProbeAttempt, ProbeOutcome, ProbeOutput, Runtime, RuntimeLocator,
    PROBE_TIMEOUT,
};
pub use version::{parse_version, VersionInfo, MINIMUM_VERSION};
