//! Python dependency checking and installation.
//!
//! # Modules
//!
//! - [`installer`] - Import probe plus ordered install fallback
//! - [`strategy`] - Required modules, package sources, and pip strategies

pub mod installer;
pub mod strategy;

pub use installer::{default_context, DependencyInstaller, InstallOutcome, InstallerContext};
pub use strategy::{
    import_probe, install_strategies, InstallStrategy, PackageSource, REQUIRED_MODULES,
    REQUIRED_PACKAGES,
};
