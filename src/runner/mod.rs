//! Bootstrap pipeline orchestration.

pub mod bootstrap;

pub use bootstrap::{Bootstrap, BootstrapContext};
