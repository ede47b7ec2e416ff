//! Credential checks run before anything else.

pub mod gate;

pub use gate::{check_with_env, CREDENTIAL_VARS};
