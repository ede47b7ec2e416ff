//! Required credential gate.
//!
//! The server cannot talk to the TDX API without a client id and secret, so
//! the launcher refuses to start without them rather than letting the server
//! fail on its first request.

use std::env::VarError;

use crate::error::{LauncherError, Result};

/// Variables that must be set and non-empty.
pub const CREDENTIAL_VARS: &[&str] = &["TDX_CLIENT_ID", "TDX_CLIENT_SECRET"];

/// Check the credentials against an injected lookup.
///
/// An empty value counts as missing. Every missing variable is reported,
/// in declaration order.
pub fn check_with_env<F>(env_fn: F) -> Result<()>
where
    F: Fn(&str) -> std::result::Result<String, VarError>,
{
    let missing: Vec<String> = CREDENTIAL_VARS
        .iter()
        .filter(|&&name| match env_fn(name) {
            Ok(value) => value.is_empty(),
            Err(_) => true,
        })
        .map(|name| name.to_string())
        .collect();

    if missing.is_empty() {
        tracing::debug!("Credentials present");
        Ok(())
    } else {
        tracing::debug!("Missing credentials: {}", missing.join(", "));
        Err(LauncherError::MissingCredentials { missing })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> std::result::Result<String, VarError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned().ok_or(VarError::NotPresent)
    }

    fn missing_of(result: Result<()>) -> Vec<String> {
        match result {
            Err(LauncherError::MissingCredentials { missing }) => missing,
            other => panic!("expected MissingCredentials, got {:?}", other),
        }
    }

    #[test]
    fn both_present_passes() {
        let env = env_from(&[("TDX_CLIENT_ID", "id"), ("TDX_CLIENT_SECRET", "secret")]);
        assert!(check_with_env(env).is_ok());
    }

    #[test]
    fn both_missing_reports_both() {
        let missing = missing_of(check_with_env(env_from(&[])));
        assert_eq!(missing, vec!["TDX_CLIENT_ID", "TDX_CLIENT_SECRET"]);
    }

    #[test]
    fn secret_missing_reports_secret_only() {
        let env = env_from(&[("TDX_CLIENT_ID", "id")]);
        assert_eq!(missing_of(check_with_env(env)), vec!["TDX_CLIENT_SECRET"]);
    }

    #[test]
    fn empty_value_counts_as_missing() {
        let env = env_from(&[("TDX_CLIENT_ID", ""), ("TDX_CLIENT_SECRET", "secret")]);
        assert_eq!(missing_of(check_with_env(env)), vec!["TDX_CLIENT_ID"]);
    }

    #[test]
    fn whitespace_value_is_passed_through() {
        let env = env_from(&[("TDX_CLIENT_ID", " "), ("TDX_CLIENT_SECRET", "secret")]);
        assert!(check_with_env(env).is_ok());
    }

    #[test]
    fn non_unicode_value_counts_as_missing() {
        let env = |name: &str| {
            if name == "TDX_CLIENT_ID" {
                Err(VarError::NotUnicode("\u{fffd}".into()))
            } else {
                Ok("secret".to_string())
            }
        };
        assert_eq!(missing_of(check_with_env(env)), vec!["TDX_CLIENT_ID"]);
    }
}
