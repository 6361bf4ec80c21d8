//! Ambient credentials from the acct file

use anyhow::Context as _;
use armflow_cloud::ConnectionAuth;
use armflow_config::{ConfigError, DEFAULT_PROFILE};
use std::path::{Path, PathBuf};

/// Load the named profile
///
/// Having no acct file at all is not an error, and neither is a missing
/// `default` profile in a discovered file: explicit credentials may still be
/// given. An explicitly named file or profile must exist.
pub fn load(acct_file: Option<&Path>, profile: &str) -> anyhow::Result<Option<ConnectionAuth>> {
    let Some(path) = locate(acct_file)? else {
        tracing::debug!("No acct file found");
        return Ok(None);
    };

    match armflow_config::load_profile::<ConnectionAuth>(&path, profile) {
        Ok(auth) => {
            tracing::debug!(path = %path.display(), profile, "Loaded acct profile");
            Ok(Some(auth))
        }
        Err(ConfigError::ProfileNotFound { .. })
            if acct_file.is_none() && profile == DEFAULT_PROFILE =>
        {
            tracing::debug!(path = %path.display(), "acct file has no default profile");
            Ok(None)
        }
        Err(e) => {
            Err(e).with_context(|| format!("failed to load profile `{}`", profile))
        }
    }
}

/// The explicit file, or the first one found by discovery
pub fn locate(acct_file: Option<&Path>) -> anyhow::Result<Option<PathBuf>> {
    if let Some(path) = acct_file {
        return Ok(Some(path.to_path_buf()));
    }
    match armflow_config::find_acct_file() {
        Ok(path) => Ok(Some(path)),
        Err(ConfigError::AcctFileNotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const ACCT: &str = "\
azurerm:
  default:
    subscription_id: sub-1
    tenant: tenant-1
    client_id: app-1
    secret: s3cret
";

    #[test]
    fn test_load_explicit_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("acct.yaml");
        fs::write(&path, ACCT).unwrap();

        let auth = load(Some(&path), DEFAULT_PROFILE).unwrap().unwrap();
        assert_eq!(auth.subscription_id.as_deref(), Some("sub-1"));
        assert_eq!(auth.client_id.as_deref(), Some("app-1"));
    }

    #[test]
    fn test_explicit_profile_must_exist() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("acct.yaml");
        fs::write(&path, ACCT).unwrap();

        let err = load(Some(&path), "prod").unwrap_err();
        assert!(err.to_string().contains("prod"));
    }

    #[test]
    fn test_explicit_file_must_exist() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("missing.yaml");

        assert!(load(Some(&path), DEFAULT_PROFILE).is_err());
    }
}
