//! acct profile discovery
//!
//! Credentials live in a YAML "acct" file, grouped by provider and then by
//! profile name:
//!
//! ```yaml
//! azurerm:
//!   default:
//!     subscription_id: 00000000-0000-0000-0000-000000000000
//!     tenant: contoso.onmicrosoft.com
//!     client_id: ...
//!     secret: ...
//!   china:
//!     subscription_id: ...
//!     cloud_environment: AZURE_CHINA_CLOUD
//! ```

pub mod error;

pub use error::*;

use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Environment variable naming an acct file directly
pub const ACCT_FILE_ENV: &str = "ARMFLOW_ACCT_FILE";

/// Provider key under which Azure profiles are stored
pub const PROVIDER_KEY: &str = "azurerm";

/// Profile used when none is named
pub const DEFAULT_PROFILE: &str = "default";

const CANDIDATES: [&str; 2] = ["acct.local.yaml", "acct.yaml"];

/// Global armflow config directory (`~/.config/armflow`)
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("armflow"))
}

/// Find the acct file
///
/// Search order:
/// 1. `ARMFLOW_ACCT_FILE` (when the path exists)
/// 2. current directory: acct.local.yaml, acct.yaml
/// 3. `./.armflow/`, same order
/// 4. `~/.config/armflow/acct.yaml`
pub fn find_acct_file() -> Result<PathBuf> {
    if let Ok(acct_path) = std::env::var(ACCT_FILE_ENV) {
        let path = PathBuf::from(acct_path);
        if path.exists() {
            return Ok(path);
        }
    }

    let current_dir = std::env::current_dir()?;
    find_acct_file_in(&current_dir, config_dir().as_deref())
}

fn find_acct_file_in(dir: &Path, global_dir: Option<&Path>) -> Result<PathBuf> {
    let local = CANDIDATES.iter().map(|name| dir.join(name));
    let project = CANDIDATES
        .iter()
        .map(|name| dir.join(".armflow").join(name));
    let global = global_dir.map(|g| g.join("acct.yaml"));

    local
        .chain(project)
        .chain(global)
        .find(|path| path.is_file())
        .ok_or(ConfigError::AcctFileNotFound)
}

/// Load one profile from the `azurerm` section of an acct file
pub fn load_profile<T: DeserializeOwned>(path: &Path, profile: &str) -> Result<T> {
    let mut profiles = read_profiles(path)?;
    match profiles.remove(profile) {
        Some(value) => serde_yaml::from_value(value).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        }),
        None => Err(ConfigError::ProfileNotFound {
            path: path.to_path_buf(),
            profile: profile.to_string(),
            available: profiles.keys().cloned().collect::<Vec<_>>().join(", "),
        }),
    }
}

/// Profile names defined in an acct file, sorted
pub fn list_profiles(path: &Path) -> Result<Vec<String>> {
    Ok(read_profiles(path)?.into_keys().collect())
}

fn read_profiles(path: &Path) -> Result<std::collections::BTreeMap<String, serde_yaml::Value>> {
    let content = std::fs::read_to_string(path)?;
    let parse_error = |source: serde_yaml::Error| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    };

    let mut root: serde_yaml::Mapping = serde_yaml::from_str(&content).map_err(parse_error)?;
    let section = root
        .remove(PROVIDER_KEY)
        .filter(|v| !v.is_null())
        .ok_or_else(|| ConfigError::ProviderMissing {
            path: path.to_path_buf(),
            provider: PROVIDER_KEY.to_string(),
        })?;
    serde_yaml::from_value(section).map_err(parse_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serial_test::serial;
    use std::fs;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Profile {
        subscription_id: String,
        #[serde(default)]
        tenant: Option<String>,
    }

    const ACCT: &str = "\
azurerm:
  default:
    subscription_id: sub-1
    tenant: tenant-1
  china:
    subscription_id: sub-cn
";

    #[test]
    fn test_config_dir() {
        if let Some(dir) = config_dir() {
            assert!(dir.ends_with("armflow"));
        }
    }

    #[test]
    #[serial]
    fn test_find_acct_file_in_current_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let original_dir = std::env::current_dir().unwrap();

        fs::write(temp_dir.path().join("acct.yaml"), ACCT).unwrap();
        std::env::set_current_dir(&temp_dir).unwrap();

        let result = temp_env::with_var_unset(ACCT_FILE_ENV, find_acct_file);

        std::env::set_current_dir(original_dir).unwrap();
        assert!(result.unwrap().ends_with("acct.yaml"));
    }

    #[test]
    fn test_local_file_has_priority() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join("acct.yaml"), ACCT).unwrap();
        fs::write(temp_dir.path().join("acct.local.yaml"), ACCT).unwrap();

        let found = find_acct_file_in(temp_dir.path(), None).unwrap();
        assert!(found.ends_with("acct.local.yaml"));
    }

    #[test]
    fn test_find_acct_file_in_armflow_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let armflow_dir = temp_dir.path().join(".armflow");
        fs::create_dir(&armflow_dir).unwrap();
        fs::write(armflow_dir.join("acct.yaml"), ACCT).unwrap();

        let found = find_acct_file_in(temp_dir.path(), None).unwrap();
        assert!(found.ends_with(".armflow/acct.yaml"));
    }

    #[test]
    fn test_global_file_is_last_resort() {
        let project = tempfile::tempdir().unwrap();
        let global = tempfile::tempdir().unwrap();
        fs::write(global.path().join("acct.yaml"), ACCT).unwrap();

        let found = find_acct_file_in(project.path(), Some(global.path())).unwrap();
        assert_eq!(found, global.path().join("acct.yaml"));

        fs::write(project.path().join("acct.yaml"), ACCT).unwrap();
        let found = find_acct_file_in(project.path(), Some(global.path())).unwrap();
        assert_eq!(found, project.path().join("acct.yaml"));
    }

    #[test]
    #[serial]
    fn test_find_acct_file_env_var() {
        let temp_dir = tempfile::tempdir().unwrap();
        let acct_path = temp_dir.path().join("custom.yaml");
        fs::write(&acct_path, ACCT).unwrap();

        let result = temp_env::with_var(ACCT_FILE_ENV, Some(&acct_path), find_acct_file);
        assert_eq!(result.unwrap(), acct_path);
    }

    #[test]
    fn test_find_acct_file_not_found() {
        let temp_dir = tempfile::tempdir().unwrap();

        let result = find_acct_file_in(temp_dir.path(), Some(temp_dir.path()));
        assert!(matches!(result, Err(ConfigError::AcctFileNotFound)));
    }

    #[test]
    fn test_load_profile() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("acct.yaml");
        fs::write(&path, ACCT).unwrap();

        let profile: Profile = load_profile(&path, DEFAULT_PROFILE).unwrap();
        assert_eq!(
            profile,
            Profile {
                subscription_id: "sub-1".to_string(),
                tenant: Some("tenant-1".to_string()),
            }
        );

        let china: Profile = load_profile(&path, "china").unwrap();
        assert_eq!(china.tenant, None);

        assert_eq!(list_profiles(&path).unwrap(), vec!["china", "default"]);
    }

    #[test]
    fn test_unknown_profile_lists_available() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("acct.yaml");
        fs::write(&path, ACCT).unwrap();

        let err = load_profile::<Profile>(&path, "prod").unwrap_err();
        assert!(matches!(err, ConfigError::ProfileNotFound { .. }));
        assert!(err.to_string().contains("available: china, default"));
    }

    #[test]
    fn test_missing_provider_section() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("acct.yaml");
        fs::write(&path, "aws:\n  default:\n    region: us-east-1\n").unwrap();

        let err = load_profile::<Profile>(&path, DEFAULT_PROFILE).unwrap_err();
        assert!(matches!(err, ConfigError::ProviderMissing { .. }));
    }

    #[test]
    fn test_malformed_yaml() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("acct.yaml");
        fs::write(&path, "azurerm: [unclosed").unwrap();

        let err = load_profile::<Profile>(&path, DEFAULT_PROFILE).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
