use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "acct file not found. Looked in:\n\
        - ARMFLOW_ACCT_FILE\n\
        - current directory: acct.local.yaml, acct.yaml\n\
        - ./.armflow/ directory\n\
        - ~/.config/armflow/acct.yaml"
    )]
    AcctFileNotFound,

    #[error("{path}: no `{provider}` section")]
    ProviderMissing { path: PathBuf, provider: String },

    #[error("{path}: profile `{profile}` not found (available: {available})")]
    ProfileNotFound {
        path: PathBuf,
        profile: String,
        available: String,
    },

    #[error("{path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
