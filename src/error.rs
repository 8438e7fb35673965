use std::path::PathBuf;

use derive_more::{Display, Error, From};

/// A mesh asset could not be read or parsed.
#[derive(Debug, Display, Error)]
#[display("failed to load mesh {}: {}", path.display(), message)]
pub struct AssetLoadError {
    pub path: PathBuf,
    pub message: String,
}

impl AssetLoadError {
    pub fn new(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        AssetLoadError {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

/// Fatal problems while bringing up a scene. Nothing renders after one of these.
#[derive(Debug, Display, Error, From)]
pub enum SetupError {
    #[display("could not read configuration: {_0}")]
    #[from]
    Io(std::io::Error),
    #[display("could not parse configuration: {_0}")]
    #[from]
    Yaml(serde_yaml::Error),
    #[display("{_0}")]
    #[from]
    Asset(AssetLoadError),
    #[display("invalid configuration: {reason}")]
    Invalid { reason: String },
}

impl SetupError {
    pub fn invalid(reason: impl ToString) -> Self {
        SetupError::Invalid {
            reason: reason.to_string(),
        }
    }
}
