//! YAML files checked into the test-infra repository
//!
//! - [`build_config`]: pinned versions of the Go runtime and EKS Distro
//! - [`images_config`]: prow image names and their versioned tags
//! - [`error`]: errors raised while reading or writing these files

pub mod build_config;
pub mod error;
pub mod images_config;

use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::manifest::error::ConfigError;

pub use build_config::{BuildConfig, DependencyConfig};
pub use images_config::ImagesConfig;

/// Read and deserialize a YAML file
pub fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize a value and overwrite the YAML file at `path`
pub fn write_yaml<T: Serialize>(path: &Path, value: &T) -> Result<(), ConfigError> {
    let content = serde_yaml::to_string(value).map_err(|source| ConfigError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;

    std::fs::write(path, content).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}
