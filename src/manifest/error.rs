use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unable to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Unable to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Unable to encode {}: {source}", path.display())]
    Serialize {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Unable to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{dependency} is not configured in {}", path.display())]
    MissingDependency {
        dependency: &'static str,
        path: PathBuf,
    },
}
