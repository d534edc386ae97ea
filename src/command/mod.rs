//! Subcommand implementations
//!
//! Every command receives its options as a plain struct and its external
//! collaborators as trait objects, so the whole flow runs against mocks in
//! tests.
//!
//! - [`upgrade`]: `upgrade-go-version` and `upgrade-eks-distro-version`
//! - [`build_images`]: `build-prow-images`

pub mod build_images;
pub mod upgrade;

use thiserror::Error;

use crate::github::SubmitError;
use crate::image::BuildError;
use crate::manifest::error::ConfigError;
use crate::version::error::{RegistryError, VersionError};

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Version(#[from] VersionError),

    #[error("Unable to list tags of {repository}: {source}")]
    Registry {
        repository: String,
        source: RegistryError,
    },

    #[error("Unable to submit pull request: {0}")]
    Submission(#[from] SubmitError),

    #[error("Unable to build image: {0}")]
    Build(#[from] BuildError),
}

impl CommandError {
    /// Process exit code for this error category
    pub fn exit_code(&self) -> u8 {
        match self {
            CommandError::Config(_) => 2,
            CommandError::Version(_) => 3,
            CommandError::Registry { .. } => 4,
            CommandError::Submission(_) => 5,
            CommandError::Build(_) => 6,
        }
    }
}
