//! Image builder trait

#[cfg(test)]
use mockall::automock;

use thiserror::Error;

/// A single image build-and-push
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    /// Dockerfile path inside the build context (e.g., "Dockerfile.deploy")
    pub dockerfile: String,
    /// Fully qualified destination, tag included
    pub destination: String,
    /// Build context URL or directory
    pub context: String,
}

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Unable to start {executor}: {source}")]
    Spawn {
        executor: String,
        source: std::io::Error,
    },

    #[error("Build of {destination} failed with {status}: {output}")]
    Failed {
        destination: String,
        status: std::process::ExitStatus,
        output: String,
    },
}

/// Trait for building and pushing an image
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait ImageBuilder: Send + Sync {
    async fn build(&self, request: &BuildRequest) -> Result<(), BuildError>;
}
