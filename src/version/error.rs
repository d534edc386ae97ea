use thiserror::Error;

#[derive(Debug, Error)]
pub enum VersionError {
    #[error("Unable to parse version {version}: {reason}")]
    Parse { version: String, reason: String },

    #[error("No eligible versions found")]
    NoEligibleVersions,

    #[error("Invalid image reference {reference}: {reason}")]
    InvalidImageReference { reference: String, reason: String },
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Rate limited: retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Repository not found: {0}")]
    NotFound(String),

    #[error("Access denied to repository: {0}")]
    Unauthorized(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}
