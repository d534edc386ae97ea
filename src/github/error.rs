use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SubmitError {
    /// An open pull request already tracks the branch. Re-runs hit this after
    /// a previous run already opened the PR.
    #[error("A pull request already exists for {branch}")]
    AlreadyExists { branch: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("GitHub API returned {status} for {endpoint}: {message}")]
    Api {
        status: u16,
        endpoint: String,
        message: String,
    },

    #[error("Unable to read {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Path {} cannot be mapped into the repository", path.display())]
    InvalidPath { path: PathBuf },

    #[error("GitHub token is not configured")]
    MissingToken,
}
