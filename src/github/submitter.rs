//! Pull request submitter trait

#[cfg(test)]
use mockall::automock;

use std::path::PathBuf;

use crate::github::error::SubmitError;

/// A commit plus the pull request proposing it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    pub owner: String,
    pub repo: String,
    /// Branch created for the commit
    pub branch: String,
    /// Branch the pull request targets
    pub base_branch: String,
    /// Used as both the commit message and the pull request title
    pub subject: String,
    pub description: String,
    /// Local files whose current content is committed
    pub files: Vec<PathBuf>,
}

/// Trait for committing files and opening a pull request
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait PullRequestSubmitter: Send + Sync {
    /// Commits `request.files` on `request.branch` and opens a pull request
    ///
    /// # Returns
    /// * `Ok(())` - The pull request was opened
    /// * `Err(SubmitError::AlreadyExists)` - An equivalent pull request is already open
    /// * `Err(SubmitError)` - Any other failure
    async fn submit(&self, request: &PullRequest) -> Result<(), SubmitError>;

    /// Checks that `files` can be committed, before anything is written
    fn check_files(&self, _files: &[PathBuf]) -> Result<(), SubmitError> {
        Ok(())
    }
}
