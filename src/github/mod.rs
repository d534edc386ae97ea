//! Pull request submission
//!
//! - [`submitter`]: `PullRequestSubmitter` trait and the request it takes
//! - [`client`]: GitHub REST implementation (git data API + pulls API)
//! - [`error`]: submission errors, including the recoverable "already exists"

pub mod client;
pub mod error;
pub mod submitter;

pub use client::GitHubSubmitter;
pub use error::SubmitError;
pub use submitter::{PullRequest, PullRequestSubmitter};
