//! Collaborator test doubles

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use ack_build_tools::github::{PullRequest, PullRequestSubmitter, SubmitError};
use ack_build_tools::version::error::RegistryError;
use ack_build_tools::version::registry::Registry;

/// Mock registry for testing
#[derive(Default)]
pub struct MockRegistry {
    tags: HashMap<String, Vec<String>>,
}

impl MockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tags(mut self, repository: &str, tags: Vec<&str>) -> Self {
        self.tags.insert(
            repository.to_string(),
            tags.into_iter().map(|t| t.to_string()).collect(),
        );
        self
    }
}

#[async_trait]
impl Registry for MockRegistry {
    async fn list_tags(&self, repository: &str) -> Result<Vec<String>, RegistryError> {
        match self.tags.get(repository) {
            Some(tags) => Ok(tags.clone()),
            None => Err(RegistryError::NotFound(repository.to_string())),
        }
    }
}

/// Submitter that records requests and answers with a fixed result
pub struct RecordingSubmitter {
    requests: Mutex<Vec<PullRequest>>,
    already_exists: bool,
}

impl RecordingSubmitter {
    pub fn new() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            already_exists: false,
        }
    }

    /// Answer every submission as if the pull request was already open
    pub fn already_exists() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            already_exists: true,
        }
    }

    pub fn requests(&self) -> Vec<PullRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PullRequestSubmitter for RecordingSubmitter {
    async fn submit(&self, request: &PullRequest) -> Result<(), SubmitError> {
        self.requests.lock().unwrap().push(request.clone());

        if self.already_exists {
            Err(SubmitError::AlreadyExists {
                branch: request.branch.clone(),
            })
        } else {
            Ok(())
        }
    }
}
