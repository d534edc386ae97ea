//! GitHub REST implementation of the pull request submitter
//!
//! The commit is built through the git data API so no local git checkout or
//! credentials helper is needed:
//!
//! 1. read the base branch head
//! 2. create a tree with the new file contents on top of the base tree
//! 3. create a commit pointing at that tree
//! 4. create the branch, or force-move it when a previous run left it behind
//! 5. open the pull request

use std::path::{Component, Path, PathBuf};

use reqwest::Method;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::config::USER_AGENT;
use crate::github::error::SubmitError;
use crate::github::submitter::{PullRequest, PullRequestSubmitter};

/// Marker GitHub puts in the validation error of a duplicate pull request
const PULL_REQUEST_EXISTS: &str = "pull request already exists";

/// Marker GitHub puts in the validation error of a duplicate ref
const REFERENCE_EXISTS: &str = "reference already exists";

#[derive(Debug, Deserialize)]
struct GitRef {
    object: GitObject,
}

#[derive(Debug, Deserialize)]
struct GitObject {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct Created {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct PullResponse {
    number: u64,
    html_url: String,
}

/// Error body returned by the GitHub API
#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    errors: Vec<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: Option<String>,
}

impl ApiErrorBody {
    fn mentions(&self, marker: &str) -> bool {
        std::iter::once(self.message.as_str())
            .chain(self.errors.iter().filter_map(|e| e.message.as_deref()))
            .any(|m| m.to_lowercase().contains(marker))
    }

    fn describe(&self) -> String {
        let details: Vec<&str> = self
            .errors
            .iter()
            .filter_map(|e| e.message.as_deref())
            .collect();

        if details.is_empty() {
            self.message.clone()
        } else {
            format!("{} ({})", self.message, details.join("; "))
        }
    }
}

/// Non-success API response, kept around so callers can classify it
struct ApiFailure {
    status: reqwest::StatusCode,
    endpoint: String,
    body: ApiErrorBody,
}

impl From<ApiFailure> for SubmitError {
    fn from(failure: ApiFailure) -> Self {
        SubmitError::Api {
            status: failure.status.as_u16(),
            endpoint: failure.endpoint,
            message: failure.body.describe(),
        }
    }
}

/// Pull request submitter backed by the GitHub REST API
pub struct GitHubSubmitter {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
    repo_root: PathBuf,
}

impl GitHubSubmitter {
    /// Creates a new GitHubSubmitter
    ///
    /// # Arguments
    /// * `base_url` - GitHub API endpoint
    /// * `token` - Token used for every request; submission fails without it
    /// * `repo_root` - Local checkout root; committed files are mapped relative to it
    pub fn new(base_url: &str, token: Option<String>, repo_root: impl Into<PathBuf>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(USER_AGENT)
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            repo_root: repo_root.into(),
        }
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Value>,
    ) -> Result<Result<T, ApiFailure>, SubmitError> {
        let token = self.token.as_deref().ok_or(SubmitError::MissingToken)?;
        let url = format!("{}{}", self.base_url, endpoint);

        let mut request = self
            .client
            .request(method.clone(), &url)
            .bearer_auth(token)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28");
        if let Some(body) = body {
            request = request.json(&body);
        }

        debug!("{} {}", method, endpoint);
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.json::<ApiErrorBody>().await.unwrap_or_default();
            warn!("GitHub API returned status {}: {} {}", status, method, endpoint);
            return Ok(Err(ApiFailure {
                status,
                endpoint: endpoint.to_string(),
                body,
            }));
        }

        let parsed = response.json::<T>().await.map_err(|e| SubmitError::Api {
            status: status.as_u16(),
            endpoint: endpoint.to_string(),
            message: format!("invalid response body: {e}"),
        })?;

        Ok(Ok(parsed))
    }

    /// Local path of `file` and its path inside the repository
    fn locate(&self, file: &Path) -> Result<(PathBuf, String), SubmitError> {
        let absolute = if file.is_absolute() {
            file.to_path_buf()
        } else {
            self.repo_root.join(file)
        };
        let path = repository_path(&self.repo_root, &absolute)?;
        Ok((absolute, path))
    }

    async fn tree_entries(&self, files: &[PathBuf]) -> Result<Vec<Value>, SubmitError> {
        let mut entries = Vec::with_capacity(files.len());

        for file in files {
            let (absolute, path) = self.locate(file)?;
            let content = tokio::fs::read_to_string(&absolute)
                .await
                .map_err(|source| SubmitError::ReadFile {
                    path: absolute.clone(),
                    source,
                })?;

            entries.push(json!({
                "path": path,
                "mode": "100644",
                "type": "blob",
                "content": content,
            }));
        }

        Ok(entries)
    }
}

#[async_trait::async_trait]
impl PullRequestSubmitter for GitHubSubmitter {
    async fn submit(&self, request: &PullRequest) -> Result<(), SubmitError> {
        let repo = format!("/repos/{}/{}", request.owner, request.repo);

        let base: GitRef = self
            .call(
                Method::GET,
                &format!("{repo}/git/ref/heads/{}", request.base_branch),
                None,
            )
            .await??;
        let base_sha = base.object.sha;

        let tree: Created = self
            .call(
                Method::POST,
                &format!("{repo}/git/trees"),
                Some(json!({
                    "base_tree": base_sha,
                    "tree": self.tree_entries(&request.files).await?,
                })),
            )
            .await??;

        let commit: Created = self
            .call(
                Method::POST,
                &format!("{repo}/git/commits"),
                Some(json!({
                    "message": request.subject,
                    "tree": tree.sha,
                    "parents": [base_sha],
                })),
            )
            .await??;
        info!("Created commit {} on top of {}", commit.sha, request.base_branch);

        let created = self
            .call::<Value>(
                Method::POST,
                &format!("{repo}/git/refs"),
                Some(json!({
                    "ref": format!("refs/heads/{}", request.branch),
                    "sha": commit.sha,
                })),
            )
            .await?;

        match created {
            Ok(_) => {}
            Err(failure)
                if failure.status == reqwest::StatusCode::UNPROCESSABLE_ENTITY
                    && failure.body.mentions(REFERENCE_EXISTS) =>
            {
                info!("Branch {} already exists, moving it", request.branch);
                self.call::<Value>(
                    Method::PATCH,
                    &format!("{repo}/git/refs/heads/{}", request.branch),
                    Some(json!({ "sha": commit.sha, "force": true })),
                )
                .await??;
            }
            Err(failure) => return Err(failure.into()),
        }

        let pull = self
            .call::<PullResponse>(
                Method::POST,
                &format!("{repo}/pulls"),
                Some(json!({
                    "title": request.subject,
                    "head": request.branch,
                    "base": request.base_branch,
                    "body": request.description,
                })),
            )
            .await?;

        match pull {
            Ok(pull) => {
                info!("Opened pull request #{}: {}", pull.number, pull.html_url);
                Ok(())
            }
            Err(failure)
                if failure.status == reqwest::StatusCode::UNPROCESSABLE_ENTITY
                    && failure.body.mentions(PULL_REQUEST_EXISTS) =>
            {
                Err(SubmitError::AlreadyExists {
                    branch: request.branch.clone(),
                })
            }
            Err(failure) => Err(failure.into()),
        }
    }

    fn check_files(&self, files: &[PathBuf]) -> Result<(), SubmitError> {
        for file in files {
            self.locate(file)?;
        }
        Ok(())
    }
}

/// Map a local file to its path inside the repository
fn repository_path(repo_root: &Path, file: &Path) -> Result<String, SubmitError> {
    let invalid = || SubmitError::InvalidPath {
        path: file.to_path_buf(),
    };

    let mut normalized = PathBuf::new();
    for component in file.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    return Err(invalid());
                }
            }
            other => normalized.push(other),
        }
    }

    let relative = normalized.strip_prefix(repo_root).map_err(|_| invalid())?;
    let segments: Vec<String> = relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy().into_owned())
        .collect();

    if segments.is_empty() {
        return Err(invalid());
    }

    Ok(segments.join("/"))
}
