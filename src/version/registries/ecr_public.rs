//! Amazon ECR Public registry implementation
//!
//! Uses the OCI distribution API exposed by `public.ecr.aws`: an anonymous
//! pull token is requested first, then the tag list is paginated through the
//! `Link` response header.

use reqwest::header::{AUTHORIZATION, HeaderMap, LINK};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::{DEFAULT_REGISTRY_URL, TAG_PAGE_SIZE, USER_AGENT};
use crate::version::error::RegistryError;
use crate::version::registry::Registry;

/// Response from the anonymous token endpoint
#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: String,
}

/// Response from the tag list endpoint
#[derive(Debug, Deserialize)]
struct TagListResponse {
    #[serde(default)]
    tags: Option<Vec<String>>,
}

/// Registry implementation for ECR Public
pub struct EcrPublicRegistry {
    client: reqwest::Client,
    base_url: String,
}

impl EcrPublicRegistry {
    /// Creates a new EcrPublicRegistry with a custom base URL
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(USER_AGENT)
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn fetch_token(&self, repository: &str) -> Result<String, RegistryError> {
        let url = format!(
            "{}/token/?scope=repository:{}:pull",
            self.base_url, repository
        );

        let response = self.client.get(&url).send().await?;
        let response = check_status(response, repository, &url)?;

        let token: TokenResponse = response.json().await.map_err(|e| {
            warn!("Failed to parse ECR Public token response: {}", e);
            RegistryError::InvalidResponse(e.to_string())
        })?;

        Ok(token.token)
    }
}

impl Default for EcrPublicRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_REGISTRY_URL)
    }
}

#[async_trait::async_trait]
impl Registry for EcrPublicRegistry {
    async fn list_tags(&self, repository: &str) -> Result<Vec<String>, RegistryError> {
        let token = self.fetch_token(repository).await?;

        let mut tags = Vec::new();
        let mut next_url = Some(format!(
            "{}/v2/{}/tags/list?n={}",
            self.base_url, repository, TAG_PAGE_SIZE
        ));

        while let Some(url) = next_url.take() {
            let response = self
                .client
                .get(&url)
                .header(AUTHORIZATION, format!("Bearer {token}"))
                .send()
                .await?;
            let response = check_status(response, repository, &url)?;

            next_url = next_page_path(response.headers()).map(|path| {
                if path.starts_with("http") {
                    path
                } else {
                    format!("{}{}", self.base_url, path)
                }
            });

            let page: TagListResponse = response.json().await.map_err(|e| {
                warn!("Failed to parse ECR Public tag list response: {}", e);
                RegistryError::InvalidResponse(e.to_string())
            })?;

            let page_tags = page.tags.unwrap_or_default();
            debug!("Fetched {} tags from {}", page_tags.len(), url);
            tags.extend(page_tags);
        }

        Ok(tags)
    }
}

/// Map non-success statuses to registry errors
fn check_status(
    response: reqwest::Response,
    repository: &str,
    url: &str,
) -> Result<reqwest::Response, RegistryError> {
    let status = response.status();

    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(RegistryError::NotFound(repository.to_string()));
    }

    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Err(RegistryError::Unauthorized(repository.to_string()));
    }

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());
        return Err(RegistryError::RateLimited {
            retry_after_secs: retry_after,
        });
    }

    if !status.is_success() {
        warn!("ECR Public returned status {}: {}", status, url);
        return Err(RegistryError::InvalidResponse(format!(
            "Unexpected status: {}",
            status
        )));
    }

    Ok(response)
}

/// Extract the target of a `Link: <...>; rel="next"` header
fn next_page_path(headers: &HeaderMap) -> Option<String> {
    let link = headers.get(LINK)?.to_str().ok()?;

    link.split(',').find_map(|entry| {
        let (target, params) = entry.split_once(';')?;
        if !params.contains("rel=\"next\"") {
            return None;
        }
        let target = target.trim().strip_prefix('<')?.strip_suffix('>')?;
        Some(target.to_string())
    })
}
