//! Registry trait for listing image tags from a container registry

#[cfg(test)]
use mockall::automock;

use crate::version::error::RegistryError;

/// Trait for listing the tags published for a repository
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Registry: Send + Sync {
    /// Lists every tag of a repository
    ///
    /// # Arguments
    /// * `repository` - Repository path inside the registry (e.g., "docker/library/golang")
    ///
    /// # Returns
    /// * `Ok(Vec<String>)` - Raw tags in registry order, possibly with duplicates
    /// * `Err(RegistryError)` - If the listing fails
    async fn list_tags(&self, repository: &str) -> Result<Vec<String>, RegistryError>;
}
