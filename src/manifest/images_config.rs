//! `images_config.yaml`: prow images and their versioned tags
//!
//! ```yaml
//! image_repo: public.ecr.aws/ack-infra/prow
//! images:
//!   controller: controller-1.4.2
//!   integration-test: integration-test-0.0.9
//! ```

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::manifest::error::ConfigError;
use crate::manifest::{read_yaml, write_yaml};
use crate::version::error::VersionError;
use crate::version::resolver::increment_patch;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ImagesConfig {
    pub image_repo: String,
    /// Image name to `<name>-<major>.<minor>.<patch>` tag, in file order
    #[serde(default)]
    pub images: IndexMap<String, String>,
}

impl ImagesConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        read_yaml(path)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        write_yaml(path, self)
    }

    /// Bump the patch version of every image tag.
    ///
    /// All references are validated before any of them is changed, so a
    /// malformed entry leaves the config untouched.
    pub fn increment_patches(&mut self) -> Result<(), VersionError> {
        let patched = self
            .images
            .values()
            .map(|reference| increment_patch(reference))
            .collect::<Result<Vec<_>, _>>()?;

        for (reference, new_reference) in self.images.values_mut().zip(patched) {
            *reference = new_reference;
        }

        Ok(())
    }
}
