//! `build_config.yaml`: pinned dependency versions
//!
//! ```yaml
//! go:
//!   repository: docker/library/golang
//!   current_version: 1.21.0
//! eks_distro:
//!   repository: eks-distro-build-tooling/eks-distro-minimal-base
//!   current_version: 2023.9.6
//! ```

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::dependency::Dependency;
use crate::manifest::error::ConfigError;
use crate::manifest::{read_yaml, write_yaml};

/// Registry location and recorded version of a single dependency
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DependencyConfig {
    pub repository: String,
    pub current_version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct BuildConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub go: Option<DependencyConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eks_distro: Option<DependencyConfig>,
    /// Keys this tool does not manage, written back untouched
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_yaml::Value>,
}

impl BuildConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        read_yaml(path)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        write_yaml(path, self)
    }

    pub fn dependency(&self, dependency: Dependency) -> Option<&DependencyConfig> {
        match dependency {
            Dependency::Go => self.go.as_ref(),
            Dependency::EksDistro => self.eks_distro.as_ref(),
        }
    }

    pub fn dependency_mut(&mut self, dependency: Dependency) -> Option<&mut DependencyConfig> {
        match dependency {
            Dependency::Go => self.go.as_mut(),
            Dependency::EksDistro => self.eks_distro.as_mut(),
        }
    }
}
