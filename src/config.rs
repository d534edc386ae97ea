use std::path::PathBuf;

// =============================================================================
// Defaults
// =============================================================================

/// Default path to the file recording the pinned dependency versions
pub const DEFAULT_BUILD_CONFIG_PATH: &str = "build_config.yaml";

/// Default path to the file mapping prow images to their versioned tags
pub const DEFAULT_IMAGES_CONFIG_PATH: &str = "images_config.yaml";

/// Default owner of the repository pull requests are opened against
pub const DEFAULT_SOURCE_OWNER: &str = "aws-controllers-k8s";

/// Default repository pull requests are opened against
pub const DEFAULT_SOURCE_REPO: &str = "test-infra";

/// Default base branch for pull requests
pub const DEFAULT_BASE_BRANCH: &str = "main";

/// Default container registry queried for tags
pub const DEFAULT_REGISTRY_URL: &str = "https://public.ecr.aws";

/// Default GitHub REST API endpoint
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// Repository holding the published prow images when `image_repo` names none
pub const DEFAULT_PROW_REPOSITORY: &str = "ack-infra/prow";

/// Default kaniko build context
pub const DEFAULT_BUILD_CONTEXT: &str = "git://github.com/aws-controllers-k8s/test-infra.git";

/// Location of the kaniko executor inside the build image
pub const KANIKO_EXECUTOR_PATH: &str = "/kaniko/executor";

/// Number of tags requested per registry page
pub const TAG_PAGE_SIZE: u32 = 1000;

/// User agent sent with every HTTP request
pub const USER_AGENT: &str = concat!("ack-build-tools/", env!("CARGO_PKG_VERSION"));

/// Options shared by every subcommand
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalOptions {
    pub images_config_path: PathBuf,
    pub source_owner: String,
    pub source_repo: String,
    pub base_branch: String,
    pub github_token: Option<String>,
    pub github_api_url: String,
    pub registry_url: String,
}

impl Default for GlobalOptions {
    fn default() -> Self {
        Self {
            images_config_path: PathBuf::from(DEFAULT_IMAGES_CONFIG_PATH),
            source_owner: DEFAULT_SOURCE_OWNER.to_string(),
            source_repo: DEFAULT_SOURCE_REPO.to_string(),
            base_branch: DEFAULT_BASE_BRANCH.to_string(),
            github_token: None,
            github_api_url: DEFAULT_GITHUB_API_URL.to_string(),
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
        }
    }
}
