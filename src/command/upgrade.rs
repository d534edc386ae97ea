//! Dependency upgrade flow
//!
//! Compares the version recorded in `build_config.yaml` with the highest
//! release published in the registry. When the registry is ahead, the build
//! config is updated, every prow image tag gets a patch bump and a pull
//! request with both files is opened.
//!
//! Re-running after a partial failure is safe: an up-to-date config is a
//! no-op and an already open pull request counts as success.

use std::path::PathBuf;

use semver::Version;
use tracing::{info, warn};

use crate::command::CommandError;
use crate::config::GlobalOptions;
use crate::dependency::Dependency;
use crate::github::{PullRequest, PullRequestSubmitter, SubmitError};
use crate::manifest::error::ConfigError;
use crate::manifest::{BuildConfig, ImagesConfig};
use crate::version::registry::Registry;
use crate::version::resolver::resolve_upgrade;

/// Options for a single dependency upgrade
#[derive(Debug, Clone, PartialEq)]
pub struct UpgradeOptions {
    pub dependency: Dependency,
    pub build_config_path: PathBuf,
    pub images_config_path: PathBuf,
    /// Queried instead of the repository recorded in the build config
    pub repository_override: Option<String>,
    pub source_owner: String,
    pub source_repo: String,
    pub base_branch: String,
}

impl UpgradeOptions {
    pub fn new(
        dependency: Dependency,
        build_config_path: PathBuf,
        repository_override: Option<String>,
        global: &GlobalOptions,
    ) -> Self {
        Self {
            dependency,
            build_config_path,
            images_config_path: global.images_config_path.clone(),
            repository_override,
            source_owner: global.source_owner.clone(),
            source_repo: global.source_repo.clone(),
            base_branch: global.base_branch.clone(),
        }
    }
}

/// What happened to the pull request of an upgrade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullRequestStatus {
    Opened,
    /// A previous run already opened it
    AlreadyExists,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpgradeOutcome {
    /// The recorded version is the latest release
    UpToDate { version: Version },
    /// Files were rewritten and a pull request submitted
    Upgraded {
        from: Version,
        to: Version,
        pull_request: PullRequestStatus,
    },
}

/// Upgrade one dependency if the registry has a newer release
pub async fn run_upgrade(
    options: &UpgradeOptions,
    registry: &dyn Registry,
    submitter: &dyn PullRequestSubmitter,
) -> Result<UpgradeOutcome, CommandError> {
    let dependency = options.dependency;
    let build_config_path = &options.build_config_path;

    let mut build_config = BuildConfig::load(build_config_path)?;
    let recorded = build_config.dependency(dependency).ok_or_else(|| {
        ConfigError::MissingDependency {
            dependency: dependency.as_str(),
            path: build_config_path.clone(),
        }
    })?;
    let current_version = recorded.current_version.clone();
    let repository = options
        .repository_override
        .clone()
        .unwrap_or_else(|| recorded.repository.clone());
    info!(
        "Current {} version in {} is {}",
        dependency,
        build_config_path.display(),
        current_version
    );

    let tags = registry
        .list_tags(&repository)
        .await
        .map_err(|source| CommandError::Registry {
            repository: repository.clone(),
            source,
        })?;
    info!("Successfully listed {} tags from {}", tags.len(), repository);

    let decision = resolve_upgrade(&tags, &current_version)?;
    info!(
        "Highest {} version in {} is {}",
        dependency, repository, decision.latest
    );

    if !decision.needs_upgrade {
        info!(
            "{} version in {} is up-to-date",
            dependency,
            build_config_path.display()
        );
        return Ok(UpgradeOutcome::UpToDate {
            version: decision.current,
        });
    }

    let latest_version = decision.latest.to_string();

    // Patch images in memory first so a malformed tag aborts before any write.
    let mut images_config = ImagesConfig::load(&options.images_config_path)?;
    images_config.increment_patches()?;

    let files = vec![
        build_config_path.clone(),
        options.images_config_path.clone(),
    ];
    submitter.check_files(&files)?;

    info!(
        "Changing {} version to {} in {}",
        dependency,
        latest_version,
        build_config_path.display()
    );
    if let Some(recorded) = build_config.dependency_mut(dependency) {
        recorded.current_version = latest_version.clone();
    }
    build_config.save(build_config_path)?;

    info!(
        "Patching prow image versions in {}",
        options.images_config_path.display()
    );
    images_config.save(&options.images_config_path)?;
    info!("Successfully patched prow image versions");

    let request = PullRequest {
        owner: options.source_owner.clone(),
        repo: options.source_repo.clone(),
        branch: dependency.commit_branch(&latest_version),
        base_branch: options.base_branch.clone(),
        subject: dependency.pr_subject(&latest_version),
        description: dependency.pr_description(&current_version, &latest_version),
        files,
    };

    info!("Committing changes and creating PR on {}", request.branch);
    let pull_request = match submitter.submit(&request).await {
        Ok(()) => {
            info!("Successfully created PR");
            PullRequestStatus::Opened
        }
        Err(SubmitError::AlreadyExists { branch }) => {
            warn!("Pull request for {} already exists", branch);
            PullRequestStatus::AlreadyExists
        }
        Err(e) => return Err(e.into()),
    };

    Ok(UpgradeOutcome::Upgraded {
        from: decision.current,
        to: decision.latest,
        pull_request,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::submitter::MockPullRequestSubmitter;
    use crate::version::error::{RegistryError, VersionError};
    use crate::version::registry::MockRegistry;
    use tempfile::TempDir;

    const BUILD_CONFIG: &str = r#"go:
  repository: docker/library/golang
  current_version: 1.20.5
eks_distro:
  repository: eks-distro-build-tooling/eks-distro-minimal-base
  current_version: 2023.9.6
"#;

    const IMAGES_CONFIG: &str = r#"image_repo: public.ecr.aws/ack-infra/prow
images:
  controller: controller-1.4.2
  integration-test: integration-test-0.0.9
"#;

    struct Workspace {
        _dir: TempDir,
        options: UpgradeOptions,
    }

    fn workspace(dependency: Dependency, build_config: &str) -> Workspace {
        let dir = TempDir::new().unwrap();
        let build_config_path = dir.path().join("build_config.yaml");
        let images_config_path = dir.path().join("images_config.yaml");
        std::fs::write(&build_config_path, build_config).unwrap();
        std::fs::write(&images_config_path, IMAGES_CONFIG).unwrap();

        let global = GlobalOptions {
            images_config_path,
            ..GlobalOptions::default()
        };
        let options = UpgradeOptions::new(dependency, build_config_path, None, &global);

        Workspace { _dir: dir, options }
    }

    fn registry_with(repository: &'static str, tags: &'static [&'static str]) -> MockRegistry {
        let mut registry = MockRegistry::new();
        registry
            .expect_list_tags()
            .withf(move |r: &str| r == repository)
            .times(1)
            .returning(move |_| Ok(tags.iter().map(|t| t.to_string()).collect()));
        registry
    }

    fn submitter_accepting_files() -> MockPullRequestSubmitter {
        let mut submitter = MockPullRequestSubmitter::new();
        submitter.expect_check_files().returning(|_| Ok(()));
        submitter
    }

    #[tokio::test]
    async fn upgrades_go_version_patches_images_and_opens_pr() {
        let ws = workspace(Dependency::Go, BUILD_CONFIG);
        let registry = registry_with(
            "docker/library/golang",
            &["1.20.5", "1.21.0", "1.21.0-alpine", "v1.21.0"],
        );

        let build_config_path = ws.options.build_config_path.clone();
        let images_config_path = ws.options.images_config_path.clone();
        let mut submitter = submitter_accepting_files();
        submitter
            .expect_submit()
            .withf(move |request: &PullRequest| {
                request.branch == "ack-bot/upgrade-go-version-1.21.0"
                    && request.base_branch == "main"
                    && request.owner == "aws-controllers-k8s"
                    && request.subject == "Update Go version to `1.21.0`"
                    && request.description.contains("`1.20.5` to `1.21.0`")
                    && request.files == vec![build_config_path.clone(), images_config_path.clone()]
            })
            .times(1)
            .returning(|_| Ok(()));

        let outcome = run_upgrade(&ws.options, &registry, &submitter)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            UpgradeOutcome::Upgraded {
                from: Version::new(1, 20, 5),
                to: Version::new(1, 21, 0),
                pull_request: PullRequestStatus::Opened,
            }
        );

        let build_config = BuildConfig::load(&ws.options.build_config_path).unwrap();
        assert_eq!(build_config.go.unwrap().current_version, "1.21.0");
        assert_eq!(
            build_config.eks_distro.unwrap().current_version,
            "2023.9.6"
        );

        let images_config = ImagesConfig::load(&ws.options.images_config_path).unwrap();
        assert_eq!(images_config.images["controller"], "controller-1.4.3");
        assert_eq!(
            images_config.images["integration-test"],
            "integration-test-0.0.10"
        );
    }

    #[tokio::test]
    async fn up_to_date_version_writes_nothing_and_skips_pr() {
        let ws = workspace(
            Dependency::Go,
            "go:\n  repository: docker/library/golang\n  current_version: 1.21.0\n",
        );
        let registry = registry_with("docker/library/golang", &["1.21.0", "1.20.9"]);
        let mut submitter = MockPullRequestSubmitter::new();
        submitter.expect_submit().never();

        let before = std::fs::read_to_string(&ws.options.build_config_path).unwrap();
        let outcome = run_upgrade(&ws.options, &registry, &submitter)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            UpgradeOutcome::UpToDate {
                version: Version::new(1, 21, 0)
            }
        );
        assert_eq!(
            std::fs::read_to_string(&ws.options.build_config_path).unwrap(),
            before
        );
        assert_eq!(
            std::fs::read_to_string(&ws.options.images_config_path).unwrap(),
            IMAGES_CONFIG
        );
    }

    #[tokio::test]
    async fn existing_pull_request_is_treated_as_success() {
        let ws = workspace(Dependency::Go, BUILD_CONFIG);
        let registry = registry_with("docker/library/golang", &["1.20.5", "1.21.0"]);
        let mut submitter = submitter_accepting_files();
        submitter.expect_submit().times(1).returning(|request| {
            Err(SubmitError::AlreadyExists {
                branch: request.branch.clone(),
            })
        });

        let outcome = run_upgrade(&ws.options, &registry, &submitter)
            .await
            .unwrap();

        assert!(matches!(
            outcome,
            UpgradeOutcome::Upgraded {
                pull_request: PullRequestStatus::AlreadyExists,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn other_submission_errors_are_fatal_but_files_stay_written() {
        let ws = workspace(Dependency::Go, BUILD_CONFIG);
        let registry = registry_with("docker/library/golang", &["1.21.0"]);
        let mut submitter = submitter_accepting_files();
        submitter
            .expect_submit()
            .times(1)
            .returning(|_| Err(SubmitError::MissingToken));

        let result = run_upgrade(&ws.options, &registry, &submitter).await;

        assert!(matches!(
            result,
            Err(CommandError::Submission(SubmitError::MissingToken))
        ));
        let build_config = BuildConfig::load(&ws.options.build_config_path).unwrap();
        assert_eq!(build_config.go.unwrap().current_version, "1.21.0");
    }

    #[tokio::test]
    async fn upgrades_eks_distro_from_its_own_repository() {
        let ws = workspace(Dependency::EksDistro, BUILD_CONFIG);
        let registry = registry_with(
            "eks-distro-build-tooling/eks-distro-minimal-base",
            &["2023.9.6", "2023.10.1", "latest"],
        );
        let mut submitter = submitter_accepting_files();
        submitter
            .expect_submit()
            .withf(|request: &PullRequest| {
                request.branch == "ack-bot/upgrade-eks-distro-version-2023.10.1"
            })
            .times(1)
            .returning(|_| Ok(()));

        let outcome = run_upgrade(&ws.options, &registry, &submitter)
            .await
            .unwrap();

        assert!(matches!(outcome, UpgradeOutcome::Upgraded { .. }));
        let build_config = BuildConfig::load(&ws.options.build_config_path).unwrap();
        assert_eq!(build_config.go.unwrap().current_version, "1.20.5");
        assert_eq!(
            build_config.eks_distro.unwrap().current_version,
            "2023.10.1"
        );
    }

    #[tokio::test]
    async fn repository_override_replaces_configured_repository() {
        let mut ws = workspace(Dependency::Go, BUILD_CONFIG);
        ws.options.repository_override = Some("mirror/golang".to_string());
        let registry = registry_with("mirror/golang", &["1.20.5"]);
        let submitter = MockPullRequestSubmitter::new();

        let outcome = run_upgrade(&ws.options, &registry, &submitter)
            .await
            .unwrap();

        assert!(matches!(outcome, UpgradeOutcome::UpToDate { .. }));
    }

    #[tokio::test]
    async fn registry_failure_is_fatal() {
        let ws = workspace(Dependency::Go, BUILD_CONFIG);
        let mut registry = MockRegistry::new();
        registry
            .expect_list_tags()
            .returning(|repository| Err(RegistryError::NotFound(repository.to_string())));
        let submitter = MockPullRequestSubmitter::new();

        let result = run_upgrade(&ws.options, &registry, &submitter).await;

        assert!(matches!(
            result,
            Err(CommandError::Registry { repository, .. }) if repository == "docker/library/golang"
        ));
    }

    #[tokio::test]
    async fn missing_dependency_block_is_a_config_error() {
        let ws = workspace(
            Dependency::EksDistro,
            "go:\n  repository: docker/library/golang\n  current_version: 1.21.0\n",
        );
        let registry = MockRegistry::new();
        let submitter = MockPullRequestSubmitter::new();

        let result = run_upgrade(&ws.options, &registry, &submitter).await;

        assert!(matches!(
            result,
            Err(CommandError::Config(ConfigError::MissingDependency {
                dependency: "eks_distro",
                ..
            }))
        ));
    }

    #[tokio::test]
    async fn uncommittable_path_aborts_before_writing() {
        let ws = workspace(Dependency::Go, BUILD_CONFIG);
        let registry = registry_with("docker/library/golang", &["1.21.0"]);
        let mut submitter = MockPullRequestSubmitter::new();
        submitter.expect_check_files().times(1).returning(|files| {
            Err(SubmitError::InvalidPath {
                path: files[0].clone(),
            })
        });
        submitter.expect_submit().never();

        let result = run_upgrade(&ws.options, &registry, &submitter).await;

        assert!(matches!(
            result,
            Err(CommandError::Submission(SubmitError::InvalidPath { .. }))
        ));
        assert_eq!(
            std::fs::read_to_string(&ws.options.build_config_path).unwrap(),
            BUILD_CONFIG
        );
        assert_eq!(
            std::fs::read_to_string(&ws.options.images_config_path).unwrap(),
            IMAGES_CONFIG
        );
    }

    #[tokio::test]
    async fn malformed_image_tag_aborts_before_writing() {
        let ws = workspace(Dependency::Go, BUILD_CONFIG);
        std::fs::write(
            &ws.options.images_config_path,
            "image_repo: prow\nimages:\n  controller: controller-latest\n",
        )
        .unwrap();
        let registry = registry_with("docker/library/golang", &["1.21.0"]);
        let submitter = MockPullRequestSubmitter::new();

        let result = run_upgrade(&ws.options, &registry, &submitter).await;

        assert!(matches!(
            result,
            Err(CommandError::Version(VersionError::InvalidImageReference { .. }))
        ));
        assert_eq!(
            std::fs::read_to_string(&ws.options.build_config_path).unwrap(),
            BUILD_CONFIG
        );
    }
}
