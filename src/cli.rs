//! Command line interface

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::command::build_images::BuildImagesOptions;
use crate::command::upgrade::UpgradeOptions;
use crate::config::{
    DEFAULT_BASE_BRANCH, DEFAULT_BUILD_CONFIG_PATH, DEFAULT_BUILD_CONTEXT,
    DEFAULT_GITHUB_API_URL, DEFAULT_IMAGES_CONFIG_PATH, DEFAULT_REGISTRY_URL,
    DEFAULT_SOURCE_OWNER, DEFAULT_SOURCE_REPO, GlobalOptions,
};
use crate::dependency::Dependency;

#[derive(Debug, Parser)]
#[command(name = "ack-build-tools")]
#[command(
    version,
    about = "prow-patcher - patch prow images, build, and release",
    long_about = "A tool to patch prow jobs when there is a change to test infra, \
                  or when a new Go or EKS Distro version is pushed to ECR Public"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Path to images_config.yaml, where all the prow image versions are stored
    #[arg(long, global = true, default_value = DEFAULT_IMAGES_CONFIG_PATH)]
    pub images_config_path: PathBuf,

    /// Owner of the repository pull requests are opened against
    #[arg(long, global = true, default_value = DEFAULT_SOURCE_OWNER)]
    pub source_owner: String,

    /// Repository pull requests are opened against
    #[arg(long, global = true, default_value = DEFAULT_SOURCE_REPO)]
    pub source_repo: String,

    /// Base branch of pull requests
    #[arg(long, global = true, default_value = DEFAULT_BASE_BRANCH)]
    pub base_branch: String,

    /// Token used to push commits and open pull requests
    #[arg(long, global = true, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// GitHub REST API endpoint
    #[arg(long, global = true, default_value = DEFAULT_GITHUB_API_URL)]
    pub github_api_url: String,

    /// Container registry queried for tags
    #[arg(long, global = true, default_value = DEFAULT_REGISTRY_URL)]
    pub registry_url: String,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Queries ECR Public for the latest Go version and patches prow image versions
    UpgradeGoVersion {
        /// Path to build_config.yaml, where all the build versions are stored
        #[arg(long, alias = "buildConfigPath", default_value = DEFAULT_BUILD_CONFIG_PATH)]
        build_config_path: PathBuf,

        /// ECR Public repository to query instead of the one in build_config.yaml
        #[arg(long = "golang-ecr-public")]
        golang_ecr_public: Option<String>,
    },

    /// Queries ECR Public for the latest EKS Distro version and patches prow image versions
    UpgradeEksDistroVersion {
        /// Path to build_config.yaml, where all the build versions are stored
        #[arg(long, default_value = DEFAULT_BUILD_CONFIG_PATH)]
        build_config_path: PathBuf,
    },

    /// Builds prow images in images_config.yaml and pushes the ones not yet published
    BuildProwImages {
        /// Repository holding the published prow images (defaults to image_repo
        /// in images_config.yaml without its registry host)
        #[arg(long)]
        repository_name: Option<String>,

        /// Push target without tag (defaults to image_repo in images_config.yaml)
        #[arg(long)]
        destination: Option<String>,

        /// kaniko build context
        #[arg(long, default_value = DEFAULT_BUILD_CONTEXT)]
        context: String,
    },
}

impl From<GlobalArgs> for GlobalOptions {
    fn from(args: GlobalArgs) -> Self {
        Self {
            images_config_path: args.images_config_path,
            source_owner: args.source_owner,
            source_repo: args.source_repo,
            base_branch: args.base_branch,
            github_token: args.github_token.filter(|token| !token.is_empty()),
            github_api_url: args.github_api_url,
            registry_url: args.registry_url,
        }
    }
}

/// Fully resolved options of the selected command
#[derive(Debug, Clone, PartialEq)]
pub enum Invocation {
    Upgrade(UpgradeOptions),
    BuildImages(BuildImagesOptions),
}

impl Command {
    pub fn into_invocation(self, global: &GlobalOptions) -> Invocation {
        match self {
            Command::UpgradeGoVersion {
                build_config_path,
                golang_ecr_public,
            } => Invocation::Upgrade(UpgradeOptions::new(
                Dependency::Go,
                build_config_path,
                golang_ecr_public,
                global,
            )),
            Command::UpgradeEksDistroVersion { build_config_path } => Invocation::Upgrade(
                UpgradeOptions::new(Dependency::EksDistro, build_config_path, None, global),
            ),
            Command::BuildProwImages {
                repository_name,
                destination,
                context,
            } => Invocation::BuildImages(BuildImagesOptions::new(
                repository_name,
                destination,
                context,
                global,
            )),
        }
    }
}
