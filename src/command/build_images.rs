//! Prow image builds
//!
//! Every image listed in `images_config.yaml` carries the tag it should be
//! published under. Images whose tag is newer than anything already pushed
//! to the prow repository are built and pushed.

use std::path::PathBuf;

use semver::Version;
use tracing::info;

use crate::command::CommandError;
use crate::config::{DEFAULT_BUILD_CONTEXT, DEFAULT_PROW_REPOSITORY, GlobalOptions};
use crate::image::{BuildRequest, ImageBuilder};
use crate::manifest::ImagesConfig;
use crate::version::registry::Registry;
use crate::version::resolver::{pushed_image_versions, split_image_reference};

#[derive(Debug, Clone, PartialEq)]
pub struct BuildImagesOptions {
    pub images_config_path: PathBuf,
    /// Repository listing the already published prow images; derived from
    /// `image_repo` when unset
    pub repository_name: Option<String>,
    /// Push target without tag; defaults to `image_repo` from the images config
    pub destination: Option<String>,
    pub context: String,
}

impl BuildImagesOptions {
    pub fn new(
        repository_name: Option<String>,
        destination: Option<String>,
        context: String,
        global: &GlobalOptions,
    ) -> Self {
        Self {
            images_config_path: global.images_config_path.clone(),
            repository_name,
            destination,
            context,
        }
    }
}

impl Default for BuildImagesOptions {
    fn default() -> Self {
        Self::new(
            None,
            None,
            DEFAULT_BUILD_CONTEXT.to_string(),
            &GlobalOptions::default(),
        )
    }
}

/// Images built and skipped by a run, by reference
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub built: Vec<String>,
    pub skipped: Vec<String>,
}

/// Build every image whose configured tag has not been published yet
pub async fn run_build_images(
    options: &BuildImagesOptions,
    registry: &dyn Registry,
    builder: &dyn ImageBuilder,
) -> Result<BuildSummary, CommandError> {
    let images_config = ImagesConfig::load(&options.images_config_path)?;
    let destination = options
        .destination
        .as_deref()
        .unwrap_or(&images_config.image_repo);

    let repository = options
        .repository_name
        .clone()
        .unwrap_or_else(|| repository_from_image_repo(&images_config.image_repo));

    let tags = registry
        .list_tags(&repository)
        .await
        .map_err(|source| CommandError::Registry {
            repository: repository.clone(),
            source,
        })?;
    info!("Successfully listed {} tags from {}", tags.len(), repository);

    let mut summary = BuildSummary::default();

    for reference in images_config.images.values() {
        let (image_name, desired) = split_image_reference(reference)?;
        let highest_pushed = pushed_image_versions(image_name, &tags)?.into_iter().max();

        if !needs_build(&desired, highest_pushed.as_ref()) {
            info!(
                "{} is already published (highest pushed: {})",
                reference,
                highest_pushed.map_or_else(|| "none".to_string(), |v| v.to_string())
            );
            summary.skipped.push(reference.clone());
            continue;
        }

        let request = BuildRequest {
            dockerfile: format!("Dockerfile.{image_name}"),
            destination: format!("{destination}:{reference}"),
            context: options.context.clone(),
        };
        info!("Building {} from {}", request.destination, request.dockerfile);
        builder.build(&request).await?;
        summary.built.push(reference.clone());
    }

    Ok(summary)
}

/// Repository path of an image reference without tag, e.g.
/// `public.ecr.aws/ack-infra/prow` -> `ack-infra/prow`
fn repository_from_image_repo(image_repo: &str) -> String {
    let path = match image_repo.split_once('/') {
        Some((host, path)) if host.contains('.') || host.contains(':') || host == "localhost" => {
            path
        }
        _ => image_repo,
    };
    let path = path.trim_matches('/');

    if path.is_empty() {
        DEFAULT_PROW_REPOSITORY.to_string()
    } else {
        path.to_string()
    }
}

fn needs_build(desired: &Version, highest_pushed: Option<&Version>) -> bool {
    highest_pushed.is_none_or(|pushed| desired > pushed)
}
