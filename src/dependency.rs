//! Dependencies whose versions are pinned in the build config

/// A dependency tracked in `build_config.yaml`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dependency {
    /// Go toolchain used to build the prow images
    Go,
    /// EKS Distro minimal base image
    EksDistro,
}

impl Dependency {
    /// Key of the dependency block in the build config
    pub fn as_str(&self) -> &'static str {
        match self {
            Dependency::Go => "go",
            Dependency::EksDistro => "eks_distro",
        }
    }

    /// Human readable name used in logs and pull requests
    pub fn display_name(&self) -> &'static str {
        match self {
            Dependency::Go => "Go",
            Dependency::EksDistro => "EKS Distro",
        }
    }

    /// Subcommand that upgrades this dependency
    pub fn command_name(&self) -> &'static str {
        match self {
            Dependency::Go => "upgrade-go-version",
            Dependency::EksDistro => "upgrade-eks-distro-version",
        }
    }

    /// Branch the upgrade commit is pushed to
    pub fn commit_branch(&self, new_version: &str) -> String {
        format!("ack-bot/{}-{}", self.command_name(), new_version)
    }

    /// Pull request title
    pub fn pr_subject(&self, new_version: &str) -> String {
        format!("Update {} version to `{}`", self.display_name(), new_version)
    }

    /// Pull request body
    pub fn pr_description(&self, old_version: &str, new_version: &str) -> String {
        format!(
            "### Update {name} version\n\n\
             {name} version in `build_config.yaml` was updated from `{old_version}` to \
             `{new_version}`, the latest release published to the registry.\n\n\
             The patch version of every prow image in `images_config.yaml` was bumped \
             so the images are rebuilt with the new version.\n\n\
             By submitting this pull request, I confirm that my contribution is made under \
             the terms of the Apache 2.0 license.",
            name = self.display_name(),
        )
    }
}

impl std::fmt::Display for Dependency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Dependency::Go, "ack-bot/upgrade-go-version-1.21.0")]
    #[case(Dependency::EksDistro, "ack-bot/upgrade-eks-distro-version-1.21.0")]
    fn commit_branch_is_deterministic(#[case] dependency: Dependency, #[case] expected: &str) {
        assert_eq!(dependency.commit_branch("1.21.0"), expected);
    }

    #[test]
    fn pr_subject_names_dependency_and_version() {
        assert_eq!(
            Dependency::EksDistro.pr_subject("2023.9.6"),
            "Update EKS Distro version to `2023.9.6`"
        );
    }

    #[test]
    fn pr_description_mentions_both_versions() {
        let description = Dependency::Go.pr_description("1.20.5", "1.21.0");

        assert!(description.contains("`1.20.5` to `1.21.0`"));
        assert!(description.starts_with("### Update Go version"));
    }
}
