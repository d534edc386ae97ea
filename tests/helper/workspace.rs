//! Temporary checkout with build and images configs

use std::path::PathBuf;

use tempfile::TempDir;

use ack_build_tools::command::upgrade::UpgradeOptions;
use ack_build_tools::config::GlobalOptions;
use ack_build_tools::dependency::Dependency;

pub struct Workspace {
    _dir: TempDir,
    pub root: PathBuf,
    pub build_config_path: PathBuf,
    pub images_config_path: PathBuf,
}

impl Workspace {
    pub fn new(build_config: &str, images_config: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let root = dir.path().to_path_buf();
        let jobs = root.join("prow/jobs");
        std::fs::create_dir_all(&jobs).unwrap();

        let build_config_path = jobs.join("build_config.yaml");
        let images_config_path = jobs.join("images_config.yaml");
        std::fs::write(&build_config_path, build_config).unwrap();
        std::fs::write(&images_config_path, images_config).unwrap();

        Self {
            _dir: dir,
            root,
            build_config_path,
            images_config_path,
        }
    }

    pub fn global_options(&self) -> GlobalOptions {
        GlobalOptions {
            images_config_path: self.images_config_path.clone(),
            ..GlobalOptions::default()
        }
    }

    pub fn upgrade_options(&self, dependency: Dependency) -> UpgradeOptions {
        UpgradeOptions::new(
            dependency,
            self.build_config_path.clone(),
            None,
            &self.global_options(),
        )
    }

    pub fn read_build_config(&self) -> String {
        std::fs::read_to_string(&self.build_config_path).unwrap()
    }

    pub fn read_images_config(&self) -> String {
        std::fs::read_to_string(&self.images_config_path).unwrap()
    }
}
