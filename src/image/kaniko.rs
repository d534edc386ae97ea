//! kaniko executor image builder

use tokio::process::Command;
use tracing::{debug, info};

use crate::config::KANIKO_EXECUTOR_PATH;
use crate::image::builder::{BuildError, BuildRequest, ImageBuilder};

/// Builds images by running the kaniko executor
pub struct KanikoBuilder {
    executor: String,
}

impl KanikoBuilder {
    pub fn new(executor: &str) -> Self {
        Self {
            executor: executor.to_string(),
        }
    }

    fn args(request: &BuildRequest) -> Vec<String> {
        vec![
            "--dockerfile".to_string(),
            request.dockerfile.clone(),
            "--destination".to_string(),
            request.destination.clone(),
            "--context".to_string(),
            request.context.clone(),
            "--cleanup".to_string(),
        ]
    }
}

impl Default for KanikoBuilder {
    fn default() -> Self {
        Self::new(KANIKO_EXECUTOR_PATH)
    }
}

#[async_trait::async_trait]
impl ImageBuilder for KanikoBuilder {
    async fn build(&self, request: &BuildRequest) -> Result<(), BuildError> {
        let args = Self::args(request);
        debug!("Running {} {}", self.executor, args.join(" "));

        let output = Command::new(&self.executor)
            .args(&args)
            .output()
            .await
            .map_err(|source| BuildError::Spawn {
                executor: self.executor.clone(),
                source,
            })?;

        if !output.status.success() {
            let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
            combined.push_str(&String::from_utf8_lossy(&output.stderr));
            return Err(BuildError::Failed {
                destination: request.destination.clone(),
                status: output.status,
                output: combined.trim().to_string(),
            });
        }

        info!("Pushed {}", request.destination);
        Ok(())
    }
}
