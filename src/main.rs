use std::process::ExitCode;

use clap::Parser;
use tracing::{Instrument, error, info, info_span};

use ack_build_tools::cli::{Cli, Command, Invocation};
use ack_build_tools::command::CommandError;
use ack_build_tools::command::build_images::run_build_images;
use ack_build_tools::command::upgrade::{UpgradeOutcome, run_upgrade};
use ack_build_tools::config::GlobalOptions;
use ack_build_tools::github::GitHubSubmitter;
use ack_build_tools::image::KanikoBuilder;
use ack_build_tools::logging;
use ack_build_tools::version::registries::EcrPublicRegistry;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    logging::init();

    let global = GlobalOptions::from(cli.global);
    let span = match cli.command {
        Command::UpgradeGoVersion { .. } => info_span!("upgrade-go-version"),
        Command::UpgradeEksDistroVersion { .. } => info_span!("upgrade-eks-distro-version"),
        Command::BuildProwImages { .. } => info_span!("build-prow-images"),
    };
    let invocation = cli.command.into_invocation(&global);
    let repo_root = std::env::current_dir()?;

    let result = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(run(invocation, &global, repo_root).instrument(span.clone()));

    let _entered = span.enter();
    match result {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            error!("{e}");
            Ok(ExitCode::from(e.exit_code()))
        }
    }
}

async fn run(
    invocation: Invocation,
    global: &GlobalOptions,
    repo_root: std::path::PathBuf,
) -> Result<(), CommandError> {
    let registry = EcrPublicRegistry::new(&global.registry_url);

    match invocation {
        Invocation::Upgrade(options) => {
            let submitter = GitHubSubmitter::new(
                &global.github_api_url,
                global.github_token.clone(),
                repo_root,
            );
            match run_upgrade(&options, &registry, &submitter).await? {
                UpgradeOutcome::UpToDate { version } => {
                    info!("{} is already at {}", options.dependency, version)
                }
                UpgradeOutcome::Upgraded { from, to, .. } => {
                    info!("Upgraded {} from {} to {}", options.dependency, from, to)
                }
            }
        }
        Invocation::BuildImages(options) => {
            let summary = run_build_images(&options, &registry, &KanikoBuilder::default()).await?;
            info!(
                "Built {} images, {} already published",
                summary.built.len(),
                summary.skipped.len()
            );
        }
    }

    Ok(())
}
