//! Command line interface for the publish binary.
//!
//! Parses arguments, reads the environment snapshot, and drives the publish
//! workflow with user feedback on stderr.

mod args;
mod output;

pub use args::Args;
pub use output::OutputManager;

use crate::config::{EnvConfig, PublishConfig};
use crate::error::{PublishError, Result};
use crate::github::GitHubClient;
use crate::publish::{self, PublishRequest, Publisher};

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    let env = EnvConfig::from_env();
    execute(&args, &env).await
}

/// Run one publish invocation against an explicit environment
pub async fn execute(args: &Args, env: &EnvConfig) -> Result<i32> {
    let output = OutputManager::new(args.quiet);

    let artifact = args.validate()?;
    let config = PublishConfig::from_env(env)?;
    log::debug!("Loaded {:?}", config);

    let request = PublishRequest::new(&config, artifact)
        .with_content_type(args.content_type.as_str())
        .with_label(args.label.clone());

    if args.dry_run {
        let plan = publish::dry_run(&request).await?;
        output.info(&format!(
            "Dry run: would upload {} ({} bytes) as '{}'",
            plan.local_path.display(),
            plan.size,
            plan.asset_name
        ));
        output.info(&format!(
            "Target release: tag '{}' in {} via {}",
            plan.tag, plan.project, config.api_url
        ));
        return Ok(0);
    }

    output.progress(&format!(
        "Publishing {} to {}@{}",
        request.artifact.asset_name(),
        request.project,
        request.tag
    ));

    let publisher = Publisher::new(GitHubClient::new(&config)?);
    let outcome = publisher.publish(&request).await?;

    output.success(&format!(
        "Uploaded {} ({} bytes) to release {}",
        outcome.asset_name, outcome.size, outcome.release_id
    ));
    output
        .result(&outcome.asset_url)
        .map_err(|source| PublishError::Output { source })?;

    Ok(0)
}
