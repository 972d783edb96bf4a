//! Command line argument parsing and validation.

use crate::artifact::Artifact;
use crate::error::{ConfigError, Result};
use crate::github::DEFAULT_CONTENT_TYPE;
use clap::Parser;
use reqwest::header::HeaderValue;

/// Upload a release binary to the GitHub release for the current CI tag
#[derive(Parser, Debug, Clone)]
#[command(
    name = "publish",
    version,
    about = "Upload a release binary to the GitHub release for the current CI tag",
    long_about = "Upload target/<TARGET>/release/<NAME> as the asset <NAME>-<TARGET> on the
GitHub release tagged CIRCLE_TAG in CIRCLE_PROJECT_USERNAME/CIRCLE_PROJECT_REPONAME.

Required environment:
  CIRCLE_PROJECT_USERNAME   account owning the repository (also the API login)
  GITHUB_API_PASSWORD       password or token for the API login
  CIRCLE_PROJECT_REPONAME   repository name
  CIRCLE_TAG                tag of the release to attach the asset to

Optional environment:
  GITHUB_API_URL            API base URL (default https://api.github.com)
  PUBLISH_TIMEOUT_SECS      per-request timeout in seconds (default 300)

On success the asset's download URL is the only line written to stdout."
)]
pub struct Args {
    /// Target triple the binary was built for
    #[arg(index = 1, value_name = "TARGET")]
    pub target: String,

    /// Binary name under target/<TARGET>/release/
    #[arg(index = 2, value_name = "NAME")]
    pub name: String,

    /// MIME type sent with the asset
    #[arg(long, value_name = "MIME", default_value = DEFAULT_CONTENT_TYPE)]
    pub content_type: String,

    /// Label shown for the asset on the release page
    #[arg(long, value_name = "TEXT")]
    pub label: Option<String>,

    /// Check configuration and the local artifact without contacting GitHub
    #[arg(long)]
    pub dry_run: bool,

    /// Suppress status output on stderr
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments and derive the artifact they name
    pub fn validate(&self) -> Result<Artifact> {
        if HeaderValue::from_str(&self.content_type).is_err() || self.content_type.trim().is_empty()
        {
            return Err(ConfigError::InvalidArgument {
                argument: "content type".to_string(),
                value: self.content_type.clone(),
                reason: "must be a non-empty MIME type".to_string(),
            }
            .into());
        }

        Artifact::new(self.target.as_str(), self.name.as_str())
    }
}
