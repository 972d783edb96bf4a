//! Environment snapshot and validated publish configuration.
//!
//! The environment is read exactly once, in `main`, and the resulting
//! [`EnvConfig`] is passed down explicitly.

use crate::error::ConfigError;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;
use url::Url;

/// CI actor username; also the owner half of the project identifier
pub const ENV_USERNAME: &str = "CIRCLE_PROJECT_USERNAME";
/// Password or token for the release API
pub const ENV_CREDENTIAL: &str = "GITHUB_API_PASSWORD";
/// Repository name; the second half of the project identifier
pub const ENV_REPOSITORY: &str = "CIRCLE_PROJECT_REPONAME";
/// Tag being built
pub const ENV_TAG: &str = "CIRCLE_TAG";
/// Optional API base URL override (GitHub Enterprise)
pub const ENV_API_URL: &str = "GITHUB_API_URL";
/// Optional request timeout in seconds
pub const ENV_TIMEOUT: &str = "PUBLISH_TIMEOUT_SECS";

/// Public GitHub API
pub const DEFAULT_API_URL: &str = "https://api.github.com";
/// Default per-request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Immutable snapshot of the process environment
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    vars: HashMap<String, String>,
}

impl EnvConfig {
    /// Capture the current process environment
    pub fn from_env() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    /// Build a snapshot from explicit key/value pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Value of `key`, or `None` when unset or blank
    pub fn get(&self, key: &str) -> Option<String> {
        self.vars
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }
}

/// Repository identifier on the release host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRef {
    /// Account owning the repository
    pub owner: String,
    /// Repository name
    pub repo: String,
}

impl fmt::Display for ProjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Validated configuration for a single publish run
#[derive(Clone)]
pub struct PublishConfig {
    /// CI actor username
    pub username: String,
    /// API password or token
    pub credential: String,
    /// Repository name
    pub repository: String,
    /// Tag identifying the release
    pub tag: String,
    /// API base URL
    pub api_url: Url,
    /// Per-request timeout
    pub timeout: Duration,
}

impl fmt::Debug for PublishConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublishConfig")
            .field("username", &self.username)
            .field("credential", &"<redacted>")
            .field("repository", &self.repository)
            .field("tag", &self.tag)
            .field("api_url", &self.api_url.as_str())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl PublishConfig {
    /// Read and validate configuration from an environment snapshot.
    ///
    /// Reports every missing required variable at once.
    pub fn from_env(env: &EnvConfig) -> Result<Self, ConfigError> {
        let mut missing = Vec::new();
        let mut required = |name: &str| {
            let value = env.get(name);
            if value.is_none() {
                missing.push(name.to_string());
            }
            value.unwrap_or_default()
        };

        let username = required(ENV_USERNAME);
        let credential = required(ENV_CREDENTIAL);
        let repository = required(ENV_REPOSITORY);
        let tag = required(ENV_TAG);

        if !missing.is_empty() {
            return Err(ConfigError::MissingEnv { names: missing });
        }

        Ok(Self {
            username,
            credential,
            repository,
            tag,
            api_url: parse_api_url(env)?,
            timeout: parse_timeout(env)?,
        })
    }

    /// Project identifier `<username>/<repository>`
    pub fn project(&self) -> ProjectRef {
        ProjectRef {
            owner: self.username.clone(),
            repo: self.repository.clone(),
        }
    }
}

fn parse_api_url(env: &EnvConfig) -> Result<Url, ConfigError> {
    let raw = env
        .get(ENV_API_URL)
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());

    let url = Url::parse(raw.trim_end_matches('/')).map_err(|e| ConfigError::InvalidEnv {
        name: ENV_API_URL.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidEnv {
            name: ENV_API_URL.to_string(),
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}

fn parse_timeout(env: &EnvConfig) -> Result<Duration, ConfigError> {
    let Some(raw) = env.get(ENV_TIMEOUT) else {
        return Ok(Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    };

    match raw.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidEnv {
            name: ENV_TIMEOUT.to_string(),
            reason: format!("expected a positive number of seconds, got '{}'", raw),
        }),
    }
}
