//! Error types for publish operations.
//!
//! Every failure is terminal for the run. Each variant maps to the workflow
//! step that produced it so the operator can see where the upload stopped.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for publish operations
pub type Result<T> = std::result::Result<T, PublishError>;

/// Main error type for all publish operations
#[derive(Error, Debug)]
pub enum PublishError {
    /// Missing or invalid argument or environment variable
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// Credential rejected by the release API
    #[error("Authentication failed: {reason}")]
    Authentication {
        /// Reason reported by the server
        reason: String,
    },

    /// Release lookup by tag failed
    #[error("Release resolution failed: {0}")]
    Resolution(#[from] ResolutionError),

    /// Local artifact absent or unreadable
    #[error("Cannot read artifact {path}: {source}")]
    FileAccess {
        /// Path of the artifact
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Server rejected the asset or the transfer failed
    #[error("Upload failed: {0}")]
    Upload(#[from] UploadError),

    /// The asset URL could not be written to stdout
    #[error("Cannot write asset URL to stdout: {source}")]
    Output {
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },
}

/// Configuration errors, raised before any network call
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// One or more required environment variables are unset or empty
    #[error("Missing required environment variable(s): {}", .names.join(", "))]
    MissingEnv {
        /// Names of every missing variable
        names: Vec<String>,
    },

    /// An optional environment variable holds an unusable value
    #[error("Invalid value for {name}: {reason}")]
    InvalidEnv {
        /// Variable name
        name: String,
        /// Reason for the error
        reason: String,
    },

    /// The HTTP client could not be constructed
    #[error("Failed to build HTTP client: {reason}")]
    HttpClient {
        /// Reason for the error
        reason: String,
    },

    /// A positional argument is empty or unsafe to use as a path component
    #[error("Invalid {argument} '{value}': {reason}")]
    InvalidArgument {
        /// Argument name
        argument: String,
        /// Value supplied
        value: String,
        /// Reason for the error
        reason: String,
    },
}

/// Release lookup errors
#[derive(Error, Debug)]
pub enum ResolutionError {
    /// The project has no release for the tag
    #[error("No release found for tag '{tag}' in {project}")]
    ReleaseNotFound {
        /// Project identifier (owner/repo)
        project: String,
        /// Tag name
        tag: String,
    },

    /// Unexpected status from the release API
    #[error("GitHub API returned {status} for {url}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Request URL
        url: String,
        /// Server message
        message: String,
    },

    /// The release payload could not be used
    #[error("Invalid release response: {reason}")]
    InvalidResponse {
        /// Reason for the error
        reason: String,
    },

    /// The request never completed
    #[error("Network error during release lookup: {reason}")]
    Network {
        /// Reason for the error
        reason: String,
    },
}

/// Asset upload errors
#[derive(Error, Debug)]
pub enum UploadError {
    /// An asset with this name is already attached to the release
    #[error("Asset '{name}' already exists on this release")]
    DuplicateAsset {
        /// Asset display name
        name: String,
    },

    /// The server refused the asset
    #[error("Server rejected asset '{name}' with status {status}: {message}")]
    Rejected {
        /// Asset display name
        name: String,
        /// HTTP status code
        status: u16,
        /// Server message
        message: String,
    },

    /// The request exceeded the configured timeout
    #[error("Upload of '{name}' timed out after {seconds}s")]
    Timeout {
        /// Asset display name
        name: String,
        /// Configured timeout
        seconds: u64,
    },

    /// Transport failure mid-transfer
    #[error("Network error while uploading '{name}': {reason}")]
    Network {
        /// Asset display name
        name: String,
        /// Reason for the error
        reason: String,
    },

    /// The upload endpoint could not be turned into a request URL
    #[error("Invalid upload endpoint '{endpoint}': {reason}")]
    InvalidEndpoint {
        /// Endpoint as returned by the API
        endpoint: String,
        /// Reason for the error
        reason: String,
    },

    /// The server accepted the upload but returned an unreadable body
    #[error("Invalid asset response: {reason}")]
    InvalidResponse {
        /// Reason for the error
        reason: String,
    },
}

impl PublishError {
    /// Name of the workflow step that failed
    pub fn step(&self) -> &'static str {
        match self {
            PublishError::Configuration(_) => "configuration",
            PublishError::Authentication { .. } => "authentication",
            PublishError::Resolution(_) => "release resolution",
            PublishError::FileAccess { .. } => "artifact read",
            PublishError::Upload(_) => "asset upload",
            PublishError::Output { .. } => "result output",
        }
    }

    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            PublishError::Configuration(ConfigError::MissingEnv { names }) => vec![
                format!("Export {} in the CI job environment", names.join(", ")),
                "Tag builds only: CIRCLE_TAG is set for tag-triggered jobs".to_string(),
            ],
            PublishError::Authentication { .. } => vec![
                "Verify GITHUB_API_PASSWORD holds a valid token for CIRCLE_PROJECT_USERNAME"
                    .to_string(),
                "Ensure the token has the `repo` (or `contents: write`) scope".to_string(),
            ],
            PublishError::Resolution(ResolutionError::ReleaseNotFound { tag, .. }) => vec![
                format!("Create a GitHub release for tag '{}' before publishing", tag),
                "Check that the release is not a draft owned by another account".to_string(),
            ],
            PublishError::FileAccess { path, .. } => vec![
                format!("Build the artifact first so that {} exists", path.display()),
                "Run from the workspace root: the path is relative to the working directory"
                    .to_string(),
            ],
            PublishError::Upload(UploadError::DuplicateAsset { name }) => vec![
                format!("Delete the existing '{}' asset from the release", name),
                "Publishing is not idempotent: re-runs must use a fresh tag".to_string(),
            ],
            PublishError::Upload(UploadError::Timeout { .. }) => {
                vec!["Raise PUBLISH_TIMEOUT_SECS for large artifacts".to_string()]
            }
            PublishError::Output { .. } => vec![
                "The asset was uploaded; read the URL from the release page".to_string(),
            ],
            _ => vec![],
        }
    }
}
