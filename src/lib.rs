//! # publish_dist
//!
//! Uploads a CI-built release binary as an asset on the GitHub release for
//! the tag being built.
//!
//! ## Usage
//!
//! ```bash
//! publish x86_64-unknown-linux-gnu mytool
//! # uploads target/x86_64-unknown-linux-gnu/release/mytool
//! # as mytool-x86_64-unknown-linux-gnu and prints its download URL
//! ```
//!
//! The workflow itself is [`Publisher::publish`], generic over the
//! [`ReleaseApi`] seam so it can run against a test double.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod artifact;
pub mod cli;
pub mod config;
pub mod error;
pub mod github;
pub mod publish;

pub use artifact::{Artifact, ArtifactFile};
pub use cli::Args;
pub use config::{EnvConfig, ProjectRef, PublishConfig};
pub use error::{ConfigError, PublishError, ResolutionError, Result, UploadError};
pub use github::{AssetUpload, GitHubClient, ReleaseApi, UploadEndpoint, UploadedAsset};
pub use publish::{PublishOutcome, PublishPlan, PublishRequest, Publisher};
