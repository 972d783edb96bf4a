//! Release asset publishing workflow.
//!
//! A single forward-only sequence: resolve the release for the tag, open the
//! local artifact, upload it. Any failure ends the run.

use crate::artifact::Artifact;
use crate::config::{ProjectRef, PublishConfig};
use crate::error::Result;
use crate::github::{AssetUpload, DEFAULT_CONTENT_TYPE, ReleaseApi};
use std::path::PathBuf;

/// Everything needed to publish one artifact
#[derive(Debug, Clone)]
pub struct PublishRequest {
    /// Project owning the release
    pub project: ProjectRef,
    /// Tag identifying the release
    pub tag: String,
    /// Artifact to upload
    pub artifact: Artifact,
    /// MIME type of the asset
    pub content_type: String,
    /// Optional asset label
    pub label: Option<String>,
}

impl PublishRequest {
    /// Request for `artifact` against the project and tag in `config`
    pub fn new(config: &PublishConfig, artifact: Artifact) -> Self {
        Self {
            project: config.project(),
            tag: config.tag.clone(),
            artifact,
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            label: None,
        }
    }

    /// Override the asset MIME type
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Attach a label to the asset
    pub fn with_label(mut self, label: Option<String>) -> Self {
        self.label = label;
        self
    }
}

/// Result of a successful publish
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishOutcome {
    /// Release the asset was attached to
    pub release_id: u64,
    /// Asset name on the release
    pub asset_name: String,
    /// Public download URL
    pub asset_url: String,
    /// API URL of the asset
    pub api_url: String,
    /// Uploaded size in bytes
    pub size: u64,
}

/// What a dry run would upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishPlan {
    /// Project owning the release
    pub project: ProjectRef,
    /// Tag identifying the release
    pub tag: String,
    /// Local file that would be uploaded
    pub local_path: PathBuf,
    /// Asset name that would be used
    pub asset_name: String,
    /// File size in bytes
    pub size: u64,
}

/// Publishes artifacts through a [`ReleaseApi`]
#[derive(Debug)]
pub struct Publisher<A> {
    api: A,
}

impl<A: ReleaseApi> Publisher<A> {
    /// Create a publisher over `api`
    pub fn new(api: A) -> Self {
        Self { api }
    }

    /// Access the underlying API
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Upload the artifact in `request` to its release.
    ///
    /// The artifact is opened only after the release resolves, so a missing
    /// release is reported ahead of a missing file and a missing file never
    /// reaches the upload call.
    pub async fn publish(&self, request: &PublishRequest) -> Result<PublishOutcome> {
        log::info!(
            "Resolving release for tag '{}' in {}",
            request.tag,
            request.project
        );
        let endpoint = self
            .api
            .resolve_upload_endpoint(&request.project, &request.tag)
            .await?;
        log::debug!("Upload endpoint: {}", endpoint.url);

        let opened = request.artifact.open().await?;
        let asset_name = request.artifact.asset_name();
        log::info!(
            "Uploading {} as '{}' ({} bytes)",
            opened.path.display(),
            asset_name,
            opened.size
        );

        let uploaded = self
            .api
            .upload_asset(
                &endpoint,
                AssetUpload {
                    name: asset_name,
                    label: request.label.clone(),
                    content_type: request.content_type.clone(),
                    path: opened.path,
                    size: opened.size,
                    file: opened.file,
                },
            )
            .await?;
        log::info!("Uploaded asset {} ({})", uploaded.id, uploaded.name);

        Ok(PublishOutcome {
            release_id: endpoint.release_id,
            asset_name: uploaded.name,
            asset_url: uploaded.browser_download_url,
            api_url: uploaded.api_url,
            size: uploaded.size,
        })
    }
}

/// Validate `request` locally without any network call
pub async fn dry_run(request: &PublishRequest) -> Result<PublishPlan> {
    let opened = request.artifact.open().await?;
    Ok(PublishPlan {
        project: request.project.clone(),
        tag: request.tag.clone(),
        local_path: opened.path,
        asset_name: request.artifact.asset_name(),
        size: opened.size,
    })
}
