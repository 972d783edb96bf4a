//! GitHub integration for release asset uploads
//!
//! [`ReleaseApi`] is the seam between the publish workflow and the release
//! host. [`GitHubClient`] is the production implementation.

mod client;
mod types;

pub use client::GitHubClient;
pub use types::{ApiErrorBody, ApiErrorDetail, AssetPayload, ReleasePayload};

use crate::config::ProjectRef;
use crate::error::Result;
use std::future::Future;
use std::path::PathBuf;

/// MIME type used when the caller does not pick one
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Where assets for one release are uploaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadEndpoint {
    /// Numeric release ID
    pub release_id: u64,
    /// Upload URL with any URI-template suffix removed
    pub url: String,
}

/// A single asset to attach to a release
#[derive(Debug)]
pub struct AssetUpload {
    /// Display name of the asset
    pub name: String,
    /// Optional label shown instead of the name on the release page
    pub label: Option<String>,
    /// MIME type sent as `Content-Type`
    pub content_type: String,
    /// Local path the content comes from
    pub path: PathBuf,
    /// Content length in bytes
    pub size: u64,
    /// Open file streamed as the request body
    pub file: tokio::fs::File,
}

/// Asset created on the release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedAsset {
    /// Asset ID
    pub id: u64,
    /// Asset name as stored by the server
    pub name: String,
    /// API URL of the asset
    pub api_url: String,
    /// Public download URL
    pub browser_download_url: String,
    /// Size in bytes as recorded by the server
    pub size: u64,
}

/// Release-hosting API capabilities needed to publish one asset
pub trait ReleaseApi {
    /// Find the release for `tag` in `project` and return its upload endpoint
    fn resolve_upload_endpoint(
        &self,
        project: &ProjectRef,
        tag: &str,
    ) -> impl Future<Output = Result<UploadEndpoint>> + Send;

    /// Upload `asset` to `endpoint`
    fn upload_asset(
        &self,
        endpoint: &UploadEndpoint,
        asset: AssetUpload,
    ) -> impl Future<Output = Result<UploadedAsset>> + Send;
}
