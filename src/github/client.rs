//! `reqwest`-backed client for the GitHub releases API.

use super::types::{ApiErrorBody, AssetPayload, ReleasePayload};
use super::{AssetUpload, ReleaseApi, UploadEndpoint, UploadedAsset};
use crate::config::{ENV_API_URL, ProjectRef, PublishConfig};
use crate::error::{ConfigError, PublishError, ResolutionError, Result, UploadError};
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, CONTENT_LENGTH, CONTENT_TYPE, HeaderMap, HeaderValue};
use std::fmt;
use std::time::Duration;
use tokio_util::io::ReaderStream;
use url::Url;

const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const GITHUB_API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Authenticated GitHub releases client
#[derive(Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    api_url: Url,
    username: String,
    credential: String,
    timeout: Duration,
}

impl fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubClient")
            .field("api_url", &self.api_url.as_str())
            .field("username", &self.username)
            .field("credential", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GitHubClient {
    /// Build a client authenticating as `config.username` with `config.credential`
    pub fn new(config: &PublishConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));
        headers.insert(
            "x-github-api-version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient {
                reason: e.to_string(),
            })?;

        Ok(Self {
            http,
            api_url: config.api_url.clone(),
            username: config.username.clone(),
            credential: config.credential.clone(),
            timeout: config.timeout,
        })
    }

    /// API URL built from percent-encoded path segments
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| ConfigError::InvalidEnv {
                name: ENV_API_URL.to_string(),
                reason: format!("'{}' cannot be used as a base URL", self.api_url),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authentication_error(status: StatusCode, body: &ApiErrorBody) -> PublishError {
        let reason = if body.message.is_empty() {
            status.to_string()
        } else {
            format!("{} ({})", body.message, status)
        };
        PublishError::Authentication { reason }
    }
}

/// Strip the RFC 6570 template suffix GitHub appends to upload URLs
pub(crate) fn strip_uri_template(upload_url: &str) -> &str {
    upload_url
        .split_once('{')
        .map_or(upload_url, |(head, _)| head)
}

impl ReleaseApi for GitHubClient {
    async fn resolve_upload_endpoint(
        &self,
        project: &ProjectRef,
        tag: &str,
    ) -> Result<UploadEndpoint> {
        let url = self.endpoint(&["repos", &project.owner, &project.repo, "releases", "tags", tag])?;
        log::debug!("GET {}", url);

        let response = self
            .http
            .get(url.clone())
            .basic_auth(&self.username, Some(&self.credential))
            .send()
            .await
            .map_err(|e| ResolutionError::Network {
                reason: if e.is_timeout() {
                    format!("timed out after {}s", self.timeout.as_secs())
                } else {
                    e.to_string()
                },
            })?;

        let status = response.status();
        if status.is_success() {
            let release: ReleasePayload =
                response
                    .json()
                    .await
                    .map_err(|e| ResolutionError::InvalidResponse {
                        reason: e.to_string(),
                    })?;

            let upload_url = strip_uri_template(&release.upload_url);
            if upload_url.is_empty() {
                return Err(ResolutionError::InvalidResponse {
                    reason: format!("release {} has no upload_url", release.id),
                }
                .into());
            }
            if release.draft {
                log::warn!("Release for tag '{}' is still a draft", release.tag_name);
            }
            log::debug!("Resolved release {} ({})", release.id, release.url);

            return Ok(UploadEndpoint {
                release_id: release.id,
                url: upload_url.to_string(),
            });
        }

        let body = ApiErrorBody::parse(&response.text().await.unwrap_or_default());
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(Self::authentication_error(status, &body))
            }
            StatusCode::NOT_FOUND => Err(ResolutionError::ReleaseNotFound {
                project: project.to_string(),
                tag: tag.to_string(),
            }
            .into()),
            _ => Err(ResolutionError::Api {
                status: status.as_u16(),
                url: url.to_string(),
                message: body.message,
            }
            .into()),
        }
    }

    async fn upload_asset(
        &self,
        endpoint: &UploadEndpoint,
        asset: AssetUpload,
    ) -> Result<UploadedAsset> {
        let AssetUpload {
            name,
            label,
            content_type,
            path,
            size,
            file,
        } = asset;

        let mut url = Url::parse(&endpoint.url).map_err(|e| UploadError::InvalidEndpoint {
            endpoint: endpoint.url.clone(),
            reason: e.to_string(),
        })?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("name", &name);
            if let Some(label) = &label {
                query.append_pair("label", label);
            }
        }
        log::debug!("POST {} ({}, {} bytes from {})", url, content_type, size, path.display());

        let body = reqwest::Body::wrap_stream(ReaderStream::new(file));
        let response = self
            .http
            .post(url)
            .basic_auth(&self.username, Some(&self.credential))
            .header(CONTENT_TYPE, content_type.as_str())
            .header(CONTENT_LENGTH, size)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    UploadError::Timeout {
                        name: name.clone(),
                        seconds: self.timeout.as_secs(),
                    }
                } else {
                    UploadError::Network {
                        name: name.clone(),
                        reason: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if status.is_success() {
            let asset: AssetPayload =
                response
                    .json()
                    .await
                    .map_err(|e| UploadError::InvalidResponse {
                        reason: e.to_string(),
                    })?;

            if let Some(state) = asset.state.as_deref().filter(|s| *s != "uploaded") {
                log::warn!("Asset '{}' reported state '{}'", asset.name, state);
            }

            return Ok(UploadedAsset {
                id: asset.id,
                name: asset.name,
                api_url: asset.url,
                browser_download_url: asset.browser_download_url,
                size: asset.size,
            });
        }

        let body = ApiErrorBody::parse(&response.text().await.unwrap_or_default());
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(Self::authentication_error(status, &body))
            }
            StatusCode::UNPROCESSABLE_ENTITY if body.is_already_exists() => {
                Err(UploadError::DuplicateAsset { name }.into())
            }
            _ => Err(UploadError::Rejected {
                name,
                status: status.as_u16(),
                message: body.message,
            }
            .into()),
        }
    }
}
