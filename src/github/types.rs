//! Wire types for the GitHub releases API.

use serde::Deserialize;

/// Release returned by `GET /repos/{owner}/{repo}/releases/tags/{tag}`
#[derive(Debug, Clone, Deserialize)]
pub struct ReleasePayload {
    /// Release ID
    pub id: u64,
    /// Tag name (e.g. `"v0.3.0"`)
    pub tag_name: String,
    /// API URL of the release
    pub url: String,
    /// Upload URL template, e.g. `https://uploads.github.com/repos/o/r/releases/1/assets{?name,label}`
    pub upload_url: String,
    /// Whether the release is still a draft
    #[serde(default)]
    pub draft: bool,
}

/// Asset returned by the upload endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct AssetPayload {
    /// Asset ID
    pub id: u64,
    /// File name
    pub name: String,
    /// API URL
    pub url: String,
    /// Direct download URL
    pub browser_download_url: String,
    /// Size in bytes
    #[serde(default)]
    pub size: u64,
    /// Upload state (`uploaded` once complete)
    #[serde(default)]
    pub state: Option<String>,
}

/// Error document GitHub sends with 4xx responses
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    /// Human-readable message
    #[serde(default)]
    pub message: String,
    /// Field-level validation errors
    #[serde(default)]
    pub errors: Vec<ApiErrorDetail>,
}

/// One validation error entry
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorDetail {
    /// Resource type (e.g. `ReleaseAsset`)
    #[serde(default)]
    pub resource: Option<String>,
    /// Error code (e.g. `already_exists`)
    #[serde(default)]
    pub code: Option<String>,
    /// Offending field
    #[serde(default)]
    pub field: Option<String>,
}

impl ApiErrorBody {
    /// Parse an error body, falling back to the raw text as the message
    pub fn parse(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_else(|_| Self {
            message: body.trim().to_string(),
            errors: Vec::new(),
        })
    }

    /// Whether the server reports an asset with the same name already exists
    pub fn is_already_exists(&self) -> bool {
        self.errors
            .iter()
            .any(|e| e.code.as_deref() == Some("already_exists"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duplicate_asset_error() {
        let body = r#"{
            "message": "Validation Failed",
            "errors": [{"resource": "ReleaseAsset", "code": "already_exists", "field": "name"}],
            "documentation_url": "https://docs.github.com/rest/releases/assets#upload-a-release-asset"
        }"#;
        let parsed = ApiErrorBody::parse(body);
        assert_eq!(parsed.message, "Validation Failed");
        assert!(parsed.is_already_exists());
    }

    #[test]
    fn test_parse_non_json_error_keeps_text() {
        let parsed = ApiErrorBody::parse("  upstream connect error  ");
        assert_eq!(parsed.message, "upstream connect error");
        assert!(!parsed.is_already_exists());
    }

    #[test]
    fn test_release_payload_ignores_extra_fields() {
        let body = r#"{
            "id": 42,
            "tag_name": "v1.0.0",
            "url": "https://api.github.com/repos/octo/mytool/releases/42",
            "upload_url": "https://uploads.github.com/repos/octo/mytool/releases/42/assets{?name,label}",
            "html_url": "https://github.com/octo/mytool/releases/tag/v1.0.0",
            "assets": []
        }"#;
        let release: ReleasePayload = serde_json::from_str(body).unwrap();
        assert_eq!(release.id, 42);
        assert!(!release.draft);
    }
}
