//! Local release artifact: fixed path layout and asset naming.

use crate::error::{ConfigError, PublishError, Result};
use std::path::PathBuf;

/// A release binary built by cargo for one target triple
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    target: String,
    name: String,
}

/// An opened artifact ready to be streamed
#[derive(Debug)]
pub struct ArtifactFile {
    /// Path the file was opened from
    pub path: PathBuf,
    /// Size in bytes
    pub size: u64,
    /// Open handle positioned at the start
    pub file: tokio::fs::File,
}

impl Artifact {
    /// Create an artifact reference, validating both path components
    pub fn new(target: impl Into<String>, name: impl Into<String>) -> Result<Self> {
        let target = target.into();
        let name = name.into();
        validate_component("target triple", &target)?;
        validate_component("asset name", &name)?;
        Ok(Self { target, name })
    }

    /// `target/<target>/release/<name>`, relative to the working directory
    pub fn local_path(&self) -> PathBuf {
        ["target", self.target.as_str(), "release", self.name.as_str()]
            .iter()
            .collect()
    }

    /// Display name of the uploaded asset: `<name>-<target>`
    pub fn asset_name(&self) -> String {
        format!("{}-{}", self.name, self.target)
    }

    /// Open the artifact for reading.
    ///
    /// Fails with [`PublishError::FileAccess`] when the file is absent,
    /// unreadable or not a regular file.
    pub async fn open(&self) -> Result<ArtifactFile> {
        let path = self.local_path();
        let file_access = |source| PublishError::FileAccess {
            path: path.clone(),
            source,
        };

        let file = tokio::fs::File::open(&path).await.map_err(file_access)?;
        let metadata = file.metadata().await.map_err(file_access)?;
        if !metadata.is_file() {
            return Err(file_access(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "not a regular file",
            )));
        }

        log::debug!("Opened {} ({} bytes)", path.display(), metadata.len());

        Ok(ArtifactFile {
            size: metadata.len(),
            path,
            file,
        })
    }
}

fn validate_component(argument: &str, value: &str) -> std::result::Result<(), ConfigError> {
    let reason = if value.is_empty() {
        Some("must not be empty")
    } else if value.contains('/') || value.contains('\\') {
        Some("must not contain path separators")
    } else if value == "." || value == ".." {
        Some("must not be a relative path component")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(ConfigError::InvalidArgument {
            argument: argument.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_local_path_and_asset_name() {
        let artifact = Artifact::new("x86_64-unknown-linux-gnu", "mytool").unwrap();
        assert_eq!(
            artifact.local_path(),
            Path::new("target/x86_64-unknown-linux-gnu/release/mytool")
        );
        assert_eq!(artifact.asset_name(), "mytool-x86_64-unknown-linux-gnu");
    }

    #[test]
    fn test_windows_binary_keeps_extension_in_name() {
        let artifact = Artifact::new("x86_64-pc-windows-msvc", "mytool.exe").unwrap();
        assert_eq!(artifact.asset_name(), "mytool.exe-x86_64-pc-windows-msvc");
    }

    #[test]
    fn test_rejects_empty_components() {
        assert!(matches!(
            Artifact::new("", "mytool"),
            Err(PublishError::Configuration(ConfigError::InvalidArgument { .. }))
        ));
        assert!(matches!(
            Artifact::new("aarch64-apple-darwin", ""),
            Err(PublishError::Configuration(ConfigError::InvalidArgument { .. }))
        ));
    }

    #[test]
    fn test_rejects_path_traversal() {
        assert!(Artifact::new("..", "mytool").is_err());
        assert!(Artifact::new("aarch64-apple-darwin", "../secrets").is_err());
        assert!(Artifact::new("aarch64-apple-darwin", "bin\\tool").is_err());
    }

    #[tokio::test]
    async fn test_open_missing_file_is_file_access_error() {
        let artifact = Artifact::new("no-such-target-triple", "no-such-binary").unwrap();
        let err = artifact.open().await.unwrap_err();
        match err {
            PublishError::FileAccess { path, source } => {
                assert_eq!(path, artifact.local_path());
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected FileAccess, got {other:?}"),
        }
    }
}
