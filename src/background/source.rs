use super::types::BackgroundError;
use crate::util::{expand_tilde, resolve_against};
use async_trait::async_trait;
use std::path::PathBuf;

/// Abstraction over how background image bytes are fetched.
#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, BackgroundError>;
}

/// Reads images from the local filesystem.
///
/// Accepts plain paths (relative ones resolve against `asset_dir`) and
/// `file://` URLs. Any other scheme is rejected.
#[derive(Debug, Clone, Default)]
pub struct FileImageSource {
    asset_dir: Option<PathBuf>,
}

impl FileImageSource {
    pub fn new(asset_dir: Option<PathBuf>) -> Self {
        Self { asset_dir }
    }

    /// Maps an image URL to the file it names.
    pub fn resolve(&self, raw: &str) -> Result<PathBuf, BackgroundError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(BackgroundError::EmptyUrl);
        }

        match url::Url::parse(trimmed) {
            Ok(parsed) if parsed.scheme() == "file" => parsed
                .to_file_path()
                .map_err(|_| BackgroundError::InvalidUrl(trimmed.to_string())),
            // Single-letter schemes are Windows drive letters, not URLs
            Ok(parsed) if parsed.scheme().len() > 1 => {
                Err(BackgroundError::UnsupportedScheme(parsed.scheme().to_string()))
            }
            _ => Ok(resolve_against(
                self.asset_dir.as_deref(),
                expand_tilde(trimmed),
            )),
        }
    }
}

#[async_trait]
impl ImageSource for FileImageSource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, BackgroundError> {
        let path = self.resolve(url)?;
        tokio::fs::read(&path)
            .await
            .map_err(|source| BackgroundError::Io { path, source })
    }
}
