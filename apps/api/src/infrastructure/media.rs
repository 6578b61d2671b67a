use std::path::{Path, PathBuf};

use thiserror::Error;
use uuid::Uuid;

/// Directory under the media root that holds ad images
const AD_IMAGE_DIR: &str = "ad_images";

/// Errors raised while storing uploaded files
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Uploaded file is empty")]
    EmptyFile,

    #[error("Failed to write media file: {0}")]
    Io(#[from] std::io::Error),
}

/// Local filesystem storage for uploaded images
///
/// Files are stored under `root` and addressed by a path relative to it;
/// URLs are that relative path appended to `base_url`.
#[derive(Debug, Clone)]
pub struct MediaStorage {
    root: PathBuf,
    base_url: String,
}

impl MediaStorage {
    /// Creates a new MediaStorage
    ///
    /// # Arguments
    /// * `root` - Directory uploaded files are written to
    /// * `base_url` - URL prefix the root directory is served under
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Stores an ad image and returns its path relative to the media root
    ///
    /// The stored name is random; only the extension of `file_name` is kept.
    pub async fn save_ad_image(
        &self,
        file_name: Option<&str>,
        bytes: &[u8],
    ) -> Result<String, MediaError> {
        if bytes.is_empty() {
            return Err(MediaError::EmptyFile);
        }

        let stored_name = match file_name.and_then(extension) {
            Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
            None => Uuid::new_v4().to_string(),
        };

        let dir = self.root.join(AD_IMAGE_DIR);
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(&stored_name), bytes).await?;

        tracing::debug!(file = %stored_name, size = bytes.len(), "Stored ad image");

        Ok(format!("{}/{}", AD_IMAGE_DIR, stored_name))
    }

    /// Removes a stored file; a file that is already gone is not an error
    pub async fn remove(&self, relative: &str) -> Result<(), MediaError> {
        match tokio::fs::remove_file(self.root.join(relative)).await {
            Ok(()) => {
                tracing::debug!(file = %relative, "Removed media file");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Public URL of a stored file
    pub fn url(&self, relative: &str) -> String {
        if self.base_url.ends_with('/') {
            format!("{}{}", self.base_url, relative)
        } else {
            format!("{}/{}", self.base_url, relative)
        }
    }
}

/// Lower-cased extension of an uploaded filename, if it is plain alphanumeric
fn extension(file_name: &str) -> Option<String> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() || ext.len() > 10 {
        return None;
    }
    if !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}
