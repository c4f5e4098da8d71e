//! Profile photo storage on the local filesystem.
//!
//! Uploaded files are written under the configured uploads directory
//! and referenced from the user record by filename only.

use std::path::{Path, PathBuf};

use chrono::Utc;
use thiserror::Error;

/// Filename used when a user has no uploaded photo.
pub const DEFAULT_PHOTO: &str = "default.png";

/// Errors from photo storage operations.
#[derive(Debug, Error)]
pub enum UploadError {
    /// Filesystem failure.
    #[error("upload storage error: {0}")]
    Io(#[from] std::io::Error),

    /// The uploaded filename had no usable extension.
    #[error("unsupported file name: {0}")]
    BadFileName(String),
}

/// Stores uploaded profile photos on disk.
#[derive(Debug, Clone)]
pub struct PhotoStore {
    root: PathBuf,
}

impl PhotoStore {
    /// Create a store rooted at `root`. The directory is created on
    /// first write, not here.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory the photos live in, for serving as static files.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persist an uploaded photo and return its generated filename.
    ///
    /// Filenames are `<unix-millis>-<random>` plus the original
    /// extension, so concurrent uploads never collide.
    ///
    /// # Errors
    ///
    /// Returns `UploadError::BadFileName` if the original name has no
    /// extension, or `UploadError::Io` on filesystem failure.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<String, UploadError> {
        let extension = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| UploadError::BadFileName(original_name.to_owned()))?;

        let filename = format!(
            "{}-{}.{}",
            Utc::now().timestamp_millis(),
            rand::random::<u32>(),
            extension.to_ascii_lowercase()
        );

        tokio::fs::create_dir_all(&self.root).await?;
        tokio::fs::write(self.root.join(&filename), bytes).await?;

        Ok(filename)
    }

    /// Delete a stored photo.
    ///
    /// The placeholder is never deleted, and a missing file is not an
    /// error (the record may outlive the file).
    ///
    /// # Errors
    ///
    /// Returns `UploadError::Io` on filesystem failure other than the
    /// file being absent.
    pub async fn delete(&self, filename: &str) -> Result<(), UploadError> {
        if filename == DEFAULT_PHOTO || filename.is_empty() {
            return Ok(());
        }

        match tokio::fs::remove_file(self.root.join(filename)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(UploadError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_generates_unique_names_and_delete_removes() {
        let dir = std::env::temp_dir().join(format!("bodega-uploads-{}", rand::random::<u32>()));
        let store = PhotoStore::new(&dir);

        let a = store.save("me.PNG", b"aaa").await.expect("save a");
        let b = store.save("me.png", b"bbb").await.expect("save b");
        assert_ne!(a, b);
        assert!(a.ends_with(".png"), "extension lowercased: {a}");
        assert!(dir.join(&a).exists());

        store.delete(&a).await.expect("delete");
        assert!(!dir.join(&a).exists());

        // Deleting the placeholder or a missing file is a no-op.
        store.delete(DEFAULT_PHOTO).await.expect("placeholder");
        store.delete(&a).await.expect("already gone");

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn test_save_rejects_extensionless_names() {
        let store = PhotoStore::new(std::env::temp_dir());
        assert!(matches!(
            store.save("noextension", b"x").await,
            Err(UploadError::BadFileName(_))
        ));
    }
}
