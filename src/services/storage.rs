//! Local disk storage for uploaded pictures.
//!
//! Files live under the configured root directory and are served by
//! `actix-files` under the configured public URL prefix.

use std::path::{Component, Path, PathBuf};

use tracing::info;
use uuid::Uuid;

use crate::config::StorageSettings;
use crate::error::{AppError, AppResult};

/// Image extensions accepted for property pictures.
pub const PICTURE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Disk-backed storage rooted at a directory.
#[derive(Clone, Debug)]
pub struct Storage {
    root: PathBuf,
    public_url: String,
}

impl Storage {
    /// Create the storage root if needed.
    pub async fn new(config: &StorageSettings) -> AppResult<Self> {
        tokio::fs::create_dir_all(&config.root).await.map_err(|e| {
            AppError::Storage(format!(
                "Failed to create storage directory {}: {}",
                config.root.display(),
                e
            ))
        })?;

        info!("Picture storage initialized: root={}", config.root.display());

        Ok(Self {
            root: config.root.clone(),
            public_url: config.public_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the content type for a picture based on its extension.
    pub fn content_type_for_extension(ext: &str) -> &'static str {
        match ext.to_lowercase().as_str() {
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "gif" => "image/gif",
            "webp" => "image/webp",
            _ => "application/octet-stream",
        }
    }

    /// Lower-cased extension of an uploaded file name, if it is an accepted picture type.
    pub fn picture_extension(filename: &str) -> Option<String> {
        let ext = Path::new(filename).extension()?.to_str()?.to_lowercase();
        PICTURE_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
    }

    /// Generate a fresh storage key for a picture.
    pub fn picture_key(ext: &str) -> String {
        format!("pictures/{}.{}", Uuid::new_v4(), ext)
    }

    /// Resolve a key to a path under the root, rejecting anything that escapes it.
    pub fn path(&self, key: &str) -> AppResult<PathBuf> {
        let relative = Path::new(key);
        let is_plain = !key.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !is_plain {
            return Err(AppError::InvalidInput(format!("Invalid storage key: {}", key)));
        }
        Ok(self.root.join(relative))
    }

    /// Public URL of a stored file.
    pub fn url(&self, key: &str) -> String {
        format!("{}/{}", self.public_url, key)
    }

    /// Write a file.
    pub async fn put(&self, key: &str, data: &[u8]) -> AppResult<()> {
        let path = self.path(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(&path, data)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to write {}: {}", key, e)))?;

        Ok(())
    }

    /// Whether a file exists.
    pub async fn exists(&self, key: &str) -> AppResult<bool> {
        let path = self.path(key)?;
        Ok(tokio::fs::try_exists(path).await?)
    }

    /// Delete a file. Returns `false` when it was already gone.
    pub async fn delete(&self, key: &str) -> AppResult<bool> {
        let path = self.path(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(AppError::Storage(format!("Failed to delete {}: {}", key, e))),
        }
    }
}
