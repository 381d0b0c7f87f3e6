use crate::config::StorageConfig;
use image::RgbImage;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to write file {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to create directory {path}: {source}")]
    CreateDirFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to encode result image {path}: {source}")]
    EncodeFailed {
        path: PathBuf,
        source: image::ImageError,
    },
}

/// A stored upload. The key names both the upload and, later, the annotated
/// result artifact.
#[derive(Debug, Clone)]
pub struct StoredImage {
    pub key: String,
    pub upload_path: PathBuf,
}

impl StoredImage {
    pub fn upload_url(&self) -> String {
        format!("/static/uploads/{}", self.key)
    }

    pub fn result_url(&self) -> String {
        format!("/static/results/{}", self.key)
    }
}

/// Flat on-disk store for uploaded and annotated images.
///
/// Every upload gets a fresh uuid-prefixed key, so concurrent uploads with
/// the same client filename never collide. Files are kept forever; there is
/// no cleanup policy.
pub struct ImageStore {
    upload_dir: PathBuf,
    result_dir: PathBuf,
}

impl ImageStore {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            upload_dir: PathBuf::from(&config.upload_dir),
            result_dir: PathBuf::from(&config.result_dir),
        }
    }

    pub async fn ensure_dirs(&self) -> Result<(), StorageError> {
        for dir in [&self.upload_dir, &self.result_dir] {
            fs::create_dir_all(dir)
                .await
                .map_err(|source| StorageError::CreateDirFailed {
                    path: dir.clone(),
                    source,
                })?;
        }
        Ok(())
    }

    pub async fn save_upload(
        &self,
        filename: &str,
        bytes: &[u8],
    ) -> Result<StoredImage, StorageError> {
        let key = format!("{}_{}", Uuid::new_v4(), sanitize_filename::sanitize(filename));
        let upload_path = self.upload_dir.join(&key);

        fs::write(&upload_path, bytes)
            .await
            .map_err(|source| StorageError::WriteFailed {
                path: upload_path.clone(),
                source,
            })?;

        Ok(StoredImage { key, upload_path })
    }

    /// Writes the annotated image under the same key as the upload. The
    /// output format follows the key's extension, defaulting to JPEG when
    /// the extension is missing or unknown.
    pub fn save_result(&self, key: &str, image: &RgbImage) -> Result<PathBuf, StorageError> {
        let path = self.result_dir.join(key);

        let result = match image::ImageFormat::from_path(&path) {
            Ok(_) => image.save(&path),
            Err(_) => image.save_with_format(&path, image::ImageFormat::Jpeg),
        };
        result.map_err(|source| StorageError::EncodeFailed {
            path: path.clone(),
            source,
        })?;

        Ok(path)
    }

    pub fn upload_file_path(&self, key: &str) -> PathBuf {
        self.upload_dir.join(key)
    }

    pub fn result_file_path(&self, key: &str) -> PathBuf {
        self.result_dir.join(key)
    }

    pub fn result_exists(&self, key: &str) -> bool {
        self.result_dir.join(key).exists()
    }
}

/// Rejects keys that try to escape the flat store directories. A valid key
/// is a single normal path component.
pub fn valid_key(name: &str) -> bool {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(std::path::Component::Normal(_)), None) => !name.starts_with('.'),
        _ => false,
    }
}
