//! Access to the server's files directory.
//!
//! Trajectory logs and pictures referenced by path are read through
//! [`read_stored`]; multipart uploads are written through [`store_upload`].

use std::path::{Path, PathBuf};

use agrobot_core::error::CoreError;
use agrobot_core::storage::{resolve_within, sanitize_file_name};
use image::ImageFormat;

use crate::error::{AppError, AppResult};

/// Read a previously stored file named by a client-supplied path.
pub async fn read_stored(files_dir: &Path, requested: &str, max_bytes: usize) -> AppResult<Vec<u8>> {
    let path = resolve_within(files_dir, requested)?;

    let metadata = match tokio::fs::metadata(&path).await {
        Ok(m) if m.is_file() => m,
        _ => {
            return Err(CoreError::Validation(format!("file '{requested}' does not exist")).into())
        }
    };
    if metadata.len() > max_bytes as u64 {
        return Err(CoreError::Validation(format!(
            "file '{requested}' exceeds the {max_bytes} byte limit"
        ))
        .into());
    }

    tokio::fs::read(&path).await.map_err(|e| {
        AppError::InternalError(format!("failed to read '{}': {e}", path.display()))
    })
}

/// Write an uploaded file under `files_dir`, returning its path.
///
/// The name is sanitized and prefixed with a random UUID so concurrent
/// uploads of the same file never collide.
pub async fn store_upload(files_dir: &Path, original_name: &str, bytes: &[u8]) -> AppResult<PathBuf> {
    let name = sanitize_file_name(original_name)?;
    let path = files_dir.join(format!("{}-{name}", uuid::Uuid::new_v4()));

    tokio::fs::create_dir_all(files_dir)
        .await
        .map_err(|e| AppError::InternalError(format!("failed to create files directory: {e}")))?;
    tokio::fs::write(&path, bytes)
        .await
        .map_err(|e| AppError::InternalError(format!("failed to store '{}': {e}", path.display())))?;

    tracing::debug!(path = %path.display(), size = bytes.len(), "Stored upload");
    Ok(path)
}

/// Remove a stored file, logging rather than failing on error.
pub async fn remove_quietly(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        tracing::warn!(path = %path.display(), error = %e, "Failed to remove stored file");
    }
}

/// Content type of an accepted picture, or a validation error.
///
/// Only PNG, JPEG and WebP are accepted.
pub fn image_content_type(bytes: &[u8]) -> Result<&'static str, CoreError> {
    match image::guess_format(bytes) {
        Ok(ImageFormat::Png) => Ok("image/png"),
        Ok(ImageFormat::Jpeg) => Ok("image/jpeg"),
        Ok(ImageFormat::WebP) => Ok("image/webp"),
        _ => Err(CoreError::Validation(
            "image must be a PNG, JPEG or WebP file".to_string(),
        )),
    }
}

/// Load and check the picture referenced by an optional `image_path`.
pub async fn load_image(
    files_dir: &Path,
    image_path: Option<&str>,
    max_bytes: usize,
) -> AppResult<Option<Vec<u8>>> {
    let Some(requested) = image_path else {
        return Ok(None);
    };
    let bytes = read_stored(files_dir, requested, max_bytes).await?;
    image_content_type(&bytes)?;
    Ok(Some(bytes))
}
