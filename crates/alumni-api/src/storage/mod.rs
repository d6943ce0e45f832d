//! Local storage for uploaded images
//!
//! Files are written under the configured upload directory with a random
//! name and served back from `/uploads`.

use std::path::Path;

use alumni_common::AppError;
use tracing::info;
use uuid::Uuid;

use crate::extractors::UploadedFile;

/// URL prefix the upload directory is served under
pub const UPLOADS_ROUTE: &str = "/uploads";

const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

/// Pick a safe extension from the client file name
fn extension(file_name: Option<&str>) -> Option<String> {
    let ext = Path::new(file_name?).extension()?.to_str()?.to_ascii_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

/// Store an uploaded image and return its public path, e.g. `/uploads/<uuid>.png`
pub async fn save_image(dir: &Path, file: &UploadedFile) -> Result<String, AppError> {
    if let Some(content_type) = &file.content_type {
        if !content_type.starts_with("image/") {
            return Err(AppError::BadRequest(format!(
                "Unsupported upload type: {content_type}"
            )));
        }
    }

    let stored_name = match extension(file.file_name.as_deref()) {
        Some(ext) => format!("{}.{ext}", Uuid::new_v4()),
        None => Uuid::new_v4().to_string(),
    };

    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| AppError::Storage(e.to_string()))?;
    tokio::fs::write(dir.join(&stored_name), &file.bytes)
        .await
        .map_err(|e| AppError::Storage(e.to_string()))?;

    info!(file = %stored_name, bytes = file.bytes.len(), "Upload stored");

    Ok(format!("{UPLOADS_ROUTE}/{stored_name}"))
}
