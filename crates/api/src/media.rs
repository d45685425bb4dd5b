//! Attachment storage under the media root.

use std::path::Path;

use gridops_core::fault::{sanitize_filename, ATTACHMENT_DIR};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Write an uploaded attachment and return its path relative to the media
/// root (`attachments/<uuid>_<name>`).
pub async fn save_attachment(
    media_root: &Path,
    original_name: &str,
    bytes: &[u8],
) -> AppResult<String> {
    let dir = media_root.join(ATTACHMENT_DIR);
    tokio::fs::create_dir_all(&dir).await.map_err(|e| {
        AppError::InternalError(format!("Failed to create attachment directory: {e}"))
    })?;

    let stored_name = format!("{}_{}", Uuid::new_v4().simple(), sanitize_filename(original_name));
    tokio::fs::write(dir.join(&stored_name), bytes)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to write attachment: {e}")))?;

    tracing::debug!(file = %stored_name, size = bytes.len(), "Attachment stored");
    Ok(format!("{ATTACHMENT_DIR}/{stored_name}"))
}

/// Absolute URL of a stored attachment.
///
/// `media_url` is expected to start and end with `/`.
pub fn attachment_url(origin: &str, media_url: &str, relative_path: &str) -> String {
    format!("{}{media_url}{relative_path}", origin.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn attachment_lands_under_media_root() {
        let root = tempfile::tempdir().unwrap();
        let path = save_attachment(root.path(), "../site photo.jpg", b"jpeg")
            .await
            .unwrap();

        assert!(path.starts_with("attachments/"));
        assert!(path.ends_with("_site_photo.jpg"));
        let written = tokio::fs::read(root.path().join(&path)).await.unwrap();
        assert_eq!(written, b"jpeg");
    }

    #[test]
    fn url_joins_origin_prefix_and_path() {
        assert_eq!(
            attachment_url("http://ops.local:8000/", "/media/", "attachments/a_b.pdf"),
            "http://ops.local:8000/media/attachments/a_b.pdf"
        );
    }
}
