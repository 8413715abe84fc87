//! Reads picked image files into upload attachments.

use maph_core::files::Attachment;
use maph_core::{MaphError, Result};
use std::path::Path;

/// Loads `path` and guesses its MIME type from the extension.
pub async fn load_attachment(path: &Path) -> Result<Attachment> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| MaphError::storage(format!("cannot read {}: {}", path.display(), e)))?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| MaphError::storage(format!("{} is not a file", path.display())))?;

    let mime_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();

    tracing::debug!("Attached {} ({}, {} bytes)", file_name, mime_type, bytes.len());

    Ok(Attachment {
        file_name,
        mime_type,
        bytes,
    })
}
