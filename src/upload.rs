//! Transient storage for uploaded report files.
//!
//! Each upload is streamed to its own file under the configured upload directory. File names
//! are random UUIDs so concurrent requests never share a path. An [`UploadedFile`] owns its file:
//! dropping it deletes the file, so the copy disappears on every exit path, including a request
//! whose future is dropped when the client disconnects.

use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Name of the multipart field carrying the report.
pub const FILE_FIELD: &str = "file";

const UNKNOWN_FILE_NAME: &str = "unknown";
const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Errors raised while persisting an upload to disk.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The multipart stream ended prematurely or was malformed.
    #[error("Failed to read multipart payload: {0}")]
    Multipart(#[from] MultipartError),
    /// Writing the transient file failed.
    #[error("Failed to store upload: {0}")]
    Io(#[from] std::io::Error),
}

/// A report persisted on local disk for the duration of one request.
///
/// The file is deleted exactly once, when this value is dropped.
#[derive(Debug)]
pub struct UploadedFile {
    /// Location of the transient copy.
    pub path: PathBuf,
    /// File name supplied by the client.
    pub original_name: String,
    /// Content type supplied by the client.
    pub mime_type: String,
}

/// Persist the first `file` field of a multipart request.
///
/// Other fields are skipped. Returns `Ok(None)` when the request carries no `file` field.
pub async fn receive_file(
    multipart: &mut Multipart,
    upload_dir: &Path,
) -> Result<Option<UploadedFile>, UploadError> {
    while let Some(mut field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            tracing::debug!(field = ?field.name(), "Skipping multipart field");
            continue;
        }

        let original_name = field
            .file_name()
            .unwrap_or(UNKNOWN_FILE_NAME)
            .to_string();
        let mime_type = field
            .content_type()
            .unwrap_or(DEFAULT_MIME_TYPE)
            .to_string();

        fs::create_dir_all(upload_dir).await?;
        let upload = UploadedFile {
            path: upload_dir.join(Uuid::new_v4().simple().to_string()),
            original_name,
            mime_type,
        };

        // A failed or abandoned write drops `upload`, which removes the partial file.
        let written = write_field(&mut field, &upload.path).await?;

        tracing::info!(
            path = %upload.path.display(),
            original_name = %upload.original_name,
            mime_type = %upload.mime_type,
            bytes = written,
            "Stored upload"
        );

        return Ok(Some(upload));
    }

    Ok(None)
}

async fn write_field(
    field: &mut axum::extract::multipart::Field<'_>,
    path: &Path,
) -> Result<u64, UploadError> {
    let mut file = fs::File::create(path).await?;
    let mut written = 0_u64;
    while let Some(chunk) = field.chunk().await? {
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;
    Ok(written)
}

impl Drop for UploadedFile {
    fn drop(&mut self) {
        remove_upload(&self.path);
    }
}

/// Delete a transient upload. Failures are logged and swallowed.
///
/// Runs synchronously so it can be called from `Drop`, where no executor is guaranteed.
pub fn remove_upload(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => tracing::debug!(path = %path.display(), "Removed transient upload"),
        Err(error) => tracing::error!(
            path = %path.display(),
            %error,
            "Failed to delete the temporary file"
        ),
    }
}
