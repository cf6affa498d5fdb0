//! Local file attachments
//!
//! Attaching a file is two steps. [`Uploader::attach`] checks the file
//! synchronously and returns an `ADD_ATTACHMENT` action whose url is still
//! pending, so the UI can show the attachment right away. A background task
//! then reads the file and sends exactly one `SET_ATTACHMENT` with either a
//! `data:` url or the failure sentinel to the session's dispatcher.
//!
//! The task never retries; a failed attachment stays failed until the user
//! removes it.

use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::config::UploadConfig;
use crate::editor::actions::{resolve_attachment_action, Action};
use crate::editor::document::{Attachment, AttachmentUrl, FileType};
use crate::editor::session::Dispatcher;
use crate::error::{Result, UploadError};
use crate::ids::new_id;

const FALLBACK_MIME: &str = "application/octet-stream";

/// Guess a MIME type from a file extension
pub fn mime_from_extension(ext: &str) -> &'static str {
    match ext.to_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mp3" => "audio/mpeg",
        "pdf" => "application/pdf",
        "json" => "application/json",
        "txt" => "text/plain",
        "md" => "text/markdown",
        "csv" => "text/csv",
        "zip" => "application/zip",
        _ => FALLBACK_MIME,
    }
}

pub fn mime_for_path(path: &Path) -> &'static str {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(FALLBACK_MIME, mime_from_extension)
}

/// Encode a payload as a `data:` url
pub fn data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// An attachment whose url is still being produced
#[derive(Debug)]
pub struct PendingUpload {
    /// `ADD_ATTACHMENT` to dispatch now
    pub action: Action,
    pub attachment_id: String,
    /// Finishes once the resolution has been sent
    pub task: JoinHandle<()>,
}

/// Turns local files into attachments for one session
pub struct Uploader {
    runtime: Handle,
    dispatcher: Dispatcher,
    max_bytes: u64,
}

impl Uploader {
    pub fn new(runtime: Handle, dispatcher: Dispatcher, config: &UploadConfig) -> Self {
        Self {
            runtime,
            dispatcher,
            max_bytes: config.max_bytes,
        }
    }

    /// Start attaching the file at `path`
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `path` has no file name
    /// - the file's metadata cannot be read
    /// - the file is larger than the configured limit
    pub fn attach(&self, path: impl AsRef<Path>) -> Result<PendingUpload> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| UploadError::MissingFileName(path.display().to_string()))?;

        let size = std::fs::metadata(path)
            .map_err(|e| UploadError::Read(format!("{}: {}", path.display(), e)))?
            .len();
        if size > self.max_bytes {
            tracing::warn!(
                "Refusing to attach {}: {} bytes exceeds limit of {}",
                file_name,
                size,
                self.max_bytes
            );
            return Err(UploadError::TooLarge {
                file_name,
                size,
                limit: self.max_bytes,
            }
            .into());
        }

        let attachment = Attachment {
            id: new_id(),
            file_name,
            file_type: FileType::Attachment,
            url: AttachmentUrl::Pending(new_id()),
        };
        let attachment_id = attachment.id.clone();
        tracing::debug!(
            "Attaching {} ({} bytes) as {}",
            attachment.file_name,
            size,
            attachment_id
        );

        let task = self.runtime.spawn(resolve(
            path.to_path_buf(),
            attachment_id.clone(),
            self.max_bytes,
            self.dispatcher.clone(),
        ));

        Ok(PendingUpload {
            action: Action::AddAttachment(attachment),
            attachment_id,
            task,
        })
    }
}

async fn resolve(path: PathBuf, id: String, max_bytes: u64, dispatcher: Dispatcher) {
    let outcome = read_data_url(&path, max_bytes).await;
    match &outcome {
        Ok(_) => tracing::debug!("Resolved attachment {}", id),
        Err(e) => tracing::warn!("Attachment {} failed: {}", id, e),
    }
    dispatcher.send(resolve_attachment_action(id, outcome));
}

async fn read_data_url(path: &Path, max_bytes: u64) -> std::result::Result<String, UploadError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| UploadError::Read(format!("{}: {}", path.display(), e)))?;

    // The file may have grown since the size check
    let size = bytes.len() as u64;
    if size > max_bytes {
        return Err(UploadError::TooLarge {
            file_name: path.display().to_string(),
            size,
            limit: max_bytes,
        });
    }

    Ok(data_url(mime_for_path(path), &bytes))
}
