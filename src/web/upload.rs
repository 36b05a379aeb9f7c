//! Multipart form adapters producing upload payloads.

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::Multipart;
use axum::http::StatusCode;

use super::error::ApiError;
use crate::attachment::{AttachmentChange, UploadedFile};

/// Multipart field carrying the attachment.
pub const UPLOAD_FIELD: &str = "upload";

/// Fields of the post write/edit form.
#[derive(Debug, Clone, Default)]
pub struct PostForm {
    /// Title field.
    pub title: String,
    /// Body field.
    pub contents: String,
    /// Chosen file, if a non-empty one was sent.
    pub upload: Option<UploadedFile>,
    /// Whether the author ticked "keep current attachment".
    pub keep_attachment: bool,
}

impl PostForm {
    /// Attachment change requested by an edit form.
    ///
    /// A new file always wins. Without one, the existing attachment is kept
    /// only when asked for; otherwise it is removed.
    pub fn attachment_change(&mut self) -> AttachmentChange {
        match self.upload.take() {
            Some(upload) => AttachmentChange::Replace(upload),
            None if self.keep_attachment => AttachmentChange::Keep,
            None => AttachmentChange::Remove,
        }
    }
}

fn multipart_error(e: MultipartError) -> ApiError {
    tracing::warn!("Failed to read multipart data: {}", e);
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::payload_too_large("Request body too large")
    } else {
        ApiError::bad_request("Invalid multipart data")
    }
}

async fn read_file_field(field: Field<'_>, max_size: u64) -> Result<Option<UploadedFile>, ApiError> {
    let filename = field.file_name().unwrap_or("").to_string();
    let content = field.bytes().await.map_err(multipart_error)?;

    if content.len() as u64 > max_size {
        let max_mb = max_size / 1024 / 1024;
        return Err(ApiError::payload_too_large(format!(
            "File too large (max {}MB)",
            max_mb
        )));
    }

    // Browsers send an empty part when no file was chosen
    if filename.is_empty() || content.is_empty() {
        return Ok(None);
    }

    Ok(Some(UploadedFile::new(filename, content.to_vec())))
}

/// Collect the file sent under `field_name`.
///
/// Other fields are skipped. Returns `None` when the field is absent or the
/// part is empty.
pub async fn read_upload(
    multipart: &mut Multipart,
    field_name: &str,
    max_size: u64,
) -> Result<Option<UploadedFile>, ApiError> {
    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() == Some(field_name) {
            upload = read_file_field(field, max_size).await?;
        }
    }
    Ok(upload)
}

/// Read the post write/edit form.
pub async fn read_post_form(mut multipart: Multipart, max_size: u64) -> Result<PostForm, ApiError> {
    let mut form = PostForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "title" => form.title = field.text().await.map_err(multipart_error)?,
            "contents" => form.contents = field.text().await.map_err(multipart_error)?,
            "keep_attachment" => {
                let value = field.text().await.map_err(multipart_error)?;
                form.keep_attachment = matches!(value.trim(), "on" | "true" | "1");
            }
            UPLOAD_FIELD => form.upload = read_file_field(field, max_size).await?,
            _ => {}
        }
    }

    Ok(form)
}
