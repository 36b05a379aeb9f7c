//! Streams a stored attachment back to the client.

use std::io;

use axum::{
    body::Body,
    http::header,
    response::Response,
};

use super::error::ApiError;
use crate::attachment::AttachmentDownload;

/// Build the download response for a resolved attachment.
///
/// The file is sent as `Content-Disposition: attachment` under its original
/// name. A record whose file is gone from disk answers 404.
pub async fn download_response(download: &AttachmentDownload) -> Result<Response<Body>, ApiError> {
    let content = match tokio::fs::read(&download.path).await {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::warn!("Attachment file missing on disk: {:?}", download.path);
            return Err(ApiError::not_found("attachment file not found"));
        }
        Err(e) => {
            tracing::error!("Failed to read attachment {:?}: {}", download.path, e);
            return Err(ApiError::internal("Failed to read attachment"));
        }
    };

    let content_type = mime_guess::from_path(&download.display_name)
        .first_or_octet_stream()
        .to_string();

    Response::builder()
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_DISPOSITION, download.content_disposition())
        .header(header::CONTENT_LENGTH, content.len())
        .body(Body::from(content))
        .map_err(|e| {
            tracing::error!("Failed to build response: {}", e);
            ApiError::internal("Failed to build response")
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::ErrorCode;
    use axum::http::StatusCode;
    use http_body_util::BodyExt;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_download_response() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("20240806_x.pdf");
        std::fs::write(&path, b"%PDF-1.4").unwrap();
        let download = AttachmentDownload {
            path,
            display_name: "my report.pdf".to_string(),
        };

        let response = download_response(&download).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment;filename=my%20report.pdf"
        );
        assert_eq!(headers[header::CONTENT_LENGTH], "8");

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"%PDF-1.4");
    }

    #[tokio::test]
    async fn test_download_response_unknown_type() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("20240806_x");
        std::fs::write(&path, b"data").unwrap();
        let download = AttachmentDownload {
            path,
            display_name: "README".to_string(),
        };

        let response = download_response(&download).await.unwrap();

        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/octet-stream"
        );
    }

    #[tokio::test]
    async fn test_download_response_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let download = AttachmentDownload {
            path: temp_dir.path().join("gone.png"),
            display_name: "gone.png".to_string(),
        };

        let err = download_response(&download).await.unwrap_err();

        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
