//! Error types for the noticeboard.

use thiserror::Error;

/// Common error type for the noticeboard.
#[derive(Error, Debug)]
pub enum NoticeboardError {
    /// Database error.
    ///
    /// Errors from sqlx are converted into this variant.
    #[error("database error: {0}")]
    Database(String),

    /// Local I/O error (directory creation, file transfer or deletion).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The acting user does not own the resource.
    #[error("permission denied: {0}")]
    Permission(String),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for NoticeboardError {
    fn from(e: sqlx::Error) -> Self {
        NoticeboardError::Database(e.to_string())
    }
}

/// Result type alias for noticeboard operations.
pub type Result<T> = std::result::Result<T, NoticeboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_error_display() {
        let err = NoticeboardError::Permission("not the author".to_string());
        assert_eq!(err.to_string(), "permission denied: not the author");
    }

    #[test]
    fn test_validation_error_display() {
        let err = NoticeboardError::Validation("title is empty".to_string());
        assert_eq!(err.to_string(), "validation error: title is empty");
    }

    #[test]
    fn test_not_found_error_display() {
        let err = NoticeboardError::NotFound("post".to_string());
        assert_eq!(err.to_string(), "post not found");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err: NoticeboardError = io_err.into();
        assert!(matches!(err, NoticeboardError::Io(_)));
        assert!(err.to_string().contains("read-only"));
    }

    #[test]
    fn test_sqlx_error_conversion() {
        let err: NoticeboardError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, NoticeboardError::Database(_)));
    }
}
