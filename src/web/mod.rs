//! HTTP adapters built on axum.
//!
//! Maps service errors to JSON error responses, turns a resolved attachment
//! into a download response and reads uploads from multipart forms.
//! Routing and sessions are left to the embedding application.

mod download;
mod error;
mod upload;

pub use download::download_response;
pub use error::{ApiError, ErrorBody, ErrorCode, ErrorDetail};
pub use upload::{read_post_form, read_upload, PostForm, UPLOAD_FIELD};
