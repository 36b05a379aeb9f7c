//! Post attachments.
//!
//! This module provides:
//! - `AttachmentStore` for stored-file naming, directories and removal
//! - `PostAttachmentLifecycle` for keeping those files in step with posts
//! - `UploadPayload` and `AttachmentChange` for what the request layer hands in

mod lifecycle;
mod reference;
mod store;
mod upload;

pub use lifecycle::{AttachOutcome, AttachmentDownload, PostAttachmentLifecycle};
pub(crate) use lifecycle::ensure_owner;
pub use reference::AttachmentRef;
pub use store::{extension_of, AttachmentStore, Clock, IdSource, RandomIdSource, SystemClock};
pub use upload::{AttachmentChange, UploadPayload, UploadedFile};
