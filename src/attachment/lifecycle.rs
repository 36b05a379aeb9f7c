//! Keeps a post's stored file in step with the post record.
//!
//! The database write and the file write are not covered by one
//! transaction. Each step is best-effort and the failure windows are:
//!
//! - create: file written, insert fails -> orphan file (the board service
//!   tries to remove it again)
//! - create/update: transfer fails -> post saved without attachment
//! - update/delete: old file removal fails -> orphan file, record proceeds
//!
//! Every downgraded failure is logged at `warn`.

use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::reference::AttachmentRef;
use super::store::AttachmentStore;
use super::upload::{AttachmentChange, UploadPayload};
use crate::board::{NewPost, Post, PostRepository};
use crate::{NoticeboardError, Result};

/// What happened to a post's attachment during create or update.
#[derive(Debug)]
pub enum AttachOutcome {
    /// No upload was supplied.
    NoUpload,
    /// The existing attachment was left alone.
    Kept,
    /// The existing attachment (if any) was removed and nothing replaced it.
    Removed,
    /// The upload was stored under this name.
    Attached {
        /// Name in the upload directory.
        stored_name: String,
    },
    /// The upload could not be written; the post carries no attachment.
    TransferFailed {
        /// Underlying failure.
        error: io::Error,
    },
}

impl AttachOutcome {
    /// True when a new file was stored.
    pub fn is_attached(&self) -> bool {
        matches!(self, AttachOutcome::Attached { .. })
    }

    /// True when the upload was lost.
    pub fn is_failure(&self) -> bool {
        matches!(self, AttachOutcome::TransferFailed { .. })
    }
}

/// Location and display name of an attachment to stream back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentDownload {
    /// Full path of the stored file.
    pub path: PathBuf,
    /// Name the client should save the file as.
    pub display_name: String,
}

impl AttachmentDownload {
    /// `Content-Disposition` value with the URL-encoded display name.
    pub fn content_disposition(&self) -> String {
        format!(
            "attachment;filename={}",
            urlencoding::encode(&self.display_name)
        )
    }
}

/// Fails with a permission error unless `username` wrote the post.
pub(crate) fn ensure_owner(post: &Post, username: &str) -> Result<()> {
    if post.is_owned_by(username) {
        Ok(())
    } else {
        Err(NoticeboardError::Permission(format!(
            "{username} is not the author of post {}",
            post.id
        )))
    }
}

/// Coordinates attachment files with post create, update and delete.
#[derive(Debug, Clone, Copy)]
pub struct PostAttachmentLifecycle<'a> {
    store: &'a AttachmentStore,
    upload_dir: &'a Path,
}

impl<'a> PostAttachmentLifecycle<'a> {
    /// Create a lifecycle writing into `upload_dir`.
    pub fn new(store: &'a AttachmentStore, upload_dir: &'a Path) -> Self {
        Self { store, upload_dir }
    }

    /// Directory holding the stored files.
    pub fn upload_dir(&self) -> &Path {
        self.upload_dir
    }

    /// Store the upload for a post that is about to be inserted.
    ///
    /// The attachment fields are only set once the bytes are on disk; a
    /// failed transfer leaves them empty so the post can still be saved.
    pub fn attach_on_create<U>(&self, post: &mut NewPost, upload: Option<&U>) -> AttachOutcome
    where
        U: UploadPayload + ?Sized,
    {
        match upload {
            Some(upload) if !upload.is_empty() => self.store_upload(&mut post.attachment, upload),
            _ => AttachOutcome::NoUpload,
        }
    }

    /// Apply the author's attachment change to a loaded post.
    ///
    /// Nothing is touched unless `username` owns the post. For `Remove` and
    /// `Replace` the current file is deleted first and the reference
    /// cleared; `Replace` then stores the new upload.
    pub fn replace_or_remove_on_update<U>(
        &self,
        post: &mut Post,
        username: &str,
        change: AttachmentChange<U>,
    ) -> Result<AttachOutcome>
    where
        U: UploadPayload,
    {
        ensure_owner(post, username)?;

        let upload = match change {
            AttachmentChange::Keep => return Ok(AttachOutcome::Kept),
            AttachmentChange::Remove => None,
            AttachmentChange::Replace(upload) => Some(upload),
        };

        self.discard(post.id, &mut post.attachment);

        match upload {
            Some(upload) if !upload.is_empty() => {
                Ok(self.store_upload(&mut post.attachment, &upload))
            }
            _ => Ok(AttachOutcome::Removed),
        }
    }

    /// Delete a post together with its stored file.
    ///
    /// The record is deleted even when the file could not be removed.
    pub async fn remove_on_delete(
        &self,
        post: &Post,
        username: &str,
        posts: &PostRepository<'_>,
    ) -> Result<()> {
        ensure_owner(post, username)?;

        if let Some(stored_name) = post.attachment.stored_name() {
            self.delete_file(post.id, stored_name);
        }

        if !posts.delete(post.id).await? {
            return Err(NoticeboardError::NotFound("post".to_string()));
        }

        info!("Deleted post {} by {}", post.id, username);
        Ok(())
    }

    /// Where to read a post's attachment from and what to call it.
    pub fn resolve_download(&self, post: &Post) -> Result<AttachmentDownload> {
        let stored_name = post
            .attachment
            .stored_name()
            .ok_or_else(|| NoticeboardError::NotFound("attachment".to_string()))?;

        Ok(AttachmentDownload {
            path: self.store.attachment_path(self.upload_dir, stored_name),
            display_name: post
                .attachment
                .original_name()
                .unwrap_or(stored_name)
                .to_string(),
        })
    }

    /// Remove a stored file that no record will reference.
    ///
    /// Used to undo a transfer when the insert that should have referenced
    /// it failed.
    pub fn discard_orphan(&self, stored_name: &str) {
        if let Err(e) = self
            .store
            .delete_if_attachment_exists(self.upload_dir, stored_name)
        {
            warn!("Failed to remove orphaned attachment {:?}: {}", stored_name, e);
        }
    }

    fn store_upload<U>(&self, attachment: &mut AttachmentRef, upload: &U) -> AttachOutcome
    where
        U: UploadPayload + ?Sized,
    {
        if let Err(e) = self.store.ensure_directory_exists(self.upload_dir) {
            warn!(
                "Could not create upload directory {:?}: {}",
                self.upload_dir, e
            );
        }

        let original_name = upload.original_filename().to_string();
        let stored_name = self.store.create_unique_file_name(&original_name);
        let destination = self.store.attachment_path(self.upload_dir, &stored_name);

        match upload.transfer_to(&destination) {
            Ok(()) => {
                debug!(
                    "Stored attachment {:?} as {:?} ({} bytes)",
                    original_name,
                    stored_name,
                    upload.size()
                );
                attachment.set(original_name, stored_name.clone());
                AttachOutcome::Attached { stored_name }
            }
            Err(error) => {
                warn!(
                    "Failed to store attachment {:?} at {:?}: {}",
                    original_name, destination, error
                );
                AttachOutcome::TransferFailed { error }
            }
        }
    }

    fn discard(&self, post_id: i64, attachment: &mut AttachmentRef) {
        if let Some(stored_name) = attachment.stored_name() {
            self.delete_file(post_id, stored_name);
        }
        attachment.clear();
    }

    fn delete_file(&self, post_id: i64, stored_name: &str) {
        match self
            .store
            .delete_if_attachment_exists(self.upload_dir, stored_name)
        {
            Ok(true) => {}
            Ok(false) => warn!(
                "Stored attachment {:?} of post {} was already missing",
                stored_name, post_id
            ),
            Err(e) => warn!(
                "Failed to delete stored attachment {:?} of post {}: {}",
                stored_name, post_id, e
            ),
        }
    }
}
