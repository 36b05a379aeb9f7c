//! Board service.
//!
//! This module provides the high-level post and reply operations with
//! ownership checks, pagination and attachment handling.

use std::path::Path;

use tracing::{info, warn};

use crate::attachment::{
    ensure_owner, AttachOutcome, AttachmentChange, AttachmentDownload, AttachmentStore,
    PostAttachmentLifecycle, UploadPayload, UploadedFile,
};
use crate::config::FilesConfig;
use crate::db::{Database, MemberRepository};
use crate::{NoticeboardError, Result};

use super::post_repository::PostRepository;
use super::reply_repository::ReplyRepository;
use super::types::{PaginatedResult, Pagination, SearchType, DEFAULT_PAGE_SIZE};
use super::{NewPost, NewReply, Post, PostUpdate, Reply};

/// Maximum length for post titles (in characters).
pub const MAX_TITLE_LENGTH: usize = 100;

/// Maximum length for post and reply bodies (in characters).
pub const MAX_CONTENTS_LENGTH: usize = 10_000;

/// Validate a title string.
fn validate_title(title: &str) -> Result<()> {
    let char_count = title.chars().count();
    if char_count > MAX_TITLE_LENGTH {
        return Err(NoticeboardError::Validation(format!(
            "title is too long (max {} characters)",
            MAX_TITLE_LENGTH
        )));
    }
    if title.trim().is_empty() {
        return Err(NoticeboardError::Validation(
            "title must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validate a post or reply body.
fn validate_contents(contents: &str) -> Result<()> {
    let char_count = contents.chars().count();
    if char_count > MAX_CONTENTS_LENGTH {
        return Err(NoticeboardError::Validation(format!(
            "contents are too long (max {} characters)",
            MAX_CONTENTS_LENGTH
        )));
    }
    if contents.trim().is_empty() {
        return Err(NoticeboardError::Validation(
            "contents must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// A post with its replies, as shown on the detail page.
#[derive(Debug, Clone)]
pub struct PostDetail {
    /// The post.
    pub post: Post,
    /// Replies, oldest first.
    pub replies: Vec<Reply>,
}

/// Service for board operations.
pub struct BoardService<'a> {
    db: &'a Database,
    store: &'a AttachmentStore,
    files: &'a FilesConfig,
    page_size: i64,
}

impl<'a> BoardService<'a> {
    /// Create a new BoardService listing `DEFAULT_PAGE_SIZE` posts per page.
    pub fn new(db: &'a Database, store: &'a AttachmentStore, files: &'a FilesConfig) -> Self {
        Self {
            db,
            store,
            files,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Set the number of posts per page used by `list_page`.
    pub fn with_page_size(mut self, page_size: i64) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Posts per page used by `list_page`.
    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    fn lifecycle(&self) -> PostAttachmentLifecycle<'_> {
        PostAttachmentLifecycle::new(self.store, Path::new(&self.files.upload_path))
    }

    fn validate_upload<U: UploadPayload>(&self, upload: &U) -> Result<()> {
        let limit = self.files.max_upload_size_bytes();
        if upload.size() > limit {
            return Err(NoticeboardError::Validation(format!(
                "attachment is too large (max {} MB)",
                self.files.max_upload_size_mb
            )));
        }
        Ok(())
    }

    async fn require_post(&self, id: i64) -> Result<Post> {
        PostRepository::new(self.db.pool())
            .get_by_id(id)
            .await?
            .ok_or_else(|| NoticeboardError::NotFound("post".to_string()))
    }

    async fn require_member(&self, member_id: &str) -> Result<()> {
        if MemberRepository::new(self.db.pool())
            .exists(member_id)
            .await?
        {
            Ok(())
        } else {
            Err(NoticeboardError::NotFound("member".to_string()))
        }
    }

    /// Create a post, storing its attachment first.
    ///
    /// A failed transfer either aborts the write or saves the post without
    /// attachment, depending on `reject_on_attachment_error`.
    pub async fn write(&self, mut new_post: NewPost, upload: Option<&UploadedFile>) -> Result<Post> {
        self.require_member(&new_post.member_id).await?;
        validate_title(&new_post.title)?;
        validate_contents(&new_post.contents)?;
        if let Some(upload) = upload {
            self.validate_upload(upload)?;
        }

        let lifecycle = self.lifecycle();
        match lifecycle.attach_on_create(&mut new_post, upload) {
            AttachOutcome::TransferFailed { error } if self.files.reject_on_attachment_error => {
                return Err(error.into());
            }
            AttachOutcome::TransferFailed { .. } => {
                warn!(
                    "Saving post by {} without its attachment",
                    new_post.member_id
                );
            }
            _ => {}
        }

        let repo = PostRepository::new(self.db.pool());
        match repo.create(&new_post).await {
            Ok(post) => {
                info!("Created post {} by {}", post.id, post.member_id);
                Ok(post)
            }
            Err(e) => {
                if let Some(stored_name) = new_post.attachment.stored_name() {
                    lifecycle.discard_orphan(stored_name);
                }
                Err(e)
            }
        }
    }

    /// List every post, newest first.
    pub async fn list_all(&self) -> Result<Vec<Post>> {
        PostRepository::new(self.db.pool()).list_all().await
    }

    /// List one page of posts, newest first.
    ///
    /// `page` is 1-based. An empty `word` with a column search matches every post.
    pub async fn list(
        &self,
        page: i64,
        page_size: i64,
        search_type: SearchType,
        word: &str,
    ) -> Result<PaginatedResult<Post>> {
        let pagination = Pagination::page(page, page_size);
        let repo = PostRepository::new(self.db.pool());

        let items = repo
            .search(search_type, word, pagination.offset, pagination.limit)
            .await?;
        let total = repo.count(search_type, word).await?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    /// List one page of posts using the configured page size.
    pub async fn list_page(
        &self,
        page: i64,
        search_type: SearchType,
        word: &str,
    ) -> Result<PaginatedResult<Post>> {
        self.list(page, self.page_size, search_type, word).await
    }

    /// Read a post: bumps its view count and loads its replies.
    pub async fn get_post(&self, id: i64) -> Result<PostDetail> {
        let repo = PostRepository::new(self.db.pool());
        if !repo.increment_view_count(id).await? {
            return Err(NoticeboardError::NotFound("post".to_string()));
        }

        let post = self.require_post(id).await?;
        let replies = ReplyRepository::new(self.db.pool())
            .list_by_post(id)
            .await?;

        Ok(PostDetail { post, replies })
    }

    /// Edit a post and apply the requested attachment change.
    ///
    /// When the new upload cannot be stored and `reject_on_attachment_error`
    /// is set, the post is saved with the old attachment cleared and the
    /// transfer error is returned. When the save itself fails, a newly
    /// stored file is removed again.
    pub async fn update(
        &self,
        id: i64,
        username: &str,
        update: PostUpdate,
        change: AttachmentChange,
    ) -> Result<Post> {
        let mut post = self.require_post(id).await?;
        ensure_owner(&post, username)?;

        if let Some(ref title) = update.title {
            validate_title(title)?;
        }
        if let Some(ref contents) = update.contents {
            validate_contents(contents)?;
        }
        if let AttachmentChange::Replace(ref upload) = change {
            self.validate_upload(upload)?;
        }

        let lifecycle = self.lifecycle();
        let outcome = lifecycle.replace_or_remove_on_update(&mut post, username, change)?;
        update.apply_to(&mut post);

        let saved = match PostRepository::new(self.db.pool()).save(&post).await {
            Ok(Some(saved)) => saved,
            result => {
                if let AttachOutcome::Attached { ref stored_name } = outcome {
                    lifecycle.discard_orphan(stored_name);
                }
                return Err(match result {
                    Err(e) => e,
                    _ => NoticeboardError::NotFound("post".to_string()),
                });
            }
        };

        info!("Updated post {} by {}", saved.id, username);

        match outcome {
            AttachOutcome::TransferFailed { error } if self.files.reject_on_attachment_error => {
                Err(error.into())
            }
            _ => Ok(saved),
        }
    }

    /// Delete a post and its attachment.
    pub async fn delete(&self, id: i64, username: &str) -> Result<()> {
        let post = self.require_post(id).await?;
        let repo = PostRepository::new(self.db.pool());
        self.lifecycle().remove_on_delete(&post, username, &repo).await
    }

    /// Add a reply to a post.
    pub async fn write_reply(&self, new_reply: NewReply) -> Result<Reply> {
        self.require_member(&new_reply.member_id).await?;
        self.require_post(new_reply.post_id).await?;
        validate_contents(&new_reply.contents)?;

        let reply = ReplyRepository::new(self.db.pool())
            .create(&new_reply)
            .await?;
        info!(
            "Created reply {} on post {} by {}",
            reply.id, reply.post_id, reply.member_id
        );
        Ok(reply)
    }

    /// Delete a reply written by `username`.
    pub async fn delete_reply(&self, reply_id: i64, username: &str) -> Result<()> {
        let repo = ReplyRepository::new(self.db.pool());
        let reply = repo
            .get_by_id(reply_id)
            .await?
            .ok_or_else(|| NoticeboardError::NotFound("reply".to_string()))?;

        if !reply.is_owned_by(username) {
            return Err(NoticeboardError::Permission(format!(
                "{username} is not the author of reply {reply_id}"
            )));
        }

        if !repo.delete(reply_id).await? {
            return Err(NoticeboardError::NotFound("reply".to_string()));
        }
        info!("Deleted reply {} by {}", reply_id, username);
        Ok(())
    }

    /// Locate the attachment of a post for download.
    pub async fn download(&self, id: i64) -> Result<AttachmentDownload> {
        let post = self.require_post(id).await?;
        self.lifecycle().resolve_download(&post)
    }
}
