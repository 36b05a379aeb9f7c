//! Post model.

use crate::attachment::AttachmentRef;

/// A post on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    /// Unique post ID.
    pub id: i64,
    /// Login id of the author.
    pub member_id: String,
    /// Post title.
    pub title: String,
    /// Post body.
    pub contents: String,
    /// Number of times the post was viewed.
    pub view_count: i64,
    /// Number of likes.
    pub like_count: i64,
    /// Attached file, if any.
    pub attachment: AttachmentRef,
    /// Creation timestamp.
    pub created_at: String,
    /// Last modification timestamp.
    pub updated_at: String,
}

impl Post {
    /// Check if the post carries an attachment.
    pub fn has_attachment(&self) -> bool {
        self.attachment.is_present()
    }

    /// Check if `username` wrote this post.
    pub fn is_owned_by(&self, username: &str) -> bool {
        self.member_id == username
    }
}

/// Database row for posts.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct PostRow {
    id: i64,
    member_id: String,
    title: String,
    contents: String,
    view_count: i64,
    like_count: i64,
    original_name: Option<String>,
    stored_name: Option<String>,
    created_at: String,
    updated_at: String,
}

impl PostRow {
    pub(crate) fn into_post(self) -> Post {
        Post {
            id: self.id,
            member_id: self.member_id,
            title: self.title,
            contents: self.contents,
            view_count: self.view_count,
            like_count: self.like_count,
            attachment: AttachmentRef::from_columns(self.original_name, self.stored_name),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Data for creating a new post.
#[derive(Debug, Clone)]
pub struct NewPost {
    /// Login id of the author.
    pub member_id: String,
    /// Post title.
    pub title: String,
    /// Post body.
    pub contents: String,
    /// Attached file; filled in once the upload is stored.
    pub attachment: AttachmentRef,
}

impl NewPost {
    /// Create a new post without attachment.
    pub fn new(
        member_id: impl Into<String>,
        title: impl Into<String>,
        contents: impl Into<String>,
    ) -> Self {
        Self {
            member_id: member_id.into(),
            title: title.into(),
            contents: contents.into(),
            attachment: AttachmentRef::none(),
        }
    }

    /// Set the attachment reference.
    pub fn with_attachment(mut self, attachment: AttachmentRef) -> Self {
        self.attachment = attachment;
        self
    }
}

/// Data for editing an existing post.
#[derive(Debug, Clone, Default)]
pub struct PostUpdate {
    /// New title.
    pub title: Option<String>,
    /// New body.
    pub contents: Option<String>,
}

impl PostUpdate {
    /// Create an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set new title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set new body.
    pub fn contents(mut self, contents: impl Into<String>) -> Self {
        self.contents = Some(contents.into());
        self
    }

    /// Check if any fields are set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.contents.is_none()
    }

    /// Copy the set fields onto `post`.
    pub fn apply_to(&self, post: &mut Post) {
        if let Some(ref title) = self.title {
            post.title = title.clone();
        }
        if let Some(ref contents) = self.contents {
            post.contents = contents.clone();
        }
    }
}
