//! Reply model.

/// A reply (comment) attached to a post.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Reply {
    /// Unique reply ID.
    pub id: i64,
    /// ID of the post replied to.
    pub post_id: i64,
    /// Login id of the author.
    pub member_id: String,
    /// Reply body.
    pub contents: String,
    /// Creation timestamp.
    pub created_at: String,
}

impl Reply {
    /// Check if `username` wrote this reply.
    pub fn is_owned_by(&self, username: &str) -> bool {
        self.member_id == username
    }
}

/// Data for creating a new reply.
#[derive(Debug, Clone)]
pub struct NewReply {
    /// ID of the post replied to.
    pub post_id: i64,
    /// Login id of the author.
    pub member_id: String,
    /// Reply body.
    pub contents: String,
}

impl NewReply {
    /// Create a new reply.
    pub fn new(post_id: i64, member_id: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            post_id,
            member_id: member_id.into(),
            contents: contents.into(),
        }
    }
}
