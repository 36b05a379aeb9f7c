//! Reply repository.

use sqlx::SqlitePool;

use super::reply::{NewReply, Reply};
use crate::{NoticeboardError, Result};

/// Repository for reply CRUD operations.
pub struct ReplyRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ReplyRepository<'a> {
    /// Create a new ReplyRepository with the given pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a reply.
    ///
    /// Returns the created reply with the assigned ID.
    pub async fn create(&self, new_reply: &NewReply) -> Result<Reply> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO replies (post_id, member_id, contents) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(new_reply.post_id)
        .bind(&new_reply.member_id)
        .bind(&new_reply.contents)
        .fetch_one(self.pool)
        .await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| NoticeboardError::NotFound("reply".to_string()))
    }

    /// Get a reply by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Reply>> {
        let reply = sqlx::query_as::<_, Reply>(
            "SELECT id, post_id, member_id, contents, created_at FROM replies WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(reply)
    }

    /// Delete a reply by ID.
    ///
    /// Returns true if a reply was deleted, false if not found.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM replies WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List the replies to a post, oldest first.
    pub async fn list_by_post(&self, post_id: i64) -> Result<Vec<Reply>> {
        let replies = sqlx::query_as::<_, Reply>(
            "SELECT id, post_id, member_id, contents, created_at
             FROM replies WHERE post_id = ? ORDER BY id ASC",
        )
        .bind(post_id)
        .fetch_all(self.pool)
        .await?;
        Ok(replies)
    }
}
