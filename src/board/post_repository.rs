//! Post repository.
//!
//! This module provides CRUD and search operations for posts in the database.

use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::post::{NewPost, Post, PostRow};
use super::types::SearchType;
use crate::{NoticeboardError, Result};

const POST_COLUMNS: &str = "id, member_id, title, contents, view_count, like_count, \
                            original_name, stored_name, created_at, updated_at";

/// Repository for post CRUD operations.
pub struct PostRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> PostRepository<'a> {
    /// Create a new PostRepository with the given pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a post together with its attachment reference.
    ///
    /// Returns the created post with the assigned ID.
    pub async fn create(&self, new_post: &NewPost) -> Result<Post> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO posts (member_id, title, contents, original_name, stored_name)
             VALUES (?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(&new_post.member_id)
        .bind(&new_post.title)
        .bind(&new_post.contents)
        .bind(new_post.attachment.original_name())
        .bind(new_post.attachment.stored_name())
        .fetch_one(self.pool)
        .await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| NoticeboardError::NotFound("post".to_string()))
    }

    /// Get a post by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Post>> {
        let row: Option<PostRow> =
            sqlx::query_as(&format!("SELECT {POST_COLUMNS} FROM posts WHERE id = ?"))
                .bind(id)
                .fetch_optional(self.pool)
                .await?;

        Ok(row.map(PostRow::into_post))
    }

    /// Write the mutable columns of `post` back and bump `updated_at`.
    ///
    /// Returns the stored post, or None if it no longer exists.
    pub async fn save(&self, post: &Post) -> Result<Option<Post>> {
        let result = sqlx::query(
            "UPDATE posts
             SET title = ?, contents = ?, original_name = ?, stored_name = ?,
                 updated_at = datetime('now')
             WHERE id = ?",
        )
        .bind(&post.title)
        .bind(&post.contents)
        .bind(post.attachment.original_name())
        .bind(post.attachment.stored_name())
        .bind(post.id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_by_id(post.id).await
    }

    /// Delete a post by ID. Its replies go with it.
    ///
    /// Returns true if a post was deleted, false if not found.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Add one to the view count.
    ///
    /// Returns false if the post does not exist.
    pub async fn increment_view_count(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("UPDATE posts SET view_count = view_count + 1 WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List every post, newest first.
    pub async fn list_all(&self) -> Result<Vec<Post>> {
        let rows: Vec<PostRow> =
            sqlx::query_as(&format!("SELECT {POST_COLUMNS} FROM posts ORDER BY id DESC"))
                .fetch_all(self.pool)
                .await?;

        Ok(rows.into_iter().map(PostRow::into_post).collect())
    }

    /// List one page of matching posts, newest first.
    pub async fn search(
        &self,
        search_type: SearchType,
        word: &str,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Post>> {
        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {POST_COLUMNS} FROM posts"));
        push_filter(&mut query, search_type, word);
        query
            .push(" ORDER BY id DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let rows: Vec<PostRow> = query.build_query_as().fetch_all(self.pool).await?;
        Ok(rows.into_iter().map(PostRow::into_post).collect())
    }

    /// Count the posts a search matches.
    pub async fn count(&self, search_type: SearchType, word: &str) -> Result<i64> {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT COUNT(*) FROM posts");
        push_filter(&mut query, search_type, word);

        let count: i64 = query.build_query_scalar().fetch_one(self.pool).await?;
        Ok(count)
    }
}

fn push_filter(query: &mut QueryBuilder<'_, Sqlite>, search_type: SearchType, word: &str) {
    match search_type {
        SearchType::All => {}
        SearchType::Title => {
            query
                .push(" WHERE title LIKE ")
                .push_bind(like_pattern(word))
                .push(" ESCAPE '\\'");
        }
        SearchType::Contents => {
            query
                .push(" WHERE contents LIKE ")
                .push_bind(like_pattern(word))
                .push(" ESCAPE '\\'");
        }
        SearchType::Author => {
            query.push(" WHERE member_id = ").push_bind(word.to_string());
        }
    }
}

/// `%word%` with LIKE wildcards in `word` matched literally.
fn like_pattern(word: &str) -> String {
    let mut pattern = String::with_capacity(word.len() + 2);
    pattern.push('%');
    for c in word.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
