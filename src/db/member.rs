//! Member model and repository.
//!
//! Members are referenced by their login id; registration and
//! authentication live outside this crate.

use sqlx::SqlitePool;

use crate::{NoticeboardError, Result};

/// A registered board member.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Member {
    /// Login id (primary key).
    pub member_id: String,
    /// Display name.
    pub member_name: String,
    /// Registration timestamp.
    pub created_at: String,
}

/// Data for creating a new member.
#[derive(Debug, Clone)]
pub struct NewMember {
    /// Login id.
    pub member_id: String,
    /// Display name.
    pub member_name: String,
}

impl NewMember {
    /// Create a new member record.
    pub fn new(member_id: impl Into<String>, member_name: impl Into<String>) -> Self {
        Self {
            member_id: member_id.into(),
            member_name: member_name.into(),
        }
    }
}

/// Repository for member lookups.
pub struct MemberRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> MemberRepository<'a> {
    /// Create a new MemberRepository with the given pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a member and return the stored row.
    pub async fn create(&self, new_member: &NewMember) -> Result<Member> {
        sqlx::query("INSERT INTO members (member_id, member_name) VALUES (?, ?)")
            .bind(&new_member.member_id)
            .bind(&new_member.member_name)
            .execute(self.pool)
            .await?;

        self.get_by_id(&new_member.member_id)
            .await?
            .ok_or_else(|| NoticeboardError::NotFound("member".to_string()))
    }

    /// Get a member by login id.
    pub async fn get_by_id(&self, member_id: &str) -> Result<Option<Member>> {
        let member = sqlx::query_as::<_, Member>(
            "SELECT member_id, member_name, created_at FROM members WHERE member_id = ?",
        )
        .bind(member_id)
        .fetch_optional(self.pool)
        .await?;
        Ok(member)
    }

    /// Check whether a member exists.
    pub async fn exists(&self, member_id: &str) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM members WHERE member_id = ?)")
                .bind(member_id)
                .fetch_one(self.pool)
                .await?;
        Ok(exists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    #[tokio::test]
    async fn test_create_and_get_member() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = MemberRepository::new(db.pool());

        let member = repo.create(&NewMember::new("alice", "Alice")).await.unwrap();
        assert_eq!(member.member_id, "alice");
        assert_eq!(member.member_name, "Alice");

        let found = repo.get_by_id("alice").await.unwrap();
        assert_eq!(found, Some(member));
        assert!(repo.get_by_id("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_member_id() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = MemberRepository::new(db.pool());

        repo.create(&NewMember::new("alice", "Alice")).await.unwrap();
        let result = repo.create(&NewMember::new("alice", "Other")).await;

        assert!(matches!(result, Err(NoticeboardError::Database(_))));
    }

    #[tokio::test]
    async fn test_exists() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = MemberRepository::new(db.pool());

        assert!(!repo.exists("bob").await.unwrap());
        repo.create(&NewMember::new("bob", "Bob")).await.unwrap();
        assert!(repo.exists("bob").await.unwrap());
    }
}
