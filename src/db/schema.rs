//! Database schema and migrations for the noticeboard.
//!
//! Migrations are applied in order; the `schema_version` table records
//! which ones have run.

/// Database migrations.
pub const MIGRATIONS: &[&str] = &[
    // v1: members
    r#"
CREATE TABLE members (
    member_id   TEXT PRIMARY KEY,        -- login id
    member_name TEXT NOT NULL,
    created_at  TEXT NOT NULL DEFAULT (datetime('now'))
);
"#,
    // v2: posts, with the optional attachment reference
    r#"
CREATE TABLE posts (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    member_id      TEXT NOT NULL REFERENCES members(member_id),
    title          TEXT NOT NULL,
    contents       TEXT NOT NULL,
    view_count     INTEGER NOT NULL DEFAULT 0,
    like_count     INTEGER NOT NULL DEFAULT 0,
    original_name  TEXT,                 -- name as uploaded
    stored_name    TEXT,                 -- YYYYMMDD_<uuid><ext> in the upload directory
    created_at     TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at     TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_posts_member_id ON posts(member_id);
"#,
    // v3: replies
    r#"
CREATE TABLE replies (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    post_id     INTEGER NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
    member_id   TEXT NOT NULL REFERENCES members(member_id),
    contents    TEXT NOT NULL,
    created_at  TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_replies_post_id ON replies(post_id);
"#,
];
