//! Board module.
//!
//! This module provides bulletin board functionality including:
//! - Posts with an optional attachment
//! - Replies to posts
//! - Search and pagination over posts
//! - `BoardService`, which ties posts to their stored attachment files

mod post;
mod post_repository;
mod reply;
mod reply_repository;
mod service;
mod types;

pub use post::{NewPost, Post, PostUpdate};
pub use post_repository::PostRepository;
pub use reply::{NewReply, Reply};
pub use reply_repository::ReplyRepository;
pub use service::{BoardService, PostDetail, MAX_CONTENTS_LENGTH, MAX_TITLE_LENGTH};
pub use types::{PaginatedResult, Pagination, SearchType, DEFAULT_PAGE_SIZE};
