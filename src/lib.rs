//! Noticeboard - bulletin board backend with post attachments.
//!
//! Posts may carry one uploaded file. The file lives in a flat upload
//! directory under a generated name, and its lifecycle follows the post:
//! stored on create, replaced or removed on edit, deleted with the post.

pub mod attachment;
pub mod board;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod web;

pub use attachment::{
    AttachOutcome, AttachmentChange, AttachmentDownload, AttachmentRef, AttachmentStore,
    PostAttachmentLifecycle, UploadPayload, UploadedFile,
};
pub use board::{
    BoardService, NewPost, NewReply, PaginatedResult, Pagination, Post, PostDetail,
    PostRepository, PostUpdate, Reply, ReplyRepository, SearchType,
};
pub use config::Config;
pub use db::{Database, Member, MemberRepository, NewMember};
pub use error::{NoticeboardError, Result};
