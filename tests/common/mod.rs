//! Test helpers for integration tests.
//!
//! Provides a board backed by an in-memory database and a temporary upload
//! directory, with deterministic stored names.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::NaiveDate;
use tempfile::TempDir;
use uuid::Uuid;

use noticeboard::attachment::{Clock, IdSource};
use noticeboard::config::FilesConfig;
use noticeboard::{AttachmentStore, BoardService, Database, MemberRepository, NewMember};

/// Clock stuck on 2024-08-06.
pub struct FixedClock;

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 8, 6).unwrap()
    }
}

/// Ids counting up from 1.
#[derive(Default)]
pub struct SequentialIds(AtomicU64);

impl IdSource for SequentialIds {
    fn next_id(&self) -> Uuid {
        Uuid::from_u128(u128::from(self.0.fetch_add(1, Ordering::SeqCst) + 1))
    }
}

/// Stored name produced for the `n`th upload of a file with `ext`.
pub fn stored_name(n: u128, ext: &str) -> String {
    format!("20240806_{}{}", Uuid::from_u128(n).hyphenated(), ext)
}

/// A board with members `alice` and `bob`.
pub struct TestBoard {
    pub db: Database,
    pub store: AttachmentStore,
    pub files: FilesConfig,
    upload_root: TempDir,
}

impl TestBoard {
    /// Create a board storing attachments in a fresh temporary directory.
    pub async fn new() -> Self {
        Self::with_files(|_| {}).await
    }

    /// Create a board and adjust its file settings.
    pub async fn with_files(adjust: impl FnOnce(&mut FilesConfig)) -> Self {
        let db = Database::open_in_memory()
            .await
            .expect("Failed to create in-memory database");
        let members = MemberRepository::new(db.pool());
        members
            .create(&NewMember::new("alice", "Alice"))
            .await
            .unwrap();
        members.create(&NewMember::new("bob", "Bob")).await.unwrap();

        let upload_root = TempDir::new().unwrap();
        let mut files = FilesConfig {
            upload_path: upload_root
                .path()
                .join("uploads")
                .to_string_lossy()
                .into_owned(),
            ..FilesConfig::default()
        };
        adjust(&mut files);

        Self {
            db,
            store: AttachmentStore::with_sources(FixedClock, SequentialIds::default()),
            files,
            upload_root,
        }
    }

    /// Board service over this board.
    pub fn service(&self) -> BoardService<'_> {
        BoardService::new(&self.db, &self.store, &self.files)
    }

    /// Directory attachments are written to.
    pub fn upload_dir(&self) -> PathBuf {
        PathBuf::from(&self.files.upload_path)
    }

    /// Scratch directory outside the upload directory.
    pub fn root(&self) -> &Path {
        self.upload_root.path()
    }

    /// Names of the files currently in the upload directory, sorted.
    pub fn stored_files(&self) -> Vec<String> {
        let mut names: Vec<String> = match std::fs::read_dir(self.upload_dir()) {
            Ok(entries) => entries
                .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
                .collect(),
            Err(_) => Vec::new(),
        };
        names.sort();
        names
    }
}
