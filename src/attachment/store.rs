//! Filesystem side of post attachments.
//!
//! Stored files live flat in a single upload directory (no sharding) under
//! names of the form `YYYYMMDD_<uuid><ext>`, e.g.
//! `20240806_d8e91593-f693-4280-9904-10637d85a46f.doc`.
//! The store knows nothing about posts.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tracing::debug;
use uuid::Uuid;

use crate::Result;

/// Source of the current date used in stored names.
pub trait Clock: Send + Sync {
    /// Today's date.
    fn today(&self) -> NaiveDate;
}

/// Clock backed by the local system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Source of the 128-bit random component of stored names.
pub trait IdSource: Send + Sync {
    /// Produce a fresh identifier.
    fn next_id(&self) -> Uuid;
}

/// Random (v4) UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdSource;

impl IdSource for RandomIdSource {
    fn next_id(&self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Manages directories and names for stored attachment files.
#[derive(Clone)]
pub struct AttachmentStore {
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdSource>,
}

impl AttachmentStore {
    /// Create a store using the system clock and random identifiers.
    pub fn new() -> Self {
        Self::with_sources(SystemClock, RandomIdSource)
    }

    /// Create a store with explicit clock and identifier sources.
    pub fn with_sources(clock: impl Clock + 'static, ids: impl IdSource + 'static) -> Self {
        Self {
            clock: Arc::new(clock),
            ids: Arc::new(ids),
        }
    }

    /// Make sure `path` exists as a directory, creating intermediate
    /// directories as needed.
    ///
    /// Safe to call repeatedly and concurrently.
    pub fn ensure_directory_exists(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = path.as_ref();
        if !path.is_dir() {
            fs::create_dir_all(path)?;
            debug!("Created upload directory {:?}", path);
        }
        Ok(path.to_path_buf())
    }

    /// Build a fresh stored name for an uploaded file.
    ///
    /// The original extension (from the last `.`, dot included) is kept;
    /// names without a dot get no extension.
    pub fn create_unique_file_name(&self, original_file_name: &str) -> String {
        format!(
            "{}_{}{}",
            self.clock.today().format("%Y%m%d"),
            self.ids.next_id().hyphenated(),
            extension_of(original_file_name)
        )
    }

    /// Full path of a stored file inside `directory`.
    pub fn attachment_path(&self, directory: impl AsRef<Path>, stored_name: &str) -> PathBuf {
        directory.as_ref().join(stored_name)
    }

    /// Delete `directory/stored_name` if it is there.
    ///
    /// Returns `true` if a file was removed and `false` if there was nothing
    /// to remove. Any other failure is returned as an I/O error.
    pub fn delete_if_attachment_exists(
        &self,
        directory: impl AsRef<Path>,
        stored_name: &str,
    ) -> Result<bool> {
        if stored_name.is_empty() {
            return Ok(false);
        }

        let path = self.attachment_path(directory, stored_name);
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!("Deleted stored attachment {:?}", path);
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

impl Default for AttachmentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AttachmentStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttachmentStore").finish_non_exhaustive()
    }
}

/// Extension of `file_name`: everything from the last `.`, or `""`.
pub fn extension_of(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(index) => &file_name[index..],
        None => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct FixedClock(NaiveDate);

    impl Clock for FixedClock {
        fn today(&self) -> NaiveDate {
            self.0
        }
    }

    struct FixedId(Uuid);

    impl IdSource for FixedId {
        fn next_id(&self) -> Uuid {
            self.0
        }
    }

    const FIXED_UUID: &str = "d8e91593-f693-4280-9904-10637d85a46f";

    fn fixed_store() -> AttachmentStore {
        AttachmentStore::with_sources(
            FixedClock(NaiveDate::from_ymd_opt(2024, 8, 6).unwrap()),
            FixedId(Uuid::parse_str(FIXED_UUID).unwrap()),
        )
    }

    /// Checks `YYYYMMDD_<36-char uuid><ext>`.
    fn assert_stored_name_shape(name: &str, ext: &str) {
        assert!(name.ends_with(ext), "{name} should end with {ext:?}");
        let stem = &name[..name.len() - ext.len()];
        let (date, id) = stem.split_once('_').expect("missing underscore");
        assert_eq!(date.len(), 8);
        assert!(date.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(id.len(), 36);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit() || c == '-'));
        assert!(Uuid::parse_str(id).is_ok());
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("resume.docx"), ".docx");
        assert_eq!(extension_of("archive.tar.gz"), ".gz");
        assert_eq!(extension_of("Makefile"), "");
        assert_eq!(extension_of(".bashrc"), ".bashrc");
        assert_eq!(extension_of("trailing."), ".");
        assert_eq!(extension_of(""), "");
    }

    #[test]
    fn test_create_unique_file_name_is_deterministic_with_fixed_sources() {
        let store = fixed_store();
        assert_eq!(
            store.create_unique_file_name("이력서.doc"),
            format!("20240806_{FIXED_UUID}.doc")
        );
    }

    #[test]
    fn test_create_unique_file_name_without_extension() {
        let store = fixed_store();
        let name = store.create_unique_file_name("README");
        assert_eq!(name, format!("20240806_{FIXED_UUID}"));
        assert!(!name.ends_with('.'));
    }

    #[test]
    fn test_create_unique_file_name_shape() {
        let store = AttachmentStore::new();

        assert_stored_name_shape(&store.create_unique_file_name("photo.png"), ".png");
        assert_stored_name_shape(&store.create_unique_file_name("report.PDF"), ".PDF");
        assert_stored_name_shape(&store.create_unique_file_name("no_extension"), "");
    }

    #[test]
    fn test_create_unique_file_name_uses_todays_date() {
        let store = AttachmentStore::new();
        let today = Local::now().date_naive().format("%Y%m%d").to_string();
        // Guard against running across midnight
        let name = store.create_unique_file_name("a.txt");
        let after = Local::now().date_naive().format("%Y%m%d").to_string();
        assert!(name.starts_with(&today) || name.starts_with(&after));
    }

    #[test]
    fn test_create_unique_file_name_is_unique() {
        let store = AttachmentStore::new();
        let first = store.create_unique_file_name("same.txt");
        let second = store.create_unique_file_name("same.txt");
        assert_ne!(first, second);
    }

    #[test]
    fn test_ensure_directory_exists_creates_nested() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("a").join("b").join("uploads");
        let store = AttachmentStore::new();

        let path = store.ensure_directory_exists(&target).unwrap();

        assert_eq!(path, target);
        assert!(target.is_dir());
    }

    #[test]
    fn test_ensure_directory_exists_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("uploads");
        let store = AttachmentStore::new();

        store.ensure_directory_exists(&target).unwrap();
        fs::write(target.join("keep.txt"), b"x").unwrap();
        store.ensure_directory_exists(&target).unwrap();

        assert!(target.is_dir());
        assert!(target.join("keep.txt").exists());
    }

    #[test]
    fn test_ensure_directory_exists_fails_on_file() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("not-a-dir");
        fs::write(&blocker, b"x").unwrap();
        let store = AttachmentStore::new();

        let result = store.ensure_directory_exists(&blocker);

        assert!(matches!(result, Err(crate::NoticeboardError::Io(_))));
    }

    #[test]
    fn test_delete_if_attachment_exists() {
        let temp_dir = TempDir::new().unwrap();
        let store = AttachmentStore::new();
        fs::write(temp_dir.path().join("20240806_x.png"), b"png").unwrap();

        let deleted = store
            .delete_if_attachment_exists(temp_dir.path(), "20240806_x.png")
            .unwrap();

        assert!(deleted);
        assert!(!temp_dir.path().join("20240806_x.png").exists());
    }

    #[test]
    fn test_delete_if_attachment_exists_missing_is_noop() {
        let temp_dir = TempDir::new().unwrap();
        let store = AttachmentStore::new();

        assert!(!store
            .delete_if_attachment_exists(temp_dir.path(), "missing.png")
            .unwrap());
        // Directory itself missing
        assert!(!store
            .delete_if_attachment_exists(temp_dir.path().join("gone"), "missing.png")
            .unwrap());
    }

    #[test]
    fn test_delete_if_attachment_exists_empty_name() {
        let temp_dir = TempDir::new().unwrap();
        let store = AttachmentStore::new();

        assert!(!store.delete_if_attachment_exists(temp_dir.path(), "").unwrap());
        assert!(temp_dir.path().is_dir());
    }

    #[test]
    fn test_attachment_path() {
        let store = AttachmentStore::new();
        assert_eq!(
            store.attachment_path("/srv/uploads", "20240806_x.png"),
            PathBuf::from("/srv/uploads/20240806_x.png")
        );
    }
}
