//! Uploaded file payloads and update intents.

use std::fs;
use std::io;
use std::path::Path;

/// A file handed over by the request layer.
pub trait UploadPayload {
    /// File name as sent by the client.
    fn original_filename(&self) -> &str;

    /// Size of the payload in bytes.
    fn size(&self) -> u64;

    /// True when no file was chosen or the file has no content.
    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Write the payload to `destination`, blocking until done.
    fn transfer_to(&self, destination: &Path) -> io::Result<()>;
}

/// An upload held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// File name as sent by the client.
    pub original_filename: String,
    /// File content.
    pub content: Vec<u8>,
}

impl UploadedFile {
    /// Create a new in-memory upload.
    pub fn new(original_filename: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            original_filename: original_filename.into(),
            content: content.into(),
        }
    }
}

impl UploadPayload for UploadedFile {
    fn original_filename(&self) -> &str {
        &self.original_filename
    }

    fn size(&self) -> u64 {
        self.content.len() as u64
    }

    fn transfer_to(&self, destination: &Path) -> io::Result<()> {
        fs::write(destination, &self.content)
    }
}

impl<T: UploadPayload + ?Sized> UploadPayload for &T {
    fn original_filename(&self) -> &str {
        (**self).original_filename()
    }

    fn size(&self) -> u64 {
        (**self).size()
    }

    fn is_empty(&self) -> bool {
        (**self).is_empty()
    }

    fn transfer_to(&self, destination: &Path) -> io::Result<()> {
        (**self).transfer_to(destination)
    }
}

/// What the author wants done with a post's attachment on update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentChange<U = UploadedFile> {
    /// Leave the current attachment (or its absence) untouched.
    Keep,
    /// Delete the current attachment.
    Remove,
    /// Delete the current attachment and store this upload instead.
    Replace(U),
}

impl<U: UploadPayload> AttachmentChange<U> {
    /// Derive the intent from an optional upload alone.
    ///
    /// A missing or empty upload means `Remove`: an update without a file
    /// drops the existing attachment. Callers that want to keep it must ask
    /// for `Keep` explicitly.
    pub fn from_upload(upload: Option<U>) -> Self {
        match upload {
            Some(upload) if !upload.is_empty() => AttachmentChange::Replace(upload),
            _ => AttachmentChange::Remove,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_uploaded_file_is_empty() {
        assert!(UploadedFile::new("empty.txt", Vec::new()).is_empty());
        assert!(!UploadedFile::new("a.txt", b"a".to_vec()).is_empty());
    }

    #[test]
    fn test_uploaded_file_size() {
        let upload = UploadedFile::new("a.bin", vec![0u8; 42]);
        assert_eq!(upload.size(), 42);
        assert_eq!(upload.original_filename(), "a.bin");
    }

    #[test]
    fn test_transfer_to_writes_content() {
        let temp_dir = TempDir::new().unwrap();
        let destination = temp_dir.path().join("stored.bin");
        let content: Vec<u8> = (0..=255).collect();

        UploadedFile::new("binary.bin", content.clone())
            .transfer_to(&destination)
            .unwrap();

        assert_eq!(fs::read(&destination).unwrap(), content);
    }

    #[test]
    fn test_transfer_to_missing_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let destination = temp_dir.path().join("missing").join("stored.bin");

        let result = UploadedFile::new("a.txt", b"a".to_vec()).transfer_to(&destination);

        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_change_from_upload() {
        let upload = UploadedFile::new("b.png", b"png".to_vec());

        assert_eq!(
            AttachmentChange::from_upload(Some(upload.clone())),
            AttachmentChange::Replace(upload)
        );
        assert_eq!(
            AttachmentChange::<UploadedFile>::from_upload(None),
            AttachmentChange::Remove
        );
        assert_eq!(
            AttachmentChange::from_upload(Some(UploadedFile::new("b.png", Vec::new()))),
            AttachmentChange::Remove
        );
    }
}
