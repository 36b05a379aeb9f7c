//! Attachment reference embedded in a post record.

/// Original and stored name of a post's attachment.
///
/// Both names are present or both are absent; a post has an attachment
/// exactly when the stored name is non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttachmentRef {
    names: Option<(String, String)>,
}

impl AttachmentRef {
    /// A reference to no attachment.
    pub fn none() -> Self {
        Self::default()
    }

    /// A reference to a stored file.
    ///
    /// An empty stored name yields an empty reference.
    pub fn new(original_name: impl Into<String>, stored_name: impl Into<String>) -> Self {
        let stored_name = stored_name.into();
        if stored_name.is_empty() {
            return Self::none();
        }
        Self {
            names: Some((original_name.into(), stored_name)),
        }
    }

    /// Rebuild a reference from the two nullable database columns.
    ///
    /// A row with a stored name but no original name falls back to the
    /// stored name for display.
    pub fn from_columns(original_name: Option<String>, stored_name: Option<String>) -> Self {
        match stored_name {
            Some(stored) if !stored.is_empty() => {
                let original = original_name
                    .filter(|name| !name.is_empty())
                    .unwrap_or_else(|| stored.clone());
                Self::new(original, stored)
            }
            _ => Self::none(),
        }
    }

    /// True when a stored file is referenced.
    pub fn is_present(&self) -> bool {
        self.names.is_some()
    }

    /// Name the file was uploaded with.
    pub fn original_name(&self) -> Option<&str> {
        self.names.as_ref().map(|(original, _)| original.as_str())
    }

    /// Name of the file in the upload directory.
    pub fn stored_name(&self) -> Option<&str> {
        self.names.as_ref().map(|(_, stored)| stored.as_str())
    }

    /// Point at a newly stored file.
    pub fn set(&mut self, original_name: impl Into<String>, stored_name: impl Into<String>) {
        *self = Self::new(original_name, stored_name);
    }

    /// Forget the referenced file.
    pub fn clear(&mut self) {
        self.names = None;
    }
}
