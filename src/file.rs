//! Uploaded file contents.
//!
//! A [`FileContent`] describes one file carried by an upload or file-share
//! message: where its cached copy lives, what it is, and how it previews.
//! The kind decides the HTML projection — thumbnail link, inline video
//! player, or preformatted snippet text.

/// Variant payload of a [`FileContent`].
#[derive(Debug, Clone, PartialEq)]
pub enum FileKind {
    /// An image or PDF previewed through a cached thumbnail.
    Thumbnailed {
        /// Cache-relative thumbnail reference, when the archive offered one
        thumb: Option<String>,
    },
    /// A video played inline from its cached copy.
    Video,
    /// A code or text snippet rendered inline.
    Snippet {
        /// The resolved snippet text
        text: String,
    },
}

/// One uploaded file.
#[derive(Debug, Clone, PartialEq)]
pub struct FileContent {
    /// Display name of the file.
    pub name: String,
    /// Cache-relative reference to the file itself. Snippets, which are
    /// inlined, may not have one.
    pub link: Option<String>,
    /// The uploader's comment, if any.
    pub comment: Option<String>,
    pub mime_type: Option<String>,
    pub file_type: Option<String>,
    pub kind: FileKind,
}

impl FileContent {
    /// Returns `true` for snippet files.
    pub fn is_snippet(&self) -> bool {
        matches!(self.kind, FileKind::Snippet { .. })
    }
}
