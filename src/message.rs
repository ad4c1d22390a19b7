//! The typed message model.
//!
//! The importer turns every raw log entry into a [`Message`]: one author,
//! one timestamp key, optional attachments, and a closed [`MessageKind`]
//! describing what the entry *is*. Thread structure is declared on the raw
//! data (`thread_ts`, reply key lists) and resolved by the graph linker,
//! which fills `children` with owned subtrees; from that point on the model
//! is immutable.
//!
//! The kind taxonomy is deliberately a closed enum rather than a trait
//! hierarchy: every rendering concern dispatches with an exhaustive
//! `match`, so adding a variant fails to compile until every projection
//! handles it.

use crate::attachment::Attachment;
use crate::context::User;
use crate::file::FileContent;
use crate::timestamp::Ts;

/// What a log entry is, beyond its shared envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageKind {
    /// An ordinary text message.
    Text,
    /// A message uploading one or more files, with optional free text.
    Upload {
        /// The uploaded files, in archive order
        files: Vec<FileContent>,
    },
    /// A single shared file with a visual preview, no free text.
    FilePreview {
        /// The shared file
        file: FileContent,
    },
    /// A single shared code/text snippet.
    Snippet {
        /// The snippet file; its kind is always [`FileKind::Snippet`](crate::file::FileKind)
        file: FileContent,
    },
    /// A user joined the channel.
    Join,
    /// The channel purpose was changed.
    PurposeChanged {
        /// The new purpose text
        purpose: String,
    },
    /// The channel was renamed.
    NameChanged {
        /// The previous name, when the archive recorded one
        old_name: Option<String>,
        /// The new name
        name: String,
    },
}

/// One imported message.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    /// Resolved author.
    pub author: User,

    /// Raw message text, still in Slack's inline markup.
    pub text: String,

    /// The unique timestamp key.
    pub ts: Ts,

    /// Key of the thread root this message replies under, if any.
    pub thread_ts: Option<Ts>,

    /// Child keys declared by this message's `replies` list. Consumed by
    /// the graph linker; empty on non-roots.
    pub reply_keys: Vec<Ts>,

    /// Attachments, in archive order.
    pub attachments: Vec<Attachment>,

    /// Thread children, filled by the linker, sorted ascending by key.
    pub children: Vec<Message>,

    /// The variant payload.
    pub kind: MessageKind,
}

impl Message {
    /// Returns `true` for plain text messages — the only kind the
    /// renderer's grouping heuristic may compact.
    pub fn is_text(&self) -> bool {
        matches!(self.kind, MessageKind::Text)
    }

    /// Returns `true` once the linker has attached children.
    pub fn is_thread_root(&self) -> bool {
        !self.children.is_empty()
    }
}
