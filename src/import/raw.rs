//! Raw serde shapes of the archive JSON.
//!
//! These structs mirror the export files field-for-field and exist only to
//! be projected into the typed model by the importer. Everything the
//! archive may omit is an `Option`; discriminator handling and error
//! reporting live in the importer, not here.

use serde::Deserialize;
use serde_json::Value;

/// Entry of `users.json`.
#[derive(Debug, Deserialize)]
pub struct RawUser {
    pub id: String,
    pub profile: RawProfile,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawProfile {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub real_name: Option<String>,
    /// 72-pixel avatar URL.
    #[serde(default)]
    pub image_72: Option<String>,
}

/// Entry of `channels.json`.
#[derive(Debug, Deserialize)]
pub struct RawChannel {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub purpose: RawPurpose,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawPurpose {
    #[serde(default)]
    pub value: String,
}

/// Entry of a channel's message log file.
#[derive(Debug, Deserialize)]
pub struct RawMessage {
    /// Message subtype discriminator; absent for plain text and uploads.
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default)]
    pub upload: Option<bool>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    /// The timestamp key, as the archive's `"seconds.fraction"` string.
    pub ts: String,
    #[serde(default)]
    pub thread_ts: Option<String>,
    #[serde(default)]
    pub replies: Option<Vec<RawReply>>,
    #[serde(default)]
    pub attachments: Option<Vec<RawAttachment>>,
    /// Kept untyped: an upload whose `files` is not an array is a schema
    /// error the importer reports itself.
    #[serde(default)]
    pub files: Option<Value>,
    /// Single file of a `file_share` message.
    #[serde(default)]
    pub file: Option<RawFile>,
    /// Payload of `channel_purpose` messages.
    #[serde(default)]
    pub purpose: Option<String>,
    /// Payload of `channel_name` messages.
    #[serde(default)]
    pub old_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Entry of a thread root's `replies` list.
#[derive(Debug, Deserialize)]
pub struct RawReply {
    pub ts: String,
}

/// A file object, as carried by uploads and `file_share` messages.
#[derive(Debug, Deserialize)]
pub struct RawFile {
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub mimetype: Option<String>,
    #[serde(default)]
    pub filetype: Option<String>,
    #[serde(default)]
    pub url_private: Option<String>,
    #[serde(default)]
    pub initial_comment: Option<RawComment>,
    #[serde(default)]
    pub thumb_480: Option<String>,
    #[serde(default)]
    pub thumb_360: Option<String>,
    #[serde(default)]
    pub thumb_64: Option<String>,
    #[serde(default)]
    pub thumb_pdf: Option<String>,
    /// Inline snippet preview.
    #[serde(default)]
    pub preview: Option<String>,
    /// Lines cut off from the preview; nonzero means the preview is
    /// truncated and the full snippet must be fetched.
    #[serde(default)]
    pub lines_more: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct RawComment {
    #[serde(default)]
    pub comment: Option<String>,
}

/// An attachment object. No explicit tag; the importer classifies
/// structurally.
#[derive(Debug, Deserialize)]
pub struct RawAttachment {
    #[serde(default)]
    pub video_html: Option<String>,
    #[serde(default)]
    pub video_html_width: Option<u32>,
    #[serde(default)]
    pub video_html_height: Option<u32>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub title_link: Option<String>,
    #[serde(default)]
    pub service_name: Option<String>,
    #[serde(default)]
    pub service_icon: Option<String>,
    #[serde(default)]
    pub service_url: Option<String>,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub author_link: Option<String>,
    #[serde(default)]
    pub from_url: Option<String>,
    #[serde(default)]
    pub thumb_url: Option<String>,
}
