//! Unified error types for slackview.
//!
//! This module provides a single [`SlackviewError`] enum that covers all
//! error cases in the library, grouped the way the pipeline fails:
//!
//! - **Resolution errors** — a user id, channel id, or emoji shortcode
//!   referenced from message text or metadata is unknown
//! - **Schema errors** — an archive object has an unrecognized subtype,
//!   file mode, or mime type
//! - **Format errors** — malformed inline markup (piped links)
//! - **Graph errors** — a reply thread references a missing or duplicated
//!   timestamp key, or loops back on itself
//! - **Asset errors** — a remote asset could not be fetched
//!
//! Every one of these is fatal to the run: the exporter terminates rather
//! than skipping the offending message or channel.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::timestamp::Ts;

/// A specialized [`Result`] type for slackview operations.
pub type Result<T> = std::result::Result<T, SlackviewError>;

/// The error type for all slackview operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SlackviewError {
    /// An I/O error occurred while reading the archive or writing output.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// An archive JSON file could not be parsed.
    #[error("JSON error{}: {source}", path.as_ref().map(|p| format!(" (file: {})", p.display())).unwrap_or_default())]
    Json {
        /// The underlying parse error
        #[source]
        source: serde_json::Error,
        /// The file path, if available
        path: Option<PathBuf>,
    },

    /// A message referenced a user id that is not in `users.json`.
    #[error("Unknown user id: {id}")]
    UnknownUser {
        /// The unresolved user id
        id: String,
    },

    /// A message referenced a channel id that is not in `channels.json`.
    #[error("Unknown channel id: {id}")]
    UnknownChannel {
        /// The unresolved channel id
        id: String,
    },

    /// An emoji shortcode has no glyph in the emoji data set.
    #[error("Unknown emoji shortcode: :{name}:")]
    UnknownEmoji {
        /// The unresolved shortcode, without colons
        name: String,
    },

    /// A message carried a subtype the importer does not understand.
    #[error("Unknown message subtype: {subtype}")]
    UnknownSubtype {
        /// The unrecognized subtype value
        subtype: String,
    },

    /// A hosted file has a mime type with no rendering strategy.
    #[error("Unsupported file mime type: {mime}")]
    UnsupportedMime {
        /// The unsupported mime type
        mime: String,
    },

    /// A file object carried an unrecognized `mode`.
    #[error("Unknown file mode: {mode}")]
    UnknownFileMode {
        /// The unrecognized mode value
        mode: String,
    },

    /// The shape of an archive object does not match the schema.
    #[error("Invalid archive shape: {message}")]
    InvalidShape {
        /// Description of what's wrong
        message: String,
    },

    /// A piped link did not split into exactly link and label.
    #[error("Cannot parse link: <{raw}>")]
    MalformedLink {
        /// The raw link body, pipes included
        raw: String,
    },

    /// Two messages in one channel share a timestamp key.
    #[error("Duplicate message timestamp: {ts}")]
    DuplicateTimestamp {
        /// The colliding key
        ts: Ts,
    },

    /// A declared thread child has no matching message.
    #[error("Thread reply {ts} does not resolve to any message")]
    UnresolvedReply {
        /// The missing key
        ts: Ts,
    },

    /// A message is declared as the reply of more than one thread root.
    #[error("Reply {ts} is declared by more than one thread root")]
    DuplicateReply {
        /// The doubly-claimed key
        ts: Ts,
    },

    /// A reply chain loops back on itself.
    #[error("Reply chain involving {ts} forms a cycle")]
    ReplyCycle {
        /// A key on the unreachable chain
        ts: Ts,
    },

    /// The HTTP transport failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A remote asset fetch returned a non-success status.
    #[error("Download of <{uri}> failed: {reason}")]
    Download {
        /// The remote URI
        uri: String,
        /// Status line or transport failure description
        reason: String,
    },

    /// The timezone argument is not a fixed offset or `UTC`.
    #[error("Invalid time zone '{input}'. Expected a UTC offset like +03:00, or UTC")]
    InvalidTimezone {
        /// The rejected argument
        input: String,
    },

    /// The page template has no content split marker.
    #[error("Template is missing the {marker} marker line")]
    TemplateMarkerMissing {
        /// The expected marker
        marker: &'static str,
    },

    /// Cached snippet content is not valid UTF-8.
    #[error("Snippet at <{uri}> is not valid UTF-8")]
    SnippetEncoding {
        /// The snippet source URI
        uri: String,
    },
}

impl From<serde_json::Error> for SlackviewError {
    fn from(err: serde_json::Error) -> Self {
        SlackviewError::Json {
            source: err,
            path: None,
        }
    }
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl SlackviewError {
    /// Creates a JSON parse error tied to a file path.
    pub fn json_in(source: serde_json::Error, path: impl Into<PathBuf>) -> Self {
        SlackviewError::Json {
            source,
            path: Some(path.into()),
        }
    }

    /// Creates an unknown-user resolution error.
    pub fn unknown_user(id: impl Into<String>) -> Self {
        SlackviewError::UnknownUser { id: id.into() }
    }

    /// Creates an unknown-channel resolution error.
    pub fn unknown_channel(id: impl Into<String>) -> Self {
        SlackviewError::UnknownChannel { id: id.into() }
    }

    /// Creates an unknown-emoji resolution error.
    pub fn unknown_emoji(name: impl Into<String>) -> Self {
        SlackviewError::UnknownEmoji { name: name.into() }
    }

    /// Creates an invalid-shape schema error.
    pub fn invalid_shape(message: impl Into<String>) -> Self {
        SlackviewError::InvalidShape {
            message: message.into(),
        }
    }

    /// Creates a failed-download asset error.
    pub fn download(uri: impl Into<String>, reason: impl Into<String>) -> Self {
        SlackviewError::Download {
            uri: uri.into(),
            reason: reason.into(),
        }
    }

    /// Returns `true` if this is a reference resolution error.
    pub fn is_resolution(&self) -> bool {
        matches!(
            self,
            SlackviewError::UnknownUser { .. }
                | SlackviewError::UnknownChannel { .. }
                | SlackviewError::UnknownEmoji { .. }
        )
    }

    /// Returns `true` if this is a schema error.
    pub fn is_schema(&self) -> bool {
        matches!(
            self,
            SlackviewError::UnknownSubtype { .. }
                | SlackviewError::UnsupportedMime { .. }
                | SlackviewError::UnknownFileMode { .. }
                | SlackviewError::InvalidShape { .. }
        )
    }

    /// Returns `true` if this is a thread graph error.
    pub fn is_graph(&self) -> bool {
        matches!(
            self,
            SlackviewError::DuplicateTimestamp { .. }
                | SlackviewError::UnresolvedReply { .. }
                | SlackviewError::DuplicateReply { .. }
                | SlackviewError::ReplyCycle { .. }
        )
    }

    /// Returns `true` if this is an asset fetch error.
    pub fn is_asset(&self) -> bool {
        matches!(
            self,
            SlackviewError::Http(_) | SlackviewError::Download { .. }
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
