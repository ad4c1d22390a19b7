//! # slackview
//!
//! A Rust library (and CLI) for rendering extracted Slack export archives
//! into static, browsable HTML timelines.
//!
//! ## Overview
//!
//! slackview reads the JSON files of an extracted Slack archive — the user
//! list, the channel list, and per-channel message logs — and produces one
//! self-contained HTML page per channel. Along the way it:
//!
//! - resolves reply threads into nested timelines via each message's
//!   timestamp key
//! - converts Slack's inline markup (user/channel references, emoji
//!   shortcodes, code spans, links, emphasis) into HTML
//! - groups rapid-fire messages from the same author into compact form
//! - downloads every referenced remote asset (avatars, thumbnails, files)
//!   into a local cache exactly once, keyed by URI
//!
//! The archive is read-only input; all failures are fatal. An archive that
//! references an unknown user, carries an unknown message subtype, or
//! declares a reply to a message that does not exist stops the export
//! rather than producing a silently incomplete page.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use slackview::config::{ExportConfig, Zone};
//! use slackview::export::run_export;
//!
//! fn main() -> slackview::Result<()> {
//!     let config = ExportConfig::new()
//!         .with_work_dir("/path/to/archive")
//!         .with_zone(Zone::parse("+03:00")?);
//!
//!     let stats = run_export(&config)?;
//!     println!("exported {} messages", stats.messages);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Structure
//!
//! - [`export`] — the end-to-end pipeline ([`run_export`](export::run_export))
//! - [`import`] — archive JSON → typed entities
//! - [`graph`] — reply-thread linking into an ordered forest
//! - [`markup`] — inline text formatting
//! - [`render`] — message/attachment/file HTML projection and grouping
//! - [`cache`] — the remote asset cache
//! - [`output`] — template splicing and page writing
//! - [`context`] — run-global user/channel/emoji resolution
//! - [`timestamp`] — the lossless fractional-second message key
//! - [`config`] — run configuration
//! - [`emoji`] — shortcode → glyph lookup
//! - [`error`] — unified error types ([`SlackviewError`], [`Result`])

pub mod attachment;
pub mod cache;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod context;
pub mod emoji;
pub mod error;
pub mod export;
pub mod file;
pub mod graph;
pub mod import;
pub mod markup;
pub mod message;
pub mod output;
pub mod render;
pub mod timestamp;

// Re-export the main types at the crate root for convenience
pub use error::{Result, SlackviewError};
pub use message::{Message, MessageKind};
pub use timestamp::Ts;

/// Convenient re-exports for common usage.
///
/// ```rust
/// use slackview::prelude::*;
/// ```
pub mod prelude {
    pub use crate::attachment::{Attachment, AttachmentKind};
    pub use crate::cache::AssetCache;
    pub use crate::config::{ExportConfig, Zone};
    pub use crate::context::{Channel, ExportContext, User};
    pub use crate::error::{Result, SlackviewError};
    pub use crate::export::run_export;
    pub use crate::file::{FileContent, FileKind};
    pub use crate::message::{Message, MessageKind};
    pub use crate::timestamp::Ts;
}
