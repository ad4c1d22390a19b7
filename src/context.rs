//! The run-global export context.
//!
//! [`ExportContext`] is the name-resolver service of the pipeline: user id
//! → display name + avatar, channel id → channel name, emoji shortcode →
//! glyph, plus the display time zone. It is populated once from the archive
//! metadata, before any message is processed, and read-only afterwards —
//! constructed explicitly and passed by reference into the importer, the
//! formatter, and the renderer.
//!
//! Every resolver is fallible: an id or shortcode the archive does not
//! know is a hard error that terminates the run.

use std::collections::HashMap;

use crate::config::Zone;
use crate::emoji::EmojiIndex;
use crate::error::{Result, SlackviewError};

/// One workspace member.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// Unique user id (`U…`).
    pub id: String,
    /// Preferred display name, falling back to the real name.
    pub display_name: String,
    /// Cache-relative reference to the downloaded avatar, if any.
    pub avatar: Option<String>,
}

/// One channel of the workspace.
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    /// Unique channel id (`C…`).
    pub id: String,
    /// Channel name, also the name of its log directory.
    pub name: String,
    /// Channel purpose text; may be empty.
    pub purpose: String,
}

/// Run-global lookup tables and display settings.
pub struct ExportContext {
    users: HashMap<String, User>,
    channels: HashMap<String, Channel>,
    emoji: EmojiIndex,
    zone: Zone,
}

impl ExportContext {
    /// Builds the context from the imported metadata.
    pub fn new(
        users: Vec<User>,
        channels: Vec<Channel>,
        emoji: EmojiIndex,
        zone: Zone,
    ) -> Self {
        Self {
            users: users.into_iter().map(|u| (u.id.clone(), u)).collect(),
            channels: channels.into_iter().map(|c| (c.id.clone(), c)).collect(),
            emoji,
            zone,
        }
    }

    /// Resolves a user id.
    pub fn user(&self, id: &str) -> Result<&User> {
        self.users
            .get(id)
            .ok_or_else(|| SlackviewError::unknown_user(id))
    }

    /// Resolves a channel id.
    pub fn channel(&self, id: &str) -> Result<&Channel> {
        self.channels
            .get(id)
            .ok_or_else(|| SlackviewError::unknown_channel(id))
    }

    /// Resolves an emoji shortcode.
    pub fn emoji(&self, name: &str) -> Result<&str> {
        self.emoji.glyph(name)
    }

    /// The display time zone.
    pub fn zone(&self) -> &Zone {
        &self.zone
    }

    /// All channels, in arbitrary order.
    pub fn channels(&self) -> impl Iterator<Item = &Channel> {
        self.channels.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emoji::EmojiIndex;

    fn context() -> ExportContext {
        ExportContext::new(
            vec![User {
                id: "U1".into(),
                display_name: "alice".into(),
                avatar: None,
            }],
            vec![Channel {
                id: "C1".into(),
                name: "general".into(),
                purpose: "talk".into(),
            }],
            EmojiIndex::from_pairs([("smile", "😄")]),
            Zone::Local,
        )
    }

    #[test]
    fn test_resolves_known_ids() {
        let ctx = context();
        assert_eq!(ctx.user("U1").unwrap().display_name, "alice");
        assert_eq!(ctx.channel("C1").unwrap().name, "general");
        assert_eq!(ctx.emoji("smile").unwrap(), "😄");
    }

    #[test]
    fn test_unknown_ids_are_hard_errors() {
        let ctx = context();
        assert!(ctx.user("U404").unwrap_err().is_resolution());
        assert!(ctx.channel("C404").unwrap_err().is_resolution());
        assert!(ctx.emoji("nope").unwrap_err().is_resolution());
    }
}
