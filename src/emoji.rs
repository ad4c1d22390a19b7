//! Emoji shortcode lookup.
//!
//! The text formatter resolves `:name:` shortcodes through [`EmojiIndex`],
//! an opaque name→glyph service. The index is loaded from a bundled JSON
//! data set so the binary stays a single artifact; an unresolved shortcode
//! is a hard error, consistent with the rest of the pipeline.

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::{Result, SlackviewError};

/// Bundled shortcode data, compiled into the binary.
const BUILTIN_DATA: &str = include_str!("../assets/emoji.json");

/// One entry of the bundled data set.
#[derive(Debug, Deserialize)]
struct EmojiEntry {
    /// Primary shortcode, without colons
    name: String,
    /// The rendered glyph
    glyph: String,
    /// Alternate shortcodes mapping to the same glyph
    #[serde(default)]
    aliases: Vec<String>,
}

/// Shortcode → glyph lookup table.
pub struct EmojiIndex {
    glyphs: HashMap<String, String>,
}

impl EmojiIndex {
    /// Builds the index from the bundled data set.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_DATA)
    }

    /// Builds the index from a JSON entry list.
    pub fn from_json(data: &str) -> Result<Self> {
        let entries: Vec<EmojiEntry> = serde_json::from_str(data)?;
        let mut glyphs = HashMap::new();
        for entry in entries {
            glyphs.insert(entry.name, entry.glyph.clone());
            for alias in entry.aliases {
                glyphs.insert(alias, entry.glyph.clone());
            }
        }
        Ok(Self { glyphs })
    }

    /// Builds an index from explicit pairs. Mostly useful in tests.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        Self {
            glyphs: pairs
                .into_iter()
                .map(|(name, glyph)| (name.into(), glyph.into()))
                .collect(),
        }
    }

    /// Resolves a shortcode to its glyph.
    pub fn glyph(&self, name: &str) -> Result<&str> {
        self.glyphs
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| SlackviewError::unknown_emoji(name))
    }

    /// Number of distinct shortcodes known.
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Returns `true` if the index holds no shortcodes.
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}
