//! Run configuration.
//!
//! This module provides [`ExportConfig`], the per-run settings object, and
//! [`Zone`], the display time zone. Both are plain values constructed once
//! at startup and passed by reference into the pipeline.
//!
//! # Example
//!
//! ```rust
//! use slackview::config::{ExportConfig, Zone};
//!
//! let config = ExportConfig::new()
//!     .with_work_dir("/tmp/archive")
//!     .with_zone(Zone::parse("+03:00")?);
//! # Ok::<(), slackview::SlackviewError>(())
//! ```

use std::path::{Path, PathBuf};

use chrono::FixedOffset;

use crate::error::{Result, SlackviewError};

/// Maximum gap between two consecutive same-author text messages for the
/// later one to render in compact form.
pub const GROUPING_WINDOW_SECS: i64 = 5 * 60;

/// Directory under the work directory holding downloaded assets.
pub const CACHE_DIR: &str = "cache";

/// Registry file mapping remote URIs to cached file names.
pub const CACHE_REGISTRY: &str = "cache.registry";

/// Line in the page template where rendered messages are spliced in.
pub const CONTENT_MARKER: &str = "[CONTENT]";

/// Name of the stylesheet copied next to the generated pages.
pub const STYLESHEET_NAME: &str = "slackview.css";

/// The time zone messages are displayed in.
///
/// Timestamps are stored as exact epoch values and only converted for
/// display, so the zone affects nothing but the rendered clock times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    /// The machine-local zone (the default).
    Local,
    /// A fixed UTC offset such as `+03:00`.
    Fixed(FixedOffset),
}

impl Zone {
    /// Parses a zone argument.
    ///
    /// Accepts `UTC`, `Z`, and fixed offsets in `+HH:MM`, `+HHMM`, or `+HH`
    /// form (either sign). Anything else is an invalid-timezone error.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.eq_ignore_ascii_case("utc") || trimmed == "Z" {
            return Ok(Zone::Fixed(FixedOffset::east_opt(0).unwrap()));
        }

        let (sign, rest) = match trimmed.as_bytes().first() {
            Some(b'+') => (1, &trimmed[1..]),
            Some(b'-') => (-1, &trimmed[1..]),
            _ => return Err(invalid(input)),
        };

        let digits: String = rest.chars().filter(|c| *c != ':').collect();
        if !(digits.len() == 2 || digits.len() == 4) || !digits.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid(input));
        }

        let hours: i32 = digits[..2].parse().map_err(|_| invalid(input))?;
        let minutes: i32 = if digits.len() == 4 {
            digits[2..].parse().map_err(|_| invalid(input))?
        } else {
            0
        };
        if hours > 23 || minutes > 59 {
            return Err(invalid(input));
        }

        let secs = sign * (hours * 3600 + minutes * 60);
        FixedOffset::east_opt(secs)
            .map(Zone::Fixed)
            .ok_or_else(|| invalid(input))
    }
}

impl Default for Zone {
    fn default() -> Self {
        Zone::Local
    }
}

fn invalid(input: &str) -> SlackviewError {
    SlackviewError::InvalidTimezone {
        input: input.to_string(),
    }
}

/// Settings for one export run.
///
/// The work directory must contain an extracted Slack archive: `users.json`,
/// `channels.json`, and one directory of `*.json` message logs per channel.
/// Output pages, the asset cache, and the cache registry are written into
/// the same directory.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Directory holding the extracted archive (default: current directory).
    pub work_dir: PathBuf,

    /// Display time zone (default: machine-local).
    pub zone: Zone,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("."),
            zone: Zone::Local,
        }
    }
}

impl ExportConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the work directory.
    #[must_use]
    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = dir.into();
        self
    }

    /// Builder method to set the display zone.
    #[must_use]
    pub fn with_zone(mut self, zone: Zone) -> Self {
        self.zone = zone;
        self
    }

    /// Path of the asset cache directory.
    pub fn cache_dir(&self) -> PathBuf {
        self.work_dir.join(CACHE_DIR)
    }

    /// Path of the cache registry file.
    pub fn registry_path(&self) -> PathBuf {
        self.work_dir.join(CACHE_REGISTRY)
    }

    /// Path of a channel's message log directory.
    pub fn channel_dir(&self, channel_name: &str) -> PathBuf {
        self.work_dir.join(channel_name)
    }

    /// Path of a channel's generated page.
    pub fn page_path(&self, channel_name: &str) -> PathBuf {
        self.work_dir.join(format!("{channel_name}.html"))
    }

    /// Path of the copied stylesheet.
    pub fn stylesheet_path(&self) -> PathBuf {
        self.work_dir.join(STYLESHEET_NAME)
    }
}

impl AsRef<Path> for ExportConfig {
    fn as_ref(&self) -> &Path {
        &self.work_dir
    }
}
