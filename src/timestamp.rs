//! The message timestamp key.
//!
//! Slack logs identify messages by an exact fractional-second value such as
//! `"1529090108.000345"`. That value is the *identity* used to link reply
//! threads, so it must survive the round trip through parsing without any
//! rounding. [`Ts`] stores it as whole microseconds since the Unix epoch,
//! which is lossless for the archive's six-digit fractions and gives
//! ordering, equality, and hashing for free.
//!
//! Conversion to a human-readable time happens only at render time, against
//! the configured display zone.
//!
//! # Example
//!
//! ```
//! use slackview::timestamp::Ts;
//!
//! let ts = Ts::parse("1529090108.000345")?;
//! assert_eq!(ts.to_string(), "1529090108.000345");
//! assert!(ts < Ts::parse("1529090109.5")?);
//! # Ok::<(), slackview::SlackviewError>(())
//! ```

use std::fmt;

use chrono::{DateTime, FixedOffset, Utc};

use crate::config::Zone;
use crate::error::{Result, SlackviewError};

/// Microseconds per second; the archive never carries more precision.
const MICROS_PER_SEC: i64 = 1_000_000;

/// An exact fractional-second message timestamp.
///
/// `Ts` is the unique key of a message within a channel and the value
/// through which thread parents and children find each other. Two messages
/// with equal keys are indistinguishable, which the graph linker treats as
/// a hard error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ts(i64);

impl Ts {
    /// Parses the archive's `"seconds.fraction"` string form.
    ///
    /// The fraction is optional and at most six digits; shorter fractions
    /// are zero-extended (`"42.5"` means 42.500000 seconds).
    pub fn parse(raw: &str) -> Result<Self> {
        let (secs, frac) = match raw.split_once('.') {
            Some((s, f)) => (s, f),
            None => (raw, ""),
        };

        let secs: i64 = secs
            .parse()
            .map_err(|_| bad_timestamp(raw))?;
        if frac.len() > 6 || !frac.chars().all(|c| c.is_ascii_digit()) {
            return Err(bad_timestamp(raw));
        }
        let micros: i64 = if frac.is_empty() {
            0
        } else {
            let padded = format!("{frac:0<6}");
            padded.parse().map_err(|_| bad_timestamp(raw))?
        };

        Ok(Ts(secs * MICROS_PER_SEC + micros))
    }

    /// Builds a key directly from microseconds since the Unix epoch.
    pub fn from_micros(micros: i64) -> Self {
        Ts(micros)
    }

    /// Whole microseconds since the Unix epoch.
    pub fn as_micros(self) -> i64 {
        self.0
    }

    /// Elapsed time between two keys, in seconds, always non-negative.
    pub fn seconds_between(self, other: Ts) -> i64 {
        (self.0 - other.0).abs() / MICROS_PER_SEC
    }

    /// The key converted into the display zone.
    pub fn to_datetime(self, zone: &Zone) -> DateTime<FixedOffset> {
        let utc: DateTime<Utc> = DateTime::from_timestamp_micros(self.0).unwrap_or_default();
        match zone {
            Zone::Local => utc.with_timezone(&chrono::Local).fixed_offset(),
            Zone::Fixed(offset) => utc.with_timezone(offset),
        }
    }

    /// Full date-and-time form shown on full message headers.
    pub fn format_full(self, zone: &Zone) -> String {
        self.to_datetime(zone).format("%Y-%m-%d %H:%M:%S").to_string()
    }

    /// Time-only form shown on compact (grouped) messages.
    pub fn format_time(self, zone: &Zone) -> String {
        self.to_datetime(zone).format("%H:%M:%S").to_string()
    }
}

impl fmt::Display for Ts {
    /// Renders the canonical archive form, fraction always six digits.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:06}",
            self.0.div_euclid(MICROS_PER_SEC),
            self.0.rem_euclid(MICROS_PER_SEC)
        )
    }
}

fn bad_timestamp(raw: &str) -> SlackviewError {
    SlackviewError::invalid_shape(format!("bad timestamp value: {raw:?}"))
}
