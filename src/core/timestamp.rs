//! Timestamp rendering for the line prefix
//!
//! Lines carry a millisecond-precision wall-clock timestamp,
//! `2025-01-08 10:30:45.123`, in either local time or UTC.

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// strftime pattern of the line timestamp
pub const LINE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Time zone used for line timestamps
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeZoneChoice {
    /// Host local time (default)
    #[default]
    Local,
    /// Coordinated universal time
    Utc,
}

impl TimeZoneChoice {
    /// Current time rendered with [`LINE_TIMESTAMP_FORMAT`].
    #[must_use]
    pub fn now(&self) -> String {
        match self {
            TimeZoneChoice::Local => format_timestamp(&Local::now()),
            TimeZoneChoice::Utc => format_timestamp(&Utc::now()),
        }
    }
}

/// Render any chrono datetime with [`LINE_TIMESTAMP_FORMAT`].
#[must_use]
pub fn format_timestamp<Tz>(datetime: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    datetime.format(LINE_TIMESTAMP_FORMAT).to_string()
}
