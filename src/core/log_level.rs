//! Log level definitions

use super::error::LoggerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity scale. A higher value is more verbose.
///
/// A level is enabled when the effective threshold is greater than or equal
/// to it, so a threshold of `Info` lets `Stack`, `Fatal`, `Error`, `Warn`
/// and `Info` through. `Off` is only meaningful as a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off = 0,
    Stack = 1,
    Fatal = 2,
    Error = 3,
    Warn = 4,
    #[default]
    Info = 5,
    Debug = 6,
    Trace = 7,
}

impl LogLevel {
    /// Number of levels, `Off` included.
    pub const COUNT: usize = 8;

    /// Every level in ascending order.
    pub const ALL: [LogLevel; LogLevel::COUNT] = [
        LogLevel::Off,
        LogLevel::Stack,
        LogLevel::Fatal,
        LogLevel::Error,
        LogLevel::Warn,
        LogLevel::Info,
        LogLevel::Debug,
        LogLevel::Trace,
    ];

    pub fn to_str(&self) -> &'static str {
        match self {
            LogLevel::Off => "OFF",
            LogLevel::Stack => "STACK",
            LogLevel::Fatal => "FATAL",
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Trace => "TRACE",
        }
    }

    /// Slot of this level in counter arrays.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Case-insensitive lookup over the known level names.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|level| level.to_str().eq_ignore_ascii_case(name))
    }

    /// Whether a logger whose threshold is `self` lets `requested` through.
    #[inline]
    pub fn allows(self, requested: LogLevel) -> bool {
        requested != LogLevel::Off && self >= requested
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

impl FromStr for LogLevel {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| LoggerError::unknown_level(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_most_severe_first() {
        assert!(LogLevel::Off < LogLevel::Stack);
        assert!(LogLevel::Stack < LogLevel::Fatal);
        assert!(LogLevel::Fatal < LogLevel::Error);
        assert!(LogLevel::Error < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Debug);
        assert!(LogLevel::Debug < LogLevel::Trace);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(LogLevel::parse("info"), Some(LogLevel::Info));
        assert_eq!(LogLevel::parse("WaRn"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::parse("STACK"), Some(LogLevel::Stack));
        assert_eq!(LogLevel::parse("off"), Some(LogLevel::Off));
        assert_eq!(LogLevel::parse("warning"), None);
        assert_eq!(LogLevel::parse(""), None);
    }

    #[test]
    fn test_from_str_error() {
        let err = "bogus".parse::<LogLevel>().unwrap_err();
        assert!(matches!(err, LoggerError::UnknownLevel { .. }));
        assert_eq!(err.to_string(), "unknown log level name: bogus");
    }

    #[test]
    fn test_allows() {
        assert!(LogLevel::Info.allows(LogLevel::Error));
        assert!(LogLevel::Info.allows(LogLevel::Info));
        assert!(!LogLevel::Info.allows(LogLevel::Debug));
        assert!(!LogLevel::Off.allows(LogLevel::Stack));
        assert!(!LogLevel::Trace.allows(LogLevel::Off));
    }

    #[test]
    fn test_index_roundtrip() {
        for level in LogLevel::ALL {
            assert_eq!(LogLevel::from_index(level.index()), Some(level));
        }
        assert_eq!(LogLevel::from_index(LogLevel::COUNT), None);
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&LogLevel::Debug).unwrap(), "\"debug\"");
        let level: LogLevel = serde_json::from_str("\"stack\"").unwrap();
        assert_eq!(level, LogLevel::Stack);
    }
}
