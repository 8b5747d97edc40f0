//! Per-level call counters
//!
//! Counters live inside the logger's lock next to the threshold and sink, so
//! they are plain integers here. They only ever grow.

use super::log_level::LogLevel;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// One monotonically increasing counter per level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelCounts {
    counts: [u64; LogLevel::COUNT],
}

impl LevelCounts {
    pub const fn new() -> Self {
        Self {
            counts: [0; LogLevel::COUNT],
        }
    }

    /// Record one completed emission at `level`.
    #[inline]
    pub fn record(&mut self, level: LogLevel) {
        self.counts[level.index()] += 1;
    }

    #[inline]
    pub fn get(&self, level: LogLevel) -> u64 {
        self.counts[level.index()]
    }

    /// Sum over every level.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn as_array(&self) -> [u64; LogLevel::COUNT] {
        self.counts
    }

    /// `(level, count)` pairs in ascending level order.
    pub fn iter(&self) -> impl Iterator<Item = (LogLevel, u64)> + '_ {
        LogLevel::ALL.iter().map(move |level| (*level, self.get(*level)))
    }
}

/// Serialized as a map keyed by lowercase level name, `Off` omitted.
impl Serialize for LevelCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(LogLevel::COUNT - 1))?;
        for (level, count) in self.iter().filter(|(level, _)| *level != LogLevel::Off) {
            map.serialize_entry(&level, &count)?;
        }
        map.end()
    }
}
