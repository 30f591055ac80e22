//! Recorded units as indexed by the voice database.

use serde::{Deserialize, Serialize};

/// A span of the recording that the unit-selection search can pick.
///
/// `start` and `duration` are expressed in the database's own unit sample
/// rate, which may differ from the timeline's rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Unit {
    /// Position of the unit in the database.
    pub index: usize,
    /// Start offset in unit samples.
    pub start: u64,
    /// Duration in unit samples.
    pub duration: u64,
    /// Marks an utterance boundary of the source recording.
    #[serde(default)]
    pub is_edge: bool,
}

impl Unit {
    /// A regular unit.
    pub const fn new(index: usize, start: u64, duration: u64) -> Self {
        Self {
            index,
            start,
            duration,
            is_edge: false,
        }
    }

    /// A zero-length edge unit at `start`.
    pub const fn edge(index: usize, start: u64) -> Self {
        Self {
            index,
            start,
            duration: 0,
            is_edge: true,
        }
    }

    /// First unit sample past the end of this unit.
    #[inline]
    pub const fn end(&self) -> u64 {
        self.start + self.duration
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unit {} start {} duration {}", self.index, self.start, self.duration)
    }
}
