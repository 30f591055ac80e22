//! Output of the unit-selection search.

use serde::{Deserialize, Serialize};

use crate::{target::Target, unit::Unit};

/// A recorded unit paired with the target it was chosen for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedUnit {
    /// Recorded material to play.
    pub unit: Unit,
    /// Prosody it should realise.
    pub target: Target,
}

impl SelectedUnit {
    /// Pair a unit with its target.
    pub fn new(unit: Unit, target: Target) -> Self {
        Self { unit, target }
    }

    /// Shorthand for the target's silence flag.
    #[inline]
    pub fn is_silence(&self) -> bool {
        self.target.is_silence
    }
}

impl std::fmt::Display for SelectedUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}]", self.unit, self.target.label)
    }
}
