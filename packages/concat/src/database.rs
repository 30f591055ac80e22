//! Unit database: the index of recorded units and their recording order.

use fluent_voice_domain::Unit;

/// Lookup of recorded units.
pub trait UnitDatabase: Send + Sync {
    /// Rate in which unit starts and durations are expressed.
    fn unit_sample_rate(&self) -> u32;

    /// The unit that immediately follows `unit` in the original recording.
    fn next_unit(&self, unit: &Unit) -> Option<Unit>;
}

/// Units held in recording order in memory.
#[derive(Debug, Clone)]
pub struct InMemoryUnitDatabase {
    unit_sample_rate: u32,
    units: Vec<Unit>,
}

impl InMemoryUnitDatabase {
    /// Start building a database whose units are measured at `unit_sample_rate`.
    pub fn builder(unit_sample_rate: u32) -> UnitDatabaseBuilder {
        UnitDatabaseBuilder {
            unit_sample_rate,
            units: Vec::new(),
            cursor: 0,
        }
    }
}

impl UnitDatabase for InMemoryUnitDatabase {
    fn unit_sample_rate(&self) -> u32 {
        self.unit_sample_rate
    }

    fn next_unit(&self, unit: &Unit) -> Option<Unit> {
        self.units.get(unit.index + 1).copied()
    }
}

/// Appends units back to back, the way a voice build walks its recordings.
#[derive(Debug)]
pub struct UnitDatabaseBuilder {
    unit_sample_rate: u32,
    units: Vec<Unit>,
    cursor: u64,
}

impl UnitDatabaseBuilder {
    /// Append a unit of `duration` unit samples.
    pub fn push_unit(&mut self, duration: u64) -> Unit {
        let unit = Unit::new(self.units.len(), self.cursor, duration);
        self.cursor += duration;
        self.units.push(unit);
        unit
    }

    /// Append a zero-length edge unit marking an utterance boundary.
    pub fn push_edge(&mut self) -> Unit {
        let unit = Unit::edge(self.units.len(), self.cursor);
        self.units.push(unit);
        unit
    }

    /// Finish the database.
    pub fn build(self) -> InMemoryUnitDatabase {
        InMemoryUnitDatabase {
            unit_sample_rate: self.unit_sample_rate,
            units: self.units,
        }
    }
}
