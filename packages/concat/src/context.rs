//! Context resolution: fetch each unit's frames and decide on right context.

use fluent_voice_domain::{SelectedUnit, Unit, VoiceError};
use tracing::debug;

use crate::{database::UnitDatabase, timeline::Timeline, unit_data::UnitData};

/// Converts unit-database sample positions to timeline sample positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitToTimeline {
    unit_rate: u32,
    timeline_rate: u32,
}

impl UnitToTimeline {
    /// Both rates must be non-zero.
    pub fn new(unit_rate: u32, timeline_rate: u32) -> Result<Self, VoiceError> {
        if unit_rate == 0 || timeline_rate == 0 {
            return Err(VoiceError::Configuration(format!(
                "sample rates must be non-zero (unit {unit_rate}, timeline {timeline_rate})"
            )));
        }
        Ok(Self {
            unit_rate,
            timeline_rate,
        })
    }

    /// `t * timeline_rate / unit_rate`, truncating.
    #[inline]
    pub fn convert(&self, t: u64) -> u64 {
        (t as u128 * self.timeline_rate as u128 / self.unit_rate as u128) as u64
    }
}

/// Whether `unit` gets a right-context frame given who follows it in the output.
///
/// Context is borrowed only when the recording continues past the unit into
/// a non-edge unit that the selection did not already place next; in that
/// case the successor's own first frame supplies the continuity.
pub fn wants_right_context(
    database: &dyn UnitDatabase,
    unit: &Unit,
    next_selected: Option<&Unit>,
) -> bool {
    match database.next_unit(unit) {
        Some(next_in_db) => !next_in_db.is_edge && Some(&next_in_db) != next_selected,
        None => false,
    }
}

/// Fetch frames (and right context where eligible) for every selected unit.
///
/// Returns one working record per unit, in output order. Any store failure
/// aborts the whole utterance.
pub fn resolve_units(
    units: &[SelectedUnit],
    timeline: &dyn Timeline,
    database: &dyn UnitDatabase,
) -> Result<Vec<UnitData>, VoiceError> {
    let convert = UnitToTimeline::new(database.unit_sample_rate(), timeline.sample_rate())?;
    let mut records = Vec::with_capacity(units.len());

    for (i, selected) in units.iter().enumerate() {
        let unit = &selected.unit;
        let start = convert.convert(unit.start);
        let size = convert.convert(unit.duration);
        let frames = timeline.datagrams(start, size)?;

        let next_selected = units.get(i + 1).map(|s| &s.unit);
        let right_context = if wants_right_context(database, unit, next_selected) {
            debug!(index = i, unit = unit.index, position = start + size, "fetching right context");
            Some(timeline.datagram(start + size)?)
        } else {
            None
        };

        records.push(UnitData::new(frames, right_context));
    }

    Ok(records)
}
