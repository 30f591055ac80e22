//! Per-unit working state for one concatenation call.

use fluent_voice_domain::Datagram;

/// Scratch slot owned by one selected unit while its utterance is rendered.
///
/// Slots sit in a `Vec` parallel to the selected units. The context
/// resolver fills `frames` and `right_context`; the duration reconciler
/// replaces `frames` and sets `unit_duration`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitData {
    /// Frames to play for this unit.
    pub frames: Vec<Datagram>,
    /// Window support borrowed from past the unit's end; never counted in
    /// the unit's duration.
    pub right_context: Option<Datagram>,
    /// Total duration of `frames` after reconciliation.
    pub unit_duration: u64,
}

impl UnitData {
    /// Working record holding freshly fetched frames.
    pub fn new(frames: Vec<Datagram>, right_context: Option<Datagram>) -> Self {
        let unit_duration = total_duration(&frames);
        Self {
            frames,
            right_context,
            unit_duration,
        }
    }
}

/// Sum of frame durations in samples.
#[inline]
pub fn total_duration(frames: &[Datagram]) -> u64 {
    frames.iter().map(Datagram::duration).sum()
}
