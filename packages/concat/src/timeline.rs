//! Audio store: pitch-period datagrams addressed by sample position.
//!
//! The concatenator only needs positional access: a run of datagrams
//! covering a sample range, and the single datagram at a position. Any
//! backing (memory-mapped voice files, an in-memory table) can implement
//! [`Timeline`]; [`InMemoryTimeline`] is the reference implementation.

use fluent_voice_domain::{Datagram, VoiceError};

/// Random positional access to recorded datagrams.
pub trait Timeline: Send + Sync {
    /// Sample rate of the stored audio.
    fn sample_rate(&self) -> u32;

    /// Total number of samples in the timeline.
    fn total_duration(&self) -> u64;

    /// The ordered run of datagrams covering `[start, start + length)`.
    fn datagrams(&self, start: u64, length: u64) -> Result<Vec<Datagram>, VoiceError>;

    /// The datagram whose span contains `position`.
    fn datagram(&self, position: u64) -> Result<Datagram, VoiceError>;
}

/// Timeline held entirely in memory.
#[derive(Debug, Clone)]
pub struct InMemoryTimeline {
    sample_rate: u32,
    datagrams: Vec<Datagram>,
    /// Start offset of each datagram.
    offsets: Vec<u64>,
    /// One past the last sample of each datagram.
    ends: Vec<u64>,
    total: u64,
}

impl InMemoryTimeline {
    /// Lay `datagrams` out back to back starting at sample 0.
    pub fn new(sample_rate: u32, datagrams: Vec<Datagram>) -> Self {
        let mut offsets = Vec::with_capacity(datagrams.len());
        let mut ends = Vec::with_capacity(datagrams.len());
        let mut total = 0u64;
        for d in &datagrams {
            offsets.push(total);
            total += d.duration();
            ends.push(total);
        }
        Self {
            sample_rate,
            datagrams,
            offsets,
            ends,
            total,
        }
    }

    /// Slice a recorded signal into pitch periods.
    ///
    /// Each pitchmark starts a new period; material before the first mark
    /// becomes a datagram of its own, and the last period runs to the end of
    /// the signal.
    pub fn from_pitchmarks(
        sample_rate: u32,
        samples: &[i16],
        pitchmarks: &[u64],
    ) -> Result<Self, VoiceError> {
        let len = samples.len() as u64;
        if pitchmarks.windows(2).any(|w| w[0] >= w[1]) {
            return Err(VoiceError::Configuration(
                "pitchmarks must be strictly increasing".to_string(),
            ));
        }
        if let Some(&last) = pitchmarks.last() {
            if last >= len {
                return Err(VoiceError::Configuration(format!(
                    "pitchmark {last} lies beyond the {len}-sample signal"
                )));
            }
        }

        let mut bounds = Vec::with_capacity(pitchmarks.len() + 2);
        if pitchmarks.first() != Some(&0) {
            bounds.push(0);
        }
        bounds.extend_from_slice(pitchmarks);
        bounds.push(len);

        let datagrams = bounds
            .windows(2)
            .map(|w| Datagram::from_samples(&samples[w[0] as usize..w[1] as usize]))
            .filter(|d| !d.is_zero_length())
            .collect();
        Ok(Self::new(sample_rate, datagrams))
    }
}

impl Timeline for InMemoryTimeline {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> u64 {
        self.total
    }

    fn datagrams(&self, start: u64, length: u64) -> Result<Vec<Datagram>, VoiceError> {
        if length == 0 {
            return Ok(Vec::new());
        }
        let end = start.checked_add(length).ok_or(VoiceError::OutOfRange {
            position: u64::MAX,
            total: self.total,
        })?;
        if end > self.total {
            return Err(VoiceError::OutOfRange {
                position: end,
                total: self.total,
            });
        }

        // first datagram starting at or after `start`, stepping back one if
        // the previous datagram straddles it
        let mut first = self.offsets.partition_point(|&o| o < start);
        if first > 0 && self.ends[first - 1] > start {
            first -= 1;
        }

        let run = self.datagrams[first..]
            .iter()
            .zip(&self.offsets[first..])
            .take_while(|(_, offset)| **offset < end)
            .map(|(d, _)| d.clone())
            .collect();
        Ok(run)
    }

    fn datagram(&self, position: u64) -> Result<Datagram, VoiceError> {
        if position >= self.total {
            return Err(VoiceError::OutOfRange {
                position,
                total: self.total,
            });
        }
        // ends are non-decreasing, so the first end past `position` belongs
        // to the non-empty datagram containing it
        let index = self.ends.partition_point(|&e| e <= position);
        self.datagrams
            .get(index)
            .cloned()
            .ok_or_else(|| VoiceError::Store(format!("no datagram at position {position}")))
    }
}
