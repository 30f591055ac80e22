//! Sample format shared by the timeline and the rendered output.

use serde::{Deserialize, Serialize};

/// Mono 16-bit PCM at a fixed sample rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioFormat {
    /// Samples per second.
    pub sample_rate: u32,
    /// Interleaved channels (always 1 for recorded voices).
    pub channels: u16,
    /// Bits per sample in the PCM payload.
    pub bits_per_sample: u16,
}

impl AudioFormat {
    /// Mono 16-bit PCM at `sample_rate`.
    pub const fn pcm16_mono(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            channels: 1,
            bits_per_sample: 16,
        }
    }

    /// Convert seconds to a whole number of samples, rounding half up.
    ///
    /// The product is formed and rounded in `f32` so that durations match
    /// the prosody model's own arithmetic sample for sample. Negative
    /// targets clamp to zero.
    pub fn seconds_to_samples(&self, seconds: f32) -> u64 {
        let samples = (seconds * self.sample_rate as f32).round();
        if samples <= 0.0 { 0 } else { samples as u64 }
    }

    /// Convert a sample count to seconds.
    #[inline]
    pub fn samples_to_seconds(&self, samples: u64) -> f32 {
        samples as f32 / self.sample_rate as f32
    }
}

impl Default for AudioFormat {
    fn default() -> Self {
        Self::pcm16_mono(16_000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seconds_round_half_up() {
        let fmt = AudioFormat::pcm16_mono(16_000);
        assert_eq!(fmt.seconds_to_samples(0.1), 1600);
        assert_eq!(AudioFormat::pcm16_mono(8).seconds_to_samples(0.0625), 1);
        // just below one half rounds down
        let below_half = 0.5f32 - f32::EPSILON / 4.0;
        assert_eq!(AudioFormat::pcm16_mono(1).seconds_to_samples(below_half), 0);
        // above 2^23 every f32 is whole and comes back unchanged
        assert_eq!(
            AudioFormat::pcm16_mono(1).seconds_to_samples(16_777_215.0),
            16_777_215
        );
        assert_eq!(fmt.seconds_to_samples(0.0), 0);
    }

    #[test]
    fn negative_seconds_clamp_to_zero() {
        let fmt = AudioFormat::pcm16_mono(8_000);
        assert_eq!(fmt.seconds_to_samples(-0.25), 0);
    }

    #[test]
    fn samples_to_seconds_inverts() {
        let fmt = AudioFormat::pcm16_mono(16_000);
        assert!((fmt.samples_to_seconds(8_000) - 0.5).abs() < f32::EPSILON);
    }
}
