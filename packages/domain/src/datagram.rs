//! Pitch-synchronous frames of recorded audio.
//!
//! A datagram is the smallest piece of audio the timeline hands out: one
//! pitch period of voiced speech (or a comparable slice of unvoiced
//! material) with its length in samples. Payloads are 16-bit little-endian
//! PCM, mono, and are shared rather than copied when frames move between
//! pipeline stages.

use bytes::Bytes;

/// One frame of recorded audio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Datagram {
    duration: u64,
    data: Bytes,
}

impl Datagram {
    /// Create a datagram from a duration in samples and a raw PCM payload.
    pub fn new(duration: u64, data: impl Into<Bytes>) -> Self {
        Self {
            duration,
            data: data.into(),
        }
    }

    /// Build a datagram from i16 samples; the duration is the sample count.
    pub fn from_samples(samples: &[i16]) -> Self {
        let data: Vec<u8> = samples
            .iter()
            .flat_map(|&sample| sample.to_le_bytes())
            .collect();
        Self::new(samples.len() as u64, data)
    }

    /// Synthetic silence of `duration` samples.
    pub fn zero(duration: u64) -> Self {
        Self::new(duration, vec![0u8; duration as usize * 2])
    }

    /// Duration in samples.
    #[inline]
    pub fn duration(&self) -> u64 {
        self.duration
    }

    /// Zero-length datagrams are defects in the voice database.
    #[inline]
    pub fn is_zero_length(&self) -> bool {
        self.duration == 0
    }

    /// Raw payload bytes.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Decode exactly `duration` samples, normalised to `[-1.0, 1.0)`.
    ///
    /// A payload shorter than the duration is padded with silence, a
    /// longer one is truncated.
    pub fn samples(&self) -> Vec<f32> {
        let len = self.duration as usize;
        let mut out: Vec<f32> = self
            .data
            .chunks_exact(2)
            .take(len)
            .map(|chunk| i16::from_le_bytes([chunk[0], chunk[1]]) as f32 / 32768.0)
            .collect();
        out.resize(len, 0.0);
        out
    }
}
