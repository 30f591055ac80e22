use std::path::Path;
use std::pin::Pin;
use std::task::{Context, Poll};

use fluent_voice_domain::{AudioFormat, VoiceError};
use futures::Stream;

use crate::source::SampleSource;

/// Rendered utterance audio, drained in blocks.
///
/// Samples are produced on demand: nothing past the block being read is
/// mixed. The same value works as a blocking [`Iterator`] and as an async
/// [`Stream`]; both yield `Vec<f32>` blocks of at most `block_samples`.
pub struct AudioStream {
    source: Box<dyn SampleSource>,
    format: AudioFormat,
    block_samples: usize,
}

impl AudioStream {
    /// Wrap a sample source.
    #[inline]
    pub fn new(source: Box<dyn SampleSource>, format: AudioFormat, block_samples: usize) -> Self {
        Self {
            source,
            format,
            block_samples: block_samples.max(1),
        }
    }

    /// Create AudioStream from any compatible source
    #[inline]
    pub fn from_source<S>(source: S, format: AudioFormat, block_samples: usize) -> Self
    where
        S: SampleSource + 'static,
    {
        Self::new(Box::new(source), format, block_samples)
    }

    /// Format of the samples.
    #[inline]
    pub fn format(&self) -> AudioFormat {
        self.format
    }

    /// Samples not yet drained, when known.
    pub fn remaining(&self) -> Option<u64> {
        self.source.total_len()
    }

    /// Read the next block, or `None` once the source is exhausted.
    pub fn next_block(&mut self) -> Option<Vec<f32>> {
        if !self.source.has_more() {
            return None;
        }
        let mut block = vec![0.0; self.block_samples];
        let n = self.source.read(&mut block);
        if n == 0 {
            return None;
        }
        block.truncate(n);
        Some(block)
    }

    /// Drain everything into one buffer.
    pub fn collect_samples(self) -> Vec<f32> {
        let capacity = self.remaining().unwrap_or(0) as usize;
        self.fold(Vec::with_capacity(capacity), |mut all, block| {
            all.extend_from_slice(&block);
            all
        })
    }

    /// Drain everything as 16-bit little-endian PCM.
    pub fn into_pcm16(self) -> Vec<u8> {
        self.flat_map(|block| block.into_iter().flat_map(|s| to_i16(s).to_le_bytes()))
            .collect()
    }

    /// Drain everything into a 16-bit PCM WAV file.
    pub fn write_wav(self, path: impl AsRef<Path>) -> Result<u64, VoiceError> {
        let spec = hound::WavSpec {
            channels: self.format.channels,
            sample_rate: self.format.sample_rate,
            bits_per_sample: self.format.bits_per_sample,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path.as_ref(), spec)
            .map_err(|e| VoiceError::Io(format!("Failed to create WAV file: {e}")))?;
        let mut written = 0u64;
        for block in self {
            for s in block {
                writer
                    .write_sample(to_i16(s))
                    .map_err(|e| VoiceError::Io(format!("Failed to write sample: {e}")))?;
                written += 1;
            }
        }
        writer
            .finalize()
            .map_err(|e| VoiceError::Io(format!("Failed to finalize WAV file: {e}")))?;
        Ok(written)
    }
}

#[inline]
fn to_i16(sample: f32) -> i16 {
    (sample * 32768.0)
        .round()
        .clamp(i16::MIN as f32, i16::MAX as f32) as i16
}

impl Iterator for AudioStream {
    type Item = Vec<f32>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_block()
    }
}

impl Stream for AudioStream {
    type Item = Vec<f32>;

    #[inline]
    fn poll_next(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        // mixing is CPU-bound over in-memory frames; a block is always ready
        Poll::Ready(self.next_block())
    }
}
