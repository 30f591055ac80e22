//! Pitch-synchronous overlap-add over reconciled frame runs.
//!
//! Every frame is turned into a two-period grain: the frame itself under
//! the rising half of a Hann window, followed by its successor under the
//! falling half. Grains are added at the frame's output offset, so
//! consecutive frames of one recording sum back to the original signal and
//! unit joins become short cross-fades.
//!
//! The successor of a unit's last frame is its right-context frame when
//! one was fetched, otherwise the first frame of the next unit. Output is
//! cut at the summed frame durations; context material past the final
//! frame is never emitted.

use std::collections::VecDeque;
use std::f32::consts::PI;

use fluent_voice_domain::{Datagram, VoiceError};
use tracing::trace;

use crate::{source::SampleSource, unit_data::UnitData};

struct Grain {
    frame: Datagram,
    successor: Option<Datagram>,
}

/// Overlap-add source over the frames of an utterance.
pub struct DatagramOverlapSource {
    grains: Vec<Grain>,
    next: usize,
    /// Mixed samples; the first `ready` are final.
    mix: VecDeque<f32>,
    ready: usize,
    remaining: u64,
}

impl DatagramOverlapSource {
    /// Build from per-unit frame runs and optional right-context frames.
    ///
    /// Every unit must have at least one frame.
    pub fn new(
        frames: Vec<Vec<Datagram>>,
        right_contexts: Vec<Option<Datagram>>,
    ) -> Result<Self, VoiceError> {
        if let Some(index) = frames.iter().position(Vec::is_empty) {
            return Err(VoiceError::EmptyUnit { index });
        }

        let firsts: Vec<Datagram> = frames.iter().map(|f| f[0].clone()).collect();
        let mut grains = Vec::with_capacity(frames.iter().map(Vec::len).sum());
        let mut remaining = 0u64;

        for (u, (unit_frames, context)) in frames.into_iter().zip(right_contexts).enumerate() {
            let last = unit_frames.len() - 1;
            for (k, frame) in unit_frames.iter().enumerate() {
                let successor = if k < last {
                    Some(unit_frames[k + 1].clone())
                } else {
                    context.clone().or_else(|| firsts.get(u + 1).cloned())
                };
                remaining += frame.duration();
                grains.push(Grain {
                    frame: frame.clone(),
                    successor,
                });
            }
        }

        Ok(Self {
            grains,
            next: 0,
            mix: VecDeque::new(),
            ready: 0,
            remaining,
        })
    }

    /// Build from reconciled working records, in output order.
    pub fn from_records(records: Vec<UnitData>) -> Result<Self, VoiceError> {
        let (frames, contexts) = records
            .into_iter()
            .map(|r| (r.frames, r.right_context))
            .unzip();
        Self::new(frames, contexts)
    }

    /// Mix the next grain into the accumulator.
    fn add_next_grain(&mut self) {
        let grain = &self.grains[self.next];
        self.next += 1;

        let frame = grain.frame.samples();
        let succ = grain
            .successor
            .as_ref()
            .map(Datagram::samples)
            .unwrap_or_default();

        let needed = self.ready + frame.len() + succ.len();
        if self.mix.len() < needed {
            self.mix.resize(needed, 0.0);
        }

        let rise = frame.len() as f32;
        for (i, s) in frame.iter().enumerate() {
            let w = 0.5 * (1.0 - (PI * i as f32 / rise).cos());
            self.mix[self.ready + i] += w * s;
        }
        let fall = succ.len() as f32;
        let base = self.ready + frame.len();
        for (j, s) in succ.iter().enumerate() {
            let w = 0.5 * (1.0 + (PI * j as f32 / fall).cos());
            self.mix[base + j] += w * s;
        }

        self.ready += frame.len();
        trace!(grain = self.next, ready = self.ready, "grain mixed");
    }
}

impl SampleSource for DatagramOverlapSource {
    fn read(&mut self, out: &mut [f32]) -> usize {
        while self.ready < out.len() && self.next < self.grains.len() {
            self.add_next_grain();
        }
        let n = out.len().min(self.ready).min(self.remaining as usize);
        for (dst, src) in out[..n].iter_mut().zip(self.mix.drain(..n)) {
            *dst = src;
        }
        self.ready -= n;
        self.remaining -= n as u64;
        if self.remaining == 0 {
            self.mix.clear();
            self.ready = 0;
        }
        n
    }

    fn has_more(&self) -> bool {
        self.remaining > 0
    }

    fn total_len(&self) -> Option<u64> {
        Some(self.remaining)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(mut src: impl SampleSource, chunk: usize) -> Vec<f32> {
        let mut out = vec![0.0; chunk];
        let mut all = Vec::new();
        while src.has_more() {
            let n = src.read(&mut out);
            all.extend_from_slice(&out[..n]);
            if n == 0 {
                break;
            }
        }
        all
    }

    fn constant(value: i16, len: usize) -> Datagram {
        Datagram::from_samples(&vec![value; len])
    }

    #[test]
    fn output_length_is_sum_of_frames() {
        let src = DatagramOverlapSource::new(
            vec![vec![constant(100, 3), constant(100, 4)], vec![constant(100, 5)]],
            vec![Some(constant(100, 9)), None],
        )
        .unwrap();
        assert_eq!(src.total_len(), Some(12));
        assert_eq!(drain(src, 5).len(), 12);
    }

    #[test]
    fn adjacent_frames_reconstruct_signal() {
        // constant signal: after the first fade-in period, windows sum to one
        let level = 8192;
        let src = DatagramOverlapSource::new(
            vec![
                vec![constant(level, 4), constant(level, 4)],
                vec![constant(level, 4)],
            ],
            vec![None, None],
        )
        .unwrap();
        let out = drain(src, 3);
        for (i, s) in out.iter().enumerate().skip(4) {
            assert!((s - 0.25).abs() < 1e-5, "sample {i} = {s}");
        }
        assert_eq!(out[0], 0.0);
    }

    #[test]
    fn chunk_size_does_not_change_output() {
        let build = || {
            DatagramOverlapSource::new(
                vec![
                    vec![Datagram::from_samples(&[1000, -2000, 3000])],
                    vec![Datagram::zero(4), Datagram::from_samples(&[500, 600])],
                ],
                vec![Some(Datagram::from_samples(&[7000, 7000])), None],
            )
            .unwrap()
        };
        assert_eq!(drain(build(), 1), drain(build(), 64));
    }

    #[test]
    fn empty_unit_is_rejected() {
        let err = DatagramOverlapSource::new(vec![vec![constant(1, 2)], vec![]], vec![None, None])
            .err();
        assert_eq!(err, Some(VoiceError::EmptyUnit { index: 1 }));
    }

    #[test]
    fn empty_utterance_yields_nothing() {
        let src = DatagramOverlapSource::new(Vec::new(), Vec::new()).unwrap();
        assert!(!src.has_more());
        assert!(drain(src, 8).is_empty());
    }

    #[test]
    fn right_context_feeds_the_join() {
        // A's recorded successor is B; the output continues with D instead
        let a = constant(8000, 4);
        let b = constant(16000, 4);
        let d = constant(-8000, 4);
        let join = |context: Option<Datagram>| {
            let src = DatagramOverlapSource::new(
                vec![vec![a.clone()], vec![d.clone()]],
                vec![context, None],
            )
            .unwrap();
            drain(src, 8)
        };

        let with_context = join(Some(b.clone()));
        assert_eq!(with_context.len(), 8);
        // D's rising window is zero on its first sample; only A's tail counts
        assert_eq!(with_context[4], 16000.0 / 32768.0);

        let without = join(None);
        assert_eq!(without[4], -8000.0 / 32768.0);
        assert_ne!(with_context[5..], without[5..]);
    }
}
