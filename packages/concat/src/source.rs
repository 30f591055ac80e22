//! Pull-based sample sources.

/// A producer of mono `f32` samples that the consumer drains at its own pace.
pub trait SampleSource: Send {
    /// Fill `out` from the front; returns how many samples were written.
    ///
    /// Fewer than `out.len()` samples means the source is exhausted.
    fn read(&mut self, out: &mut [f32]) -> usize;

    /// True while unread samples remain.
    fn has_more(&self) -> bool;

    /// Samples still to come, when known up front.
    fn total_len(&self) -> Option<u64> {
        None
    }
}

/// Pulls from an inner source in fixed-size batches.
pub struct BufferedSource<S> {
    inner: S,
    buffer: Vec<f32>,
    pos: usize,
    filled: usize,
}

impl<S: SampleSource> BufferedSource<S> {
    /// Wrap `inner`, reading `batch` samples at a time.
    pub fn new(inner: S, batch: usize) -> Self {
        Self {
            inner,
            buffer: vec![0.0; batch.max(1)],
            pos: 0,
            filled: 0,
        }
    }

    fn refill(&mut self) {
        self.filled = self.inner.read(&mut self.buffer);
        self.pos = 0;
    }
}

impl<S: SampleSource> SampleSource for BufferedSource<S> {
    fn read(&mut self, out: &mut [f32]) -> usize {
        let mut written = 0;
        while written < out.len() {
            if self.pos == self.filled {
                if !self.inner.has_more() {
                    break;
                }
                self.refill();
                if self.filled == 0 {
                    break;
                }
            }
            let n = (self.filled - self.pos).min(out.len() - written);
            out[written..written + n].copy_from_slice(&self.buffer[self.pos..self.pos + n]);
            self.pos += n;
            written += n;
        }
        written
    }

    fn has_more(&self) -> bool {
        self.pos < self.filled || self.inner.has_more()
    }

    fn total_len(&self) -> Option<u64> {
        self.inner
            .total_len()
            .map(|t| t + (self.filled - self.pos) as u64)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Counts up from zero and records how large each request was.
    pub(crate) struct Ramp {
        pub next: u64,
        pub len: u64,
        pub requests: Vec<usize>,
    }

    impl SampleSource for Ramp {
        fn read(&mut self, out: &mut [f32]) -> usize {
            self.requests.push(out.len());
            let n = (self.len - self.next).min(out.len() as u64) as usize;
            for (i, s) in out[..n].iter_mut().enumerate() {
                *s = (self.next + i as u64) as f32;
            }
            self.next += n as u64;
            n
        }

        fn has_more(&self) -> bool {
            self.next < self.len
        }

        fn total_len(&self) -> Option<u64> {
            Some(self.len - self.next)
        }
    }

    #[test]
    fn buffered_reads_in_batches() {
        let ramp = Ramp {
            next: 0,
            len: 10,
            requests: Vec::new(),
        };
        let mut src = BufferedSource::new(ramp, 4);
        let mut out = [0.0f32; 3];
        let mut all = Vec::new();
        loop {
            let n = src.read(&mut out);
            all.extend_from_slice(&out[..n]);
            if n < out.len() {
                break;
            }
        }
        assert_eq!(all, (0..10).map(|i| i as f32).collect::<Vec<_>>());
        assert_eq!(src.inner.requests, vec![4, 4, 4]);
        assert!(!src.has_more());
    }

    #[test]
    fn buffered_reports_remaining_length() {
        let ramp = Ramp {
            next: 0,
            len: 10,
            requests: Vec::new(),
        };
        let mut src = BufferedSource::new(ramp, 8);
        let mut out = [0.0f32; 3];
        assert_eq!(src.total_len(), Some(10));
        src.read(&mut out);
        assert_eq!(src.total_len(), Some(7));
    }
}
