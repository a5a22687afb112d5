//! Bounded hand-off between the cpal callback and the blocking reader

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, PoisonError};
use std::time::Duration;

use tracing::warn;

#[derive(Debug, Default)]
struct Inner {
    samples: VecDeque<i16>,
    error: Option<String>,
    dropped: u64,
}

/// Fixed-capacity sample FIFO fed from the audio callback.
///
/// When the reader falls behind, the oldest samples are discarded so the
/// callback never blocks.
#[derive(Debug)]
pub struct SampleQueue {
    inner: Mutex<Inner>,
    ready: Condvar,
    capacity: usize,
}

impl SampleQueue {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner: Mutex::new(Inner {
                samples: VecDeque::with_capacity(capacity),
                ..Inner::default()
            }),
            ready: Condvar::new(),
            capacity,
        }
    }

    /// Append samples from the device, evicting the oldest on overflow
    pub fn push(&self, samples: &[i16]) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let overflow = (inner.samples.len() + samples.len()).saturating_sub(self.capacity);
        if overflow > 0 {
            if inner.dropped == 0 {
                warn!(capacity = self.capacity, "capture buffer overflow, dropping oldest samples");
            }
            inner.dropped += overflow as u64;
            let evict = overflow.min(inner.samples.len());
            inner.samples.drain(..evict);
        }
        let skip = samples.len().saturating_sub(self.capacity);
        inner.samples.extend(&samples[skip..]);
        drop(inner);
        self.ready.notify_one();
    }

    /// Record a device error; the next read reports it
    pub fn fail(&self, message: String) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.error.get_or_insert(message);
        drop(inner);
        self.ready.notify_one();
    }

    /// Move up to `buf.len()` samples into `buf`, waiting at most `timeout`
    /// for the first one. `Ok(0)` means the wait timed out.
    pub fn pop_into(&self, buf: &mut [i16], timeout: Duration) -> Result<usize, String> {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let (mut inner, _) = self
            .ready
            .wait_timeout_while(inner, timeout, |i| i.samples.is_empty() && i.error.is_none())
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(error) = inner.error.take() {
            return Err(error);
        }

        let n = buf.len().min(inner.samples.len());
        for (slot, sample) in buf.iter_mut().zip(inner.samples.drain(..n)) {
            *slot = sample;
        }
        Ok(n)
    }

    /// Samples discarded because of overflow so far
    pub fn dropped(&self) -> u64 {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .dropped
    }

    pub fn clear(&self) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.samples.clear();
    }
}
