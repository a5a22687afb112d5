//! Per-session buffer sizing

use super::SampleRate;

/// Seconds of mono 16-bit audio the frame buffer is sized for
pub const FRAME_BUFFER_SECONDS: usize = 5;

/// Fixed headroom LAME asks for on top of the per-sample worst case
pub const ENCODE_BUFFER_HEADROOM: usize = 7200;

const BYTES_PER_SAMPLE: usize = 2;

/// The two buffers a recording session reuses for its whole lifetime.
///
/// Both are allocated once in [`SessionBuffers::for_rate`] and never resized;
/// the pipeline only hands out slices of them.
#[derive(Debug)]
pub struct SessionBuffers {
    frame: Vec<i16>,
    encoded: Vec<u8>,
}

impl SessionBuffers {
    /// Allocate buffers for a session at `rate`.
    ///
    /// The frame buffer holds `rate * 2 * 5` samples; the encode buffer
    /// holds `7200 + 2.5 * frame_len` bytes, which covers LAME's
    /// `1.25 * samples + 7200` requirement with room to spare.
    pub fn for_rate(rate: SampleRate) -> Self {
        let frame_len = Self::frame_len(rate);
        Self {
            frame: vec![0; frame_len],
            encoded: vec![0; Self::encode_len(frame_len)],
        }
    }

    /// Frame buffer length in samples for `rate`
    pub fn frame_len(rate: SampleRate) -> usize {
        rate.hz() as usize * BYTES_PER_SAMPLE * FRAME_BUFFER_SECONDS
    }

    /// Encode buffer length in bytes for a frame buffer of `frame_len` samples
    pub fn encode_len(frame_len: usize) -> usize {
        ENCODE_BUFFER_HEADROOM + frame_len * 5 / 2
    }

    pub fn frame(&self) -> &[i16] {
        &self.frame
    }

    /// Split borrow so a read frame can be encoded straight into the output buffer
    pub fn split_mut(&mut self) -> (&mut [i16], &mut [u8]) {
        (&mut self.frame, &mut self.encoded)
    }
}
