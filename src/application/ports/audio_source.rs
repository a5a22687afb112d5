//! Audio input port interfaces

use thiserror::Error;

use crate::domain::recording::SampleRate;

/// Capture device errors
#[derive(Debug, Clone, Error)]
pub enum CaptureError {
    #[error("No audio input device available")]
    NoDevice,

    #[error("Input device does not support {0}")]
    UnsupportedConfig(String),

    #[error("Failed to open input stream: {0}")]
    OpenFailed(String),

    #[error("Failed to start input stream: {0}")]
    StartFailed(String),

    #[error("Input stream read failed: {0}")]
    ReadFailed(String),
}

/// Port for a microphone-like source of mono 16-bit PCM.
pub trait AudioSource: Send + Sync + 'static {
    /// Stream type produced by [`AudioSource::open`]. It is created, used and
    /// released on the recording worker, so it need not be `Send`.
    type Stream: CaptureStream;

    /// Smallest workable read size in samples for mono 16-bit capture at `rate`.
    ///
    /// An error means the device cannot record with this configuration.
    fn min_buffer_size(&self, rate: SampleRate) -> Result<usize, CaptureError>;

    /// Open a capture stream buffering up to `capacity` samples.
    /// The stream does not deliver audio until started.
    fn open(&self, rate: SampleRate, capacity: usize) -> Result<Self::Stream, CaptureError>;
}

/// A blocking-read capture stream.
pub trait CaptureStream {
    /// Begin delivering samples
    fn start(&mut self) -> Result<(), CaptureError>;

    /// Read up to `buf.len()` samples.
    ///
    /// Returns the number of samples written; `Ok(0)` means no audio was
    /// available yet and is not an error.
    fn read(&mut self, buf: &mut [i16]) -> Result<usize, CaptureError>;

    /// Stop delivering samples
    fn stop(&mut self);

    /// Release the device. Called exactly once, after `stop` if the stream was started.
    fn release(self);
}
