//! Audio capture infrastructure module
//!
//! Microphone input through cpal, exposed as a blocking-read stream of
//! mono 16-bit samples.

mod cpal_source;
mod sample_queue;

pub use cpal_source::{CpalAudioSource, CpalCaptureStream};
pub use sample_queue::SampleQueue;
